//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{ClinicPage, Paginated, PaginationMeta, PaginationParams};
pub use response::{AppointmentList, Created, ListResponse, NoContent, PetList, ServiceList, ServiceTypeList};
