use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AppointmentResponse, PetResponse, ServiceResponse, ServiceTypeResponse};

/// Listing response: `{count, data}`. An empty listing is still a 200.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    AppointmentList = ListResponse<AppointmentResponse>,
    PetList = ListResponse<PetResponse>,
    ServiceList = ListResponse<ServiceResponse>,
    ServiceTypeList = ListResponse<ServiceTypeResponse>
)]
pub struct ListResponse<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

impl<T: Serialize, U: Into<T>> FromIterator<U> for ListResponse<T> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Created response helper (common pattern for POST endpoints)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// No content response helper (common pattern for DELETE endpoints)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
