//! Service catalog: services offered by clinics and their types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A medical service (e.g. vaccination)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Category under a service (e.g. "V10" under vaccination)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: i32,
    pub name: String,
    pub service_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewServiceType {
    pub name: String,
    pub service_id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Vacinação")]
    pub nome: String,
    #[schema(example = "Aplicação de vacinas")]
    pub descricao: String,
    #[schema(example = 120.0)]
    pub preco: f64,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            nome: service.name,
            descricao: service.description,
            preco: service.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceTypeResponse {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "V10")]
    pub nome: String,
    #[schema(example = 1)]
    pub id_servico: i32,
}

impl From<ServiceType> for ServiceTypeResponse {
    fn from(service_type: ServiceType) -> Self {
        Self {
            id: service_type.id,
            nome: service_type.name,
            id_servico: service_type.service_id,
        }
    }
}
