//! Catalog service - Services and service types offered by clinics.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewService, NewServiceType, Service, ServiceType};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_services(&self) -> AppResult<Vec<Service>>;

    async fn create_service(&self, service: NewService) -> AppResult<Service>;

    async fn list_service_types(&self) -> AppResult<Vec<ServiceType>>;

    /// `NotFound("service")` when the parent service does not exist
    async fn create_service_type(&self, service_type: NewServiceType) -> AppResult<ServiceType>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.uow.catalog().list_services().await
    }

    async fn create_service(&self, service: NewService) -> AppResult<Service> {
        let created = self.uow.catalog().create_service(service).await?;
        tracing::info!(service_id = created.id, "Service created");
        Ok(created)
    }

    async fn list_service_types(&self) -> AppResult<Vec<ServiceType>> {
        self.uow.catalog().list_service_types().await
    }

    async fn create_service_type(&self, service_type: NewServiceType) -> AppResult<ServiceType> {
        let catalog = self.uow.catalog();
        catalog
            .find_service(service_type.service_id)
            .await?
            .ok_or_not_found("service")?;

        catalog.create_service_type(service_type).await
    }
}
