//! Service and service type repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::entities::{service, service_type};
use crate::domain::{NewService, NewServiceType, Service, ServiceType};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_service(&self, id: i32) -> AppResult<Option<Service>>;

    async fn list_services(&self) -> AppResult<Vec<Service>>;

    async fn create_service(&self, service: NewService) -> AppResult<Service>;

    async fn find_service_type(&self, id: i32) -> AppResult<Option<ServiceType>>;

    async fn list_service_types(&self) -> AppResult<Vec<ServiceType>>;

    async fn create_service_type(&self, service_type: NewServiceType) -> AppResult<ServiceType>;
}

pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn find_service(&self, id: i32) -> AppResult<Option<Service>> {
        let result = service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Service::from))
    }

    async fn list_services(&self) -> AppResult<Vec<Service>> {
        let models = service::Entity::find()
            .order_by_asc(service::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn create_service(&self, new: NewService) -> AppResult<Service> {
        let active_model = service::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Service::from(model))
    }

    async fn find_service_type(&self, id: i32) -> AppResult<Option<ServiceType>> {
        let result = service_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ServiceType::from))
    }

    async fn list_service_types(&self) -> AppResult<Vec<ServiceType>> {
        let models = service_type::Entity::find()
            .order_by_asc(service_type::Column::ServiceId)
            .order_by_asc(service_type::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ServiceType::from).collect())
    }

    async fn create_service_type(&self, new: NewServiceType) -> AppResult<ServiceType> {
        let active_model = service_type::ActiveModel {
            name: Set(new.name),
            service_id: Set(new.service_id),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(ServiceType::from(model))
    }
}
