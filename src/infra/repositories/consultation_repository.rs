//! Consultation repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use super::entities::consultation::{self, ActiveModel, Entity as ConsultationEntity};
use crate::domain::{Consultation, NewConsultation};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Consultation>>;

    /// Consultations of one pet, newest first
    async fn list_by_pet(&self, pet_id: i32) -> AppResult<Vec<Consultation>>;

    /// Fails with `NotFound` when the pet or clinic vanished in the meantime
    async fn create(&self, consultation: NewConsultation) -> AppResult<Consultation>;
}

pub struct ConsultationStore {
    db: DatabaseConnection,
}

impl ConsultationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConsultationRepository for ConsultationStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Consultation>> {
        let result = ConsultationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Consultation::from))
    }

    async fn list_by_pet(&self, pet_id: i32) -> AppResult<Vec<Consultation>> {
        let models = ConsultationEntity::find()
            .filter(consultation::Column::PetId.eq(pet_id))
            .order_by_desc(consultation::Column::HeldAt)
            .order_by_desc(consultation::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Consultation::from).collect())
    }

    async fn create(&self, new: NewConsultation) -> AppResult<Consultation> {
        let active_model = ActiveModel {
            pet_id: Set(new.pet_id),
            clinic_id: Set(new.clinic_id),
            held_at: Set(new.held_at),
            vet_name: Set(new.vet_name),
            diagnosis: Set(new.diagnosis),
            prescription: Set(new.prescription),
            notes: Set(new.notes),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(Consultation::from(model)),
            Err(e) => Err(match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::NotFound("pet or clinic")
                }
                _ => AppError::Database(e),
            }),
        }
    }
}
