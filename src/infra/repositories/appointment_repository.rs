//! Appointment repository implementation.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::entities::appointment::{self, ActiveModel, Entity as AppointmentEntity};
use crate::domain::{Appointment, AppointmentStatus, NewAppointment};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Appointment repository trait for dependency injection.
///
/// Listings are ordered by date, then slot.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Appointment>>;

    /// The SCHEDULED appointment holding a clinic slot, if any
    async fn find_scheduled_slot(
        &self,
        clinic_id: i32,
        date: NaiveDate,
        time_slot: NaiveTime,
    ) -> AppResult<Option<Appointment>>;

    /// Persist as SCHEDULED. A slot taken concurrently yields `Conflict`.
    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    async fn update_status(&self, id: i32, status: AppointmentStatus) -> AppResult<Appointment>;

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Appointment>>;

    async fn list_by_clinic(&self, clinic_id: i32) -> AppResult<Vec<Appointment>>;

    async fn has_scheduled_for_pet(&self, pet_id: i32) -> AppResult<bool>;
}

pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_domain(models: Vec<appointment::Model>) -> AppResult<Vec<Appointment>> {
    models.into_iter().map(Appointment::try_from).collect()
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Appointment>> {
        AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn find_scheduled_slot(
        &self,
        clinic_id: i32,
        date: NaiveDate,
        time_slot: NaiveTime,
    ) -> AppResult<Option<Appointment>> {
        AppointmentEntity::find()
            .filter(appointment::Column::ClinicId.eq(clinic_id))
            .filter(appointment::Column::Date.eq(date))
            .filter(appointment::Column::TimeSlot.eq(time_slot))
            .filter(appointment::Column::Status.eq(AppointmentStatus::Scheduled.as_str()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn create(&self, new: NewAppointment) -> AppResult<Appointment> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            date: Set(new.date),
            time_slot: Set(new.time_slot),
            status: Set(AppointmentStatus::Scheduled.as_str().to_string()),
            pet_id: Set(new.pet_id),
            service_type_id: Set(new.service_type_id),
            clinic_id: Set(new.clinic_id),
            user_id: Set(new.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            AppError::from_unique_violation(e, "Time slot already booked at this clinic")
        })?;

        Appointment::try_from(model)
    }

    async fn update_status(&self, id: i32, status: AppointmentStatus) -> AppResult<Appointment> {
        let existing = AppointmentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("appointment")?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Appointment::try_from(model)
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(appointment::Column::UserId.eq(user_id))
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::TimeSlot)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        into_domain(models)
    }

    async fn list_by_clinic(&self, clinic_id: i32) -> AppResult<Vec<Appointment>> {
        let models = AppointmentEntity::find()
            .filter(appointment::Column::ClinicId.eq(clinic_id))
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::TimeSlot)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        into_domain(models)
    }

    async fn has_scheduled_for_pet(&self, pet_id: i32) -> AppResult<bool> {
        let count = AppointmentEntity::find()
            .filter(appointment::Column::PetId.eq(pet_id))
            .filter(appointment::Column::Status.eq(AppointmentStatus::Scheduled.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }
}
