//! Appointment database entity for SeaORM.
//!
//! Status is stored as text; rows with an unknown status fail conversion.

use sea_orm::entity::prelude::*;

use crate::domain::{Appointment, AppointmentStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "agendamentos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub time_slot: Time,
    pub status: String,
    pub pet_id: i32,
    pub service_type_id: i32,
    pub clinic_id: i32,
    pub user_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pet::Entity",
        from = "Column::PetId",
        to = "super::pet::Column::Id"
    )]
    Pet,
    #[sea_orm(
        belongs_to = "super::service_type::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_type::Column::Id"
    )]
    ServiceType,
    #[sea_orm(
        belongs_to = "super::clinic::Entity",
        from = "Column::ClinicId",
        to = "super::clinic::Column::Id"
    )]
    Clinic,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Appointment {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&model.status).ok_or_else(|| {
            AppError::internal(format!(
                "appointment {} has unknown status {:?}",
                model.id, model.status
            ))
        })?;

        Ok(Appointment {
            id: model.id,
            date: model.date,
            time_slot: model.time_slot,
            status,
            pet_id: model.pet_id,
            service_type_id: model.service_type_id,
            clinic_id: model.clinic_id,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
