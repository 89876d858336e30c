//! Consultation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Consultation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consultas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pet_id: i32,
    pub clinic_id: i32,
    pub held_at: DateTime,
    pub vet_name: String,
    #[sea_orm(column_type = "Text")]
    pub diagnosis: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub prescription: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pet::Entity",
        from = "Column::PetId",
        to = "super::pet::Column::Id",
        on_delete = "Cascade"
    )]
    Pet,
    #[sea_orm(
        belongs_to = "super::clinic::Entity",
        from = "Column::ClinicId",
        to = "super::clinic::Column::Id"
    )]
    Clinic,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Consultation {
    fn from(model: Model) -> Self {
        Consultation {
            id: model.id,
            pet_id: model.pet_id,
            clinic_id: model.clinic_id,
            held_at: model.held_at,
            vet_name: model.vet_name,
            diagnosis: model.diagnosis,
            prescription: model.prescription,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}
