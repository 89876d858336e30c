//! Clinic street address and coordinates, one row per clinic.

use sea_orm::entity::prelude::*;

use crate::domain::ClinicLocation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "localizacoes_clinica")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub clinic_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clinic::Entity",
        from = "Column::ClinicId",
        to = "super::clinic::Column::Id",
        on_delete = "Cascade"
    )]
    Clinic,
}

impl Related<super::clinic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clinic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClinicLocation {
    fn from(model: Model) -> Self {
        ClinicLocation {
            id: model.id,
            clinic_id: model.clinic_id,
            latitude: model.latitude,
            longitude: model.longitude,
            address: model.address,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            updated_at: model.updated_at,
        }
    }
}
