//! Clinic opening hours per weekday.

use sea_orm::entity::prelude::*;

use crate::domain::OperatingHours;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "horarios_funcionamento")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub clinic_id: i32,
    pub weekday: i16,
    pub opens_at: Time,
    pub closes_at: Time,
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

impl From<Model> for OperatingHours {
    fn from(model: Model) -> Self {
        OperatingHours {
            id: model.id,
            clinic_id: model.clinic_id,
            weekday: model.weekday,
            opens_at: model.opens_at,
            closes_at: model.closes_at,
        }
    }
}
