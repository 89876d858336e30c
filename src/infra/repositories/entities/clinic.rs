//! Clinic database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Clinic;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clinicas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub cnpj: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub rating: f64,
    pub rating_count: i32,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operating_hours::Entity")]
    OperatingHours,
}

impl Related<super::operating_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatingHours.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Clinic {
    fn from(model: Model) -> Self {
        Clinic {
            id: model.id,
            name: model.name,
            cnpj: model.cnpj,
            phone: model.phone,
            photo_url: model.photo_url,
            rating: model.rating,
            rating_count: model.rating_count,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
