//! Pet repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use super::entities::pet::{self, ActiveModel, Entity as PetEntity};
use crate::domain::{NewPet, Pet, PetUpdate};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Pet>>;

    /// Pets of one owner, oldest first
    async fn list_by_owner(&self, owner_id: i32) -> AppResult<Vec<Pet>>;

    async fn create(&self, pet: NewPet) -> AppResult<Pet>;

    async fn update(&self, id: i32, changes: PetUpdate) -> AppResult<Pet>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct PetStore {
    db: DatabaseConnection,
}

impl PetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetRepository for PetStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Pet>> {
        let result = PetEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Pet::from))
    }

    async fn list_by_owner(&self, owner_id: i32) -> AppResult<Vec<Pet>> {
        let models = PetEntity::find()
            .filter(pet::Column::OwnerId.eq(owner_id))
            .order_by_asc(pet::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Pet::from).collect())
    }

    async fn create(&self, pet: NewPet) -> AppResult<Pet> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(pet.name),
            species: Set(pet.species),
            breed: Set(pet.breed),
            weight: Set(pet.weight),
            owner_id: Set(pet.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Pet::from(model))
    }

    async fn update(&self, id: i32, changes: PetUpdate) -> AppResult<Pet> {
        let pet = PetEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("pet")?;

        let mut active: ActiveModel = pet.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(species) = changes.species {
            active.species = Set(species);
        }
        if let Some(breed) = changes.breed {
            active.breed = Set(breed);
        }
        if let Some(weight) = changes.weight {
            active.weight = Set(Some(weight));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Pet::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = PetEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::invalid_state("Pet has appointment history and cannot be removed")
                }
                _ => AppError::Database(e),
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("pet"));
        }

        Ok(())
    }
}
