//! Pet service - Owner-scoped pet management.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewPet, Pet, PetUpdate};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait PetService: Send + Sync {
    async fn list_pets(&self, owner_id: i32) -> AppResult<Vec<Pet>>;

    async fn create_pet(&self, pet: NewPet) -> AppResult<Pet>;

    async fn get_pet(&self, id: i32, owner_id: i32) -> AppResult<Pet>;

    async fn update_pet(&self, id: i32, owner_id: i32, changes: PetUpdate) -> AppResult<Pet>;

    /// Refused with `InvalidState` while the pet has scheduled appointments
    async fn delete_pet(&self, id: i32, owner_id: i32) -> AppResult<()>;
}

pub struct PetManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PetManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_pet(&self, id: i32, owner_id: i32) -> AppResult<Pet> {
        let pet = self.uow.pets().find_by_id(id).await?.ok_or_not_found("pet")?;
        if !pet.is_owned_by(owner_id) {
            tracing::warn!(pet_id = id, requester = owner_id, "Pet belongs to another user");
            return Err(AppError::Forbidden);
        }
        Ok(pet)
    }
}

#[async_trait]
impl<U: UnitOfWork> PetService for PetManager<U> {
    async fn list_pets(&self, owner_id: i32) -> AppResult<Vec<Pet>> {
        self.uow.pets().list_by_owner(owner_id).await
    }

    async fn create_pet(&self, pet: NewPet) -> AppResult<Pet> {
        self.uow.pets().create(pet).await
    }

    async fn get_pet(&self, id: i32, owner_id: i32) -> AppResult<Pet> {
        self.owned_pet(id, owner_id).await
    }

    async fn update_pet(&self, id: i32, owner_id: i32, changes: PetUpdate) -> AppResult<Pet> {
        self.owned_pet(id, owner_id).await?;
        self.uow.pets().update(id, changes).await
    }

    async fn delete_pet(&self, id: i32, owner_id: i32) -> AppResult<()> {
        self.owned_pet(id, owner_id).await?;

        if self.uow.appointments().has_scheduled_for_pet(id).await? {
            return Err(AppError::invalid_state(
                "Pet has scheduled appointments; cancel them first",
            ));
        }

        self.uow.pets().delete(id).await?;
        tracing::info!(pet_id = id, owner_id, "Pet removed");
        Ok(())
    }
}
