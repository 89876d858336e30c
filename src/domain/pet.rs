//! Pets owned by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pet domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub breed: String,
    /// Weight in kilograms
    pub weight: Option<f64>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub weight: Option<f64>,
    pub owner_id: i32,
}

/// Partial pet update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Rex")]
    pub nome: String,
    #[schema(example = "Cachorro")]
    pub especie: String,
    #[schema(example = "Labrador")]
    pub raca: String,
    #[schema(example = 28.5)]
    pub peso: Option<f64>,
    #[schema(example = 7)]
    pub id_usuario: i32,
}

impl From<Pet> for PetResponse {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            nome: pet.name,
            especie: pet.species,
            raca: pet.breed,
            peso: pet.weight,
            id_usuario: pet.owner_id,
        }
    }
}
