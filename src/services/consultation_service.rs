//! Consultation service - Medical history of the requester's pets.
//!
//! Every operation is scoped to the pet owner: a pet that belongs to
//! someone else yields `Forbidden`, never its records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::try_join;

use super::container::parallel;
use crate::domain::{
    Clinic, Consultation, ConsultationHistory, ConsultationRecord, NewConsultation, Pet,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Max clinics looked up concurrently for a history
const CLINIC_LOOKUP_CONCURRENCY: usize = 4;

#[async_trait]
pub trait ConsultationService: Send + Sync {
    /// Record a consultation for one of the requester's pets
    async fn record(
        &self,
        consultation: NewConsultation,
        requester_id: i32,
    ) -> AppResult<ConsultationRecord>;

    /// Every consultation of the pet, newest first
    async fn history(&self, pet_id: i32, requester_id: i32) -> AppResult<ConsultationHistory>;

    async fn get_detail(&self, id: i32, requester_id: i32) -> AppResult<ConsultationRecord>;
}

pub struct ConsultationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ConsultationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load pet and clinic together
    async fn pet_and_clinic(&self, pet_id: i32, clinic_id: i32) -> AppResult<(Pet, Clinic)> {
        let pets = self.uow.pets();
        let clinics = self.uow.clinics();

        let (pet, clinic) = try_join!(pets.find_by_id(pet_id), clinics.find_by_id(clinic_id))?;
        Ok((pet.ok_or_not_found("pet")?, clinic.ok_or_not_found("clinic")?))
    }
}

fn ensure_owner(pet: &Pet, requester_id: i32) -> AppResult<()> {
    if !pet.is_owned_by(requester_id) {
        tracing::warn!(
            pet_id = pet.id,
            requester = requester_id,
            "Consultation access rejected: pet belongs to another user"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> ConsultationService for ConsultationManager<U> {
    async fn record(
        &self,
        consultation: NewConsultation,
        requester_id: i32,
    ) -> AppResult<ConsultationRecord> {
        let (pet, clinic) = self
            .pet_and_clinic(consultation.pet_id, consultation.clinic_id)
            .await?;
        ensure_owner(&pet, requester_id)?;

        let consultation = self.uow.consultations().create(consultation).await?;

        tracing::info!(
            consultation_id = consultation.id,
            pet_id = pet.id,
            clinic_id = clinic.id,
            held_at = %consultation.held_at,
            "Consultation recorded"
        );

        Ok(ConsultationRecord {
            consultation,
            pet,
            clinic,
        })
    }

    async fn history(&self, pet_id: i32, requester_id: i32) -> AppResult<ConsultationHistory> {
        let pet = self
            .uow
            .pets()
            .find_by_id(pet_id)
            .await?
            .ok_or_not_found("pet")?;
        ensure_owner(&pet, requester_id)?;

        let consultations = self.uow.consultations().list_by_pet(pet_id).await?;

        let mut clinic_ids: Vec<i32> = consultations.iter().map(|c| c.clinic_id).collect();
        clinic_ids.sort_unstable();
        clinic_ids.dedup();

        let clinics = self.uow.clinics();
        let found = parallel::join_all_limited(
            clinic_ids.iter().copied().map(|id| clinics.find_by_id(id)),
            CLINIC_LOOKUP_CONCURRENCY,
        )
        .await?;
        let by_id: HashMap<i32, Clinic> = found
            .into_iter()
            .flatten()
            .map(|clinic| (clinic.id, clinic))
            .collect();

        let entries = consultations
            .into_iter()
            .map(|consultation: Consultation| {
                let clinic = by_id
                    .get(&consultation.clinic_id)
                    .cloned()
                    .ok_or_not_found("clinic")?;
                Ok((consultation, clinic))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ConsultationHistory { pet, entries })
    }

    async fn get_detail(&self, id: i32, requester_id: i32) -> AppResult<ConsultationRecord> {
        let consultation = self
            .uow
            .consultations()
            .find_by_id(id)
            .await?
            .ok_or_not_found("consultation")?;

        let (pet, clinic) = self
            .pet_and_clinic(consultation.pet_id, consultation.clinic_id)
            .await?;
        ensure_owner(&pet, requester_id)?;

        Ok(ConsultationRecord {
            consultation,
            pet,
            clinic,
        })
    }
}
