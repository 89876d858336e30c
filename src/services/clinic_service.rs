//! Clinic service - Clinic profiles, opening hours and offered services.

use async_trait::async_trait;
use std::sync::Arc;

use super::container::parallel;
use crate::domain::{
    Clinic, ClinicLocation, ClinicProfile, ClinicUpdate, NewClinicLocation, NewOperatingHours,
    OperatingHours, Service,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

const LOOKUP_CONCURRENCY: usize = 8;

#[async_trait]
pub trait ClinicService: Send + Sync {
    /// One page of clinics plus the total count
    async fn list_clinics(&self, params: &PaginationParams) -> AppResult<(Vec<Clinic>, u64)>;

    /// Clinic with opening hours, offered services and location
    async fn get_clinic(&self, id: i32) -> AppResult<ClinicProfile>;

    /// Clinics may only edit themselves
    async fn update_clinic(
        &self,
        id: i32,
        requester_id: i32,
        changes: ClinicUpdate,
    ) -> AppResult<Clinic>;

    async fn delete_clinic(&self, id: i32, requester_id: i32) -> AppResult<()>;

    async fn add_operating_hours(
        &self,
        clinic_id: i32,
        hours: Vec<NewOperatingHours>,
    ) -> AppResult<Vec<OperatingHours>>;

    /// Link catalog services to the clinic and return everything it offers
    async fn add_services(&self, clinic_id: i32, service_ids: Vec<i32>) -> AppResult<Vec<Service>>;

    /// Set the clinic's address and coordinates, replacing earlier ones
    async fn save_location(&self, location: NewClinicLocation) -> AppResult<ClinicLocation>;
}

pub struct ClinicManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ClinicManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn ensure_self(id: i32, requester_id: i32) -> AppResult<()> {
    if id != requester_id {
        tracing::warn!(clinic_id = id, requester = requester_id, "Clinic tried to modify another clinic");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> ClinicService for ClinicManager<U> {
    async fn list_clinics(&self, params: &PaginationParams) -> AppResult<(Vec<Clinic>, u64)> {
        self.uow.clinics().list_paginated(params).await
    }

    async fn get_clinic(&self, id: i32) -> AppResult<ClinicProfile> {
        let clinics = self.uow.clinics();

        let (clinic, hours, services, location) = parallel::join4(
            clinics.find_by_id(id),
            clinics.list_operating_hours(id),
            clinics.list_services(id),
            clinics.find_location(id),
        )
        .await?;

        Ok(ClinicProfile {
            clinic: clinic.ok_or_not_found("clinic")?,
            hours,
            services,
            location,
        })
    }

    async fn update_clinic(
        &self,
        id: i32,
        requester_id: i32,
        changes: ClinicUpdate,
    ) -> AppResult<Clinic> {
        ensure_self(id, requester_id)?;
        self.uow.clinics().update(id, changes).await
    }

    async fn delete_clinic(&self, id: i32, requester_id: i32) -> AppResult<()> {
        ensure_self(id, requester_id)?;
        self.uow.clinics().delete(id).await?;
        tracing::info!(clinic_id = id, "Clinic removed");
        Ok(())
    }

    async fn add_operating_hours(
        &self,
        clinic_id: i32,
        hours: Vec<NewOperatingHours>,
    ) -> AppResult<Vec<OperatingHours>> {
        if hours.is_empty() {
            return Err(AppError::validation(
                "horarios",
                "At least one opening window is required",
            ));
        }

        let errors: Vec<_> = hours
            .iter()
            .enumerate()
            .flat_map(|(index, entry)| entry.check(index))
            .collect();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let hours = hours
            .into_iter()
            .map(|entry| NewOperatingHours { clinic_id, ..entry })
            .collect();
        self.uow.clinics().add_operating_hours(hours).await
    }

    async fn add_services(&self, clinic_id: i32, service_ids: Vec<i32>) -> AppResult<Vec<Service>> {
        let mut ids = service_ids;
        ids.sort_unstable();
        ids.dedup();

        let catalog = self.uow.catalog();
        let found = parallel::join_all_limited(
            ids.iter().copied().map(|id| catalog.find_service(id)),
            LOOKUP_CONCURRENCY,
        )
        .await?;
        if found.iter().any(Option::is_none) {
            return Err(AppError::NotFound("service"));
        }

        let clinics = self.uow.clinics();
        clinics.link_services(clinic_id, ids).await?;
        clinics.list_services(clinic_id).await
    }

    async fn save_location(&self, location: NewClinicLocation) -> AppResult<ClinicLocation> {
        let clinics = self.uow.clinics();
        clinics
            .find_by_id(location.clinic_id)
            .await?
            .ok_or_not_found("clinic")?;

        let saved = clinics.save_location(location).await?;
        tracing::info!(clinic_id = saved.clinic_id, city = %saved.city, "Clinic location saved");
        Ok(saved)
    }
}
