//! Appointment service - The booking workflow.
//!
//! Booking checks run in a fixed order and stop at the first failure:
//! past date, request shape, pet ownership, service type, clinic, then
//! slot availability. Nothing is written before every check passes.

use async_trait::async_trait;
use std::sync::Arc;

use super::clock::Clock;
use super::container::parallel;
use crate::domain::{Appointment, AppointmentDetails, ScheduleAppointmentRequest};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Max appointments expanded concurrently in a listing
const EXPANSION_CONCURRENCY: usize = 8;

#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book a slot for one of the requester's pets
    async fn schedule(
        &self,
        request: ScheduleAppointmentRequest,
        requester_id: i32,
    ) -> AppResult<AppointmentDetails>;

    /// Cancel one of the requester's scheduled appointments
    async fn cancel(&self, id: i32, requester_id: i32) -> AppResult<AppointmentDetails>;

    /// The requester's appointments ordered by date, then slot
    async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<AppointmentDetails>>;

    async fn get_detail(&self, id: i32, requester_id: i32) -> AppResult<AppointmentDetails>;

    /// Appointments booked at a clinic ordered by date, then slot
    async fn list_for_clinic(&self, clinic_id: i32) -> AppResult<Vec<AppointmentDetails>>;

    /// Mark a scheduled appointment at the clinic as completed
    async fn complete(&self, id: i32, clinic_id: i32) -> AppResult<AppointmentDetails>;
}

pub struct AppointmentManager<U: UnitOfWork> {
    uow: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U: UnitOfWork> AppointmentManager<U> {
    pub fn new(uow: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    /// Load the pet, service type and clinic of an appointment concurrently
    async fn expand(&self, appointment: Appointment) -> AppResult<AppointmentDetails> {
        let pets = self.uow.pets();
        let catalog = self.uow.catalog();
        let clinics = self.uow.clinics();

        let (pet, service_type, clinic) = parallel::join3(
            pets.find_by_id(appointment.pet_id),
            catalog.find_service_type(appointment.service_type_id),
            clinics.find_by_id(appointment.clinic_id),
        )
        .await?;

        Ok(AppointmentDetails {
            pet: pet.ok_or_not_found("pet")?,
            service_type: service_type.ok_or_not_found("serviceType")?,
            clinic: clinic.ok_or_not_found("clinic")?,
            appointment,
        })
    }

    async fn expand_all(&self, appointments: Vec<Appointment>) -> AppResult<Vec<AppointmentDetails>> {
        parallel::join_all_limited(
            appointments.into_iter().map(|a| self.expand(a)),
            EXPANSION_CONCURRENCY,
        )
        .await
    }

    async fn find(&self, id: i32) -> AppResult<Appointment> {
        self.uow
            .appointments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("appointment")
    }
}

#[async_trait]
impl<U: UnitOfWork> AppointmentService for AppointmentManager<U> {
    async fn schedule(
        &self,
        request: ScheduleAppointmentRequest,
        requester_id: i32,
    ) -> AppResult<AppointmentDetails> {
        if let Some(requested_at) = request.requested_at() {
            if requested_at < self.clock.now() {
                tracing::debug!(%requested_at, "Booking rejected: date in the past");
                return Err(AppError::PastDate);
            }
        }

        let draft = request.validate_draft().map_err(AppError::Validation)?;

        let pet = self
            .uow
            .pets()
            .find_by_id(draft.pet_id)
            .await?
            .ok_or_not_found("pet")?;
        if !pet.is_owned_by(requester_id) {
            tracing::warn!(
                pet_id = pet.id,
                requester = requester_id,
                "Booking rejected: pet belongs to another user"
            );
            return Err(AppError::Forbidden);
        }

        let service_type = self
            .uow
            .catalog()
            .find_service_type(draft.service_type_id)
            .await?
            .ok_or_not_found("serviceType")?;

        let clinic = self
            .uow
            .clinics()
            .find_by_id(draft.clinic_id)
            .await?
            .ok_or_not_found("clinic")?;

        let appointments = self.uow.appointments();
        if let Some(existing) = appointments
            .find_scheduled_slot(draft.clinic_id, draft.date, draft.time_slot)
            .await?
        {
            tracing::info!(
                clinic_id = draft.clinic_id,
                date = %draft.date,
                slot = %draft.time_slot,
                existing_id = existing.id,
                "Booking rejected: slot taken"
            );
            return Err(AppError::conflict("Time slot already booked at this clinic"));
        }

        let appointment = appointments.create(draft.into_new(requester_id)).await?;

        tracing::info!(
            appointment_id = appointment.id,
            clinic_id = appointment.clinic_id,
            user_id = requester_id,
            starts_at = %draft.starts_at(),
            "Appointment booked"
        );

        Ok(AppointmentDetails {
            appointment,
            pet,
            service_type,
            clinic,
        })
    }

    async fn cancel(&self, id: i32, requester_id: i32) -> AppResult<AppointmentDetails> {
        let appointment = self.find(id).await?;
        if !appointment.is_owned_by(requester_id) {
            tracing::warn!(
                appointment_id = id,
                requester = requester_id,
                "Cancel rejected: appointment belongs to another user"
            );
            return Err(AppError::Forbidden);
        }

        let next = appointment.status.cancel()?;
        let updated = self.uow.appointments().update_status(id, next).await?;

        tracing::info!(appointment_id = id, user_id = requester_id, "Appointment cancelled");
        self.expand(updated).await
    }

    async fn list_for_user(&self, requester_id: i32) -> AppResult<Vec<AppointmentDetails>> {
        let appointments = self.uow.appointments().list_by_user(requester_id).await?;
        self.expand_all(appointments).await
    }

    async fn get_detail(&self, id: i32, requester_id: i32) -> AppResult<AppointmentDetails> {
        let appointment = self.find(id).await?;
        if !appointment.is_owned_by(requester_id) {
            return Err(AppError::Forbidden);
        }
        self.expand(appointment).await
    }

    async fn list_for_clinic(&self, clinic_id: i32) -> AppResult<Vec<AppointmentDetails>> {
        let appointments = self.uow.appointments().list_by_clinic(clinic_id).await?;
        self.expand_all(appointments).await
    }

    async fn complete(&self, id: i32, clinic_id: i32) -> AppResult<AppointmentDetails> {
        let appointment = self.find(id).await?;
        if appointment.clinic_id != clinic_id {
            tracing::warn!(
                appointment_id = id,
                clinic_id,
                "Complete rejected: appointment booked at another clinic"
            );
            return Err(AppError::Forbidden);
        }

        let next = appointment.status.complete()?;
        let updated = self.uow.appointments().update_status(id, next).await?;

        tracing::info!(appointment_id = id, clinic_id, "Appointment completed");
        self.expand(updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppointmentStatus, Clinic, Pet, ServiceType};
    use crate::infra::{
        MockAppointmentRepository, MockCatalogRepository, MockClinicRepository,
        MockConsultationRepository, MockPetRepository, MockUserRepository, Persistence,
    };
    use crate::services::FixedClock;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use serde_json::json;

    fn fixed_now() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn request(date: &str) -> ScheduleAppointmentRequest {
        ScheduleAppointmentRequest {
            data_agendamento: Some(json!(date)),
            horario_agendamento: Some(json!("10:00")),
            id_tipo_servico: Some(json!(2)),
            id_pet: Some(json!(1)),
            id_clinica: Some(json!(3)),
        }
    }

    fn pet(owner_id: i32) -> Pet {
        Pet {
            id: 1,
            name: "Rex".to_string(),
            species: "Cachorro".to_string(),
            breed: "Labrador".to_string(),
            weight: None,
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn clinic() -> Clinic {
        Clinic {
            id: 3,
            name: "Vida Animal".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            phone: "11 98765-4321".to_string(),
            photo_url: None,
            rating: 0.0,
            rating_count: 0,
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn appointment(id: i32, user_id: i32, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time_slot: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status,
            pet_id: 1,
            service_type_id: 2,
            clinic_id: 3,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct Mocks {
        pets: MockPetRepository,
        catalog: MockCatalogRepository,
        clinics: MockClinicRepository,
        appointments: MockAppointmentRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                pets: MockPetRepository::new(),
                catalog: MockCatalogRepository::new(),
                clinics: MockClinicRepository::new(),
                appointments: MockAppointmentRepository::new(),
            }
        }

        /// Pet 1 owned by user 7, service type 2 and clinic 3 all exist
        fn with_references(mut self) -> Self {
            self.pets.expect_find_by_id().returning(|_| Ok(Some(pet(7))));
            self.catalog.expect_find_service_type().returning(|id| {
                Ok(Some(ServiceType {
                    id,
                    name: "V10".to_string(),
                    service_id: 1,
                }))
            });
            self.clinics.expect_find_by_id().returning(|_| Ok(Some(clinic())));
            self
        }

        fn build(self) -> AppointmentManager<Persistence> {
            AppointmentManager::new(
                Arc::new(Persistence::from_repositories(
                    Arc::new(MockUserRepository::new()),
                    Arc::new(self.clinics),
                    Arc::new(self.pets),
                    Arc::new(self.catalog),
                    Arc::new(self.appointments),
                    Arc::new(MockConsultationRepository::new()),
                )),
                Arc::new(fixed_now()),
            )
        }
    }

    #[tokio::test]
    async fn test_schedule_success() {
        let mut mocks = Mocks::new().with_references();
        mocks
            .appointments
            .expect_find_scheduled_slot()
            .returning(|_, _, _| Ok(None));
        mocks
            .appointments
            .expect_create()
            .withf(|new| new.user_id == 7 && new.clinic_id == 3)
            .times(1)
            .returning(|_| Ok(appointment(10, 7, AppointmentStatus::Scheduled)));

        let details = mocks.build().schedule(request("2025-06-01"), 7).await.unwrap();
        assert_eq!(details.appointment.id, 10);
        assert_eq!(details.pet.id, 1);
        assert_eq!(details.clinic.id, 3);
    }

    #[tokio::test]
    async fn test_past_date_wins_over_other_errors() {
        let mut mocks = Mocks::new();
        mocks.pets.expect_find_by_id().never();

        let bad = ScheduleAppointmentRequest {
            id_pet: None,
            id_clinica: Some(json!(-1)),
            ..request("2020-01-01")
        };
        let result = mocks.build().schedule(bad, 7).await;
        assert!(matches!(result, Err(AppError::PastDate)));
    }

    #[tokio::test]
    async fn test_earlier_today_is_past() {
        let result = Mocks::new()
            .build()
            .schedule(
                ScheduleAppointmentRequest {
                    horario_agendamento: Some(json!("11:59")),
                    ..request("2025-05-01")
                },
                7,
            )
            .await;
        assert!(matches!(result, Err(AppError::PastDate)));
    }

    #[tokio::test]
    async fn test_missing_fields_listed() {
        let result = Mocks::new()
            .build()
            .schedule(
                ScheduleAppointmentRequest {
                    id_pet: None,
                    id_tipo_servico: None,
                    ..request("2025-06-01")
                },
                7,
            )
            .await;

        match result {
            Err(AppError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["id_pet", "id_tipo_servico"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pet_of_other_user_forbidden() {
        let mut mocks = Mocks::new().with_references();
        mocks.appointments.expect_create().never();

        let result = mocks.build().schedule(request("2025-06-01"), 8).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_missing_references_not_found_in_order() {
        let mut mocks = Mocks::new();
        mocks.pets.expect_find_by_id().returning(|_| Ok(Some(pet(7))));
        mocks.catalog.expect_find_service_type().returning(|_| Ok(None));
        mocks.clinics.expect_find_by_id().never();

        let result = mocks.build().schedule(request("2025-06-01"), 7).await;
        assert!(matches!(result, Err(AppError::NotFound("serviceType"))));
    }

    #[tokio::test]
    async fn test_taken_slot_conflicts() {
        let mut mocks = Mocks::new().with_references();
        mocks
            .appointments
            .expect_find_scheduled_slot()
            .returning(|_, _, _| Ok(Some(appointment(10, 9, AppointmentStatus::Scheduled))));
        mocks.appointments.expect_create().never();

        let result = mocks.build().schedule(request("2025-06-01"), 7).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_store_race_reported_as_conflict() {
        let mut mocks = Mocks::new().with_references();
        mocks
            .appointments
            .expect_find_scheduled_slot()
            .returning(|_, _, _| Ok(None));
        mocks
            .appointments
            .expect_create()
            .returning(|_| Err(AppError::conflict("Time slot already booked at this clinic")));

        let result = mocks.build().schedule(request("2025-06-01"), 7).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cancel_by_other_user_forbidden() {
        let mut mocks = Mocks::new();
        mocks
            .appointments
            .expect_find_by_id()
            .returning(|id| Ok(Some(appointment(id, 7, AppointmentStatus::Scheduled))));
        mocks.appointments.expect_update_status().never();

        let result = mocks.build().cancel(10, 8).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_cancel_cancelled_is_invalid_state() {
        let mut mocks = Mocks::new();
        mocks
            .appointments
            .expect_find_by_id()
            .returning(|id| Ok(Some(appointment(id, 7, AppointmentStatus::Cancelled))));
        mocks.appointments.expect_update_status().never();

        let result = mocks.build().cancel(10, 7).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_cancel_missing_not_found() {
        let mut mocks = Mocks::new();
        mocks.appointments.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks.build().cancel(404, 7).await;
        assert!(matches!(result, Err(AppError::NotFound("appointment"))));
    }

    #[tokio::test]
    async fn test_complete_at_other_clinic_forbidden() {
        let mut mocks = Mocks::new();
        mocks
            .appointments
            .expect_find_by_id()
            .returning(|id| Ok(Some(appointment(id, 7, AppointmentStatus::Scheduled))));
        mocks.appointments.expect_update_status().never();

        let result = mocks.build().complete(10, 4).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_complete_scheduled() {
        let mut mocks = Mocks::new().with_references();
        mocks
            .appointments
            .expect_find_by_id()
            .returning(|id| Ok(Some(appointment(id, 7, AppointmentStatus::Scheduled))));
        mocks
            .appointments
            .expect_update_status()
            .withf(|_, status| *status == AppointmentStatus::Completed)
            .returning(|id, status| Ok(appointment(id, 7, status)));

        let details = mocks.build().complete(10, 3).await.unwrap();
        assert_eq!(details.appointment.status, AppointmentStatus::Completed);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mut mocks = Mocks::new();
        mocks.appointments.expect_list_by_user().returning(|_| Ok(vec![]));

        let list = mocks.build().list_for_user(7).await.unwrap();
        assert!(list.is_empty());
    }
}
