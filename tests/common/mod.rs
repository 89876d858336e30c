//! Shared fixtures for integration tests.
//!
//! `MemoryStore` implements every repository over plain vectors so the
//! services and the router run without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

use vetmanager_api::domain::{
    Appointment, AppointmentStatus, Clinic, ClinicLocation, ClinicUpdate, Consultation,
    NewAppointment, NewClinic, NewClinicLocation, NewConsultation, NewOperatingHours, NewPet,
    NewService, NewServiceType, NewUser, OperatingHours, Pet, PetUpdate, Service, ServiceType,
    User,
};
use vetmanager_api::errors::{AppError, AppResult};
use vetmanager_api::infra::{
    AppointmentRepository, CatalogRepository, ClinicRepository, ConsultationRepository,
    PetRepository, UnitOfWork, UserRepository,
};
use vetmanager_api::services::{FixedClock, Services, TokenIssuer};
use vetmanager_api::types::PaginationParams;
use vetmanager_api::AuthRole;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// "Now" for every scenario: 2025-05-01 12:00
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    clinics: Vec<Clinic>,
    hours: Vec<OperatingHours>,
    clinic_services: Vec<(i32, i32)>,
    services: Vec<Service>,
    service_types: Vec<ServiceType>,
    pets: Vec<Pet>,
    appointments: Vec<Appointment>,
    consultations: Vec<Consultation>,
    locations: Vec<ClinicLocation>,
    next_id: i32,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        100 + self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn seed_user(&self, id: i32, email: &str) {
        self.lock().users.push(User {
            id,
            name: format!("User {}", id),
            email: email.to_string(),
            cpf: format!("000.000.000-{:02}", id),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn seed_clinic(&self, id: i32, cnpj: &str) {
        self.lock().clinics.push(Clinic {
            id,
            name: format!("Clínica {}", id),
            cnpj: cnpj.to_string(),
            phone: "11 3333-4444".to_string(),
            photo_url: None,
            rating: 0.0,
            rating_count: 0,
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn seed_pet(&self, id: i32, owner_id: i32) {
        self.lock().pets.push(Pet {
            id,
            name: "Rex".to_string(),
            species: "Cachorro".to_string(),
            breed: "Labrador".to_string(),
            weight: Some(28.5),
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn seed_service_type(&self, id: i32, service_id: i32) {
        let mut tables = self.lock();
        tables.services.push(Service {
            id: service_id,
            name: "Vacinação".to_string(),
            description: "Aplicação de vacinas".to_string(),
            price: 120.0,
        });
        tables.service_types.push(ServiceType {
            id,
            name: "V10".to_string(),
            service_id,
        });
    }

    /// User #7 owning pet #1, clinic #3 and service type #2
    pub fn with_booking_references() -> Self {
        let store = Self::default();
        store.seed_user(7, "maria@example.com");
        store.seed_user(8, "joao@example.com");
        store.seed_pet(1, 7);
        store.seed_clinic(3, "12.345.678/0001-90");
        store.seed_service_type(2, 1);
        store
    }

    pub fn appointment_count(&self) -> usize {
        self.lock().appointments.len()
    }

    pub fn consultation_count(&self) -> usize {
        self.lock().consultations.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.cpf == cpf).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.email == user.email || u.cpf == user.cpf)
        {
            return Err(AppError::conflict("Email or CPF already registered"));
        }
        let created = User {
            id: tables.id(),
            name: user.name,
            email: user.email,
            cpf: user.cpf,
            password_hash: user.password_hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ClinicRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Clinic>> {
        Ok(self.lock().clinics.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> AppResult<Option<Clinic>> {
        Ok(self.lock().clinics.iter().find(|c| c.cnpj == cnpj).cloned())
    }

    async fn list_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<Clinic>, u64)> {
        let tables = self.lock();
        let mut clinics = tables.clinics.clone();
        clinics.sort_by_key(|c| c.id);
        let total = clinics.len() as u64;
        let page = clinics
            .into_iter()
            .skip(((params.page() - 1) * params.limit()) as usize)
            .take(params.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn create(&self, clinic: NewClinic) -> AppResult<Clinic> {
        let mut tables = self.lock();
        if tables.clinics.iter().any(|c| c.cnpj == clinic.cnpj) {
            return Err(AppError::conflict("CNPJ already registered"));
        }
        let created = Clinic {
            id: tables.id(),
            name: clinic.name,
            cnpj: clinic.cnpj,
            phone: clinic.phone,
            photo_url: clinic.photo_url,
            rating: 0.0,
            rating_count: 0,
            password_hash: clinic.password_hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.clinics.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: ClinicUpdate) -> AppResult<Clinic> {
        let mut tables = self.lock();
        let clinic = tables
            .clinics
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound("clinic"))?;
        if let Some(name) = changes.name {
            clinic.name = name;
        }
        if let Some(phone) = changes.phone {
            clinic.phone = phone;
        }
        if changes.photo_url.is_some() {
            clinic.photo_url = changes.photo_url;
        }
        clinic.updated_at = Utc::now();
        Ok(clinic.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        if tables.appointments.iter().any(|a| a.clinic_id == id)
            || tables.consultations.iter().any(|c| c.clinic_id == id)
        {
            return Err(AppError::invalid_state(
                "Clinic has appointments or consultations and cannot be removed",
            ));
        }
        let before = tables.clinics.len();
        tables.clinics.retain(|c| c.id != id);
        if tables.clinics.len() == before {
            return Err(AppError::NotFound("clinic"));
        }
        Ok(())
    }

    async fn add_operating_hours(
        &self,
        hours: Vec<NewOperatingHours>,
    ) -> AppResult<Vec<OperatingHours>> {
        let mut tables = self.lock();
        let mut created = Vec::with_capacity(hours.len());
        for entry in hours {
            let row = OperatingHours {
                id: tables.id(),
                clinic_id: entry.clinic_id,
                weekday: entry.weekday,
                opens_at: entry.opens_at,
                closes_at: entry.closes_at,
            };
            tables.hours.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn list_operating_hours(&self, clinic_id: i32) -> AppResult<Vec<OperatingHours>> {
        Ok(self
            .lock()
            .hours
            .iter()
            .filter(|h| h.clinic_id == clinic_id)
            .cloned()
            .collect())
    }

    async fn link_services(&self, clinic_id: i32, service_ids: Vec<i32>) -> AppResult<()> {
        let mut tables = self.lock();
        for service_id in service_ids {
            if !tables.clinic_services.contains(&(clinic_id, service_id)) {
                tables.clinic_services.push((clinic_id, service_id));
            }
        }
        Ok(())
    }

    async fn list_services(&self, clinic_id: i32) -> AppResult<Vec<Service>> {
        let tables = self.lock();
        Ok(tables
            .services
            .iter()
            .filter(|s| tables.clinic_services.contains(&(clinic_id, s.id)))
            .cloned()
            .collect())
    }

    async fn save_location(&self, location: NewClinicLocation) -> AppResult<ClinicLocation> {
        let mut tables = self.lock();
        let id = match tables
            .locations
            .iter()
            .position(|l| l.clinic_id == location.clinic_id)
        {
            Some(index) => tables.locations.remove(index).id,
            None => tables.id(),
        };
        let saved = ClinicLocation {
            id,
            clinic_id: location.clinic_id,
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address,
            city: location.city,
            state: location.state,
            postal_code: location.postal_code,
            updated_at: Utc::now(),
        };
        tables.locations.push(saved.clone());
        Ok(saved)
    }

    async fn find_location(&self, clinic_id: i32) -> AppResult<Option<ClinicLocation>> {
        Ok(self
            .lock()
            .locations
            .iter()
            .find(|l| l.clinic_id == clinic_id)
            .cloned())
    }
}

#[async_trait]
impl PetRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Pet>> {
        Ok(self.lock().pets.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i32) -> AppResult<Vec<Pet>> {
        Ok(self
            .lock()
            .pets
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create(&self, pet: NewPet) -> AppResult<Pet> {
        let mut tables = self.lock();
        let created = Pet {
            id: tables.id(),
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            weight: pet.weight,
            owner_id: pet.owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.pets.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: PetUpdate) -> AppResult<Pet> {
        let mut tables = self.lock();
        let pet = tables
            .pets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound("pet"))?;
        if let Some(name) = changes.name {
            pet.name = name;
        }
        if let Some(species) = changes.species {
            pet.species = species;
        }
        if let Some(breed) = changes.breed {
            pet.breed = breed;
        }
        if changes.weight.is_some() {
            pet.weight = changes.weight;
        }
        pet.updated_at = Utc::now();
        Ok(pet.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.lock();
        let before = tables.pets.len();
        tables.pets.retain(|p| p.id != id);
        if tables.pets.len() == before {
            return Err(AppError::NotFound("pet"));
        }
        tables.consultations.retain(|c| c.pet_id != id);
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn find_service(&self, id: i32) -> AppResult<Option<Service>> {
        Ok(self.lock().services.iter().find(|s| s.id == id).cloned())
    }

    async fn list_services(&self) -> AppResult<Vec<Service>> {
        Ok(self.lock().services.clone())
    }

    async fn create_service(&self, service: NewService) -> AppResult<Service> {
        let mut tables = self.lock();
        let created = Service {
            id: tables.id(),
            name: service.name,
            description: service.description,
            price: service.price,
        };
        tables.services.push(created.clone());
        Ok(created)
    }

    async fn find_service_type(&self, id: i32) -> AppResult<Option<ServiceType>> {
        Ok(self.lock().service_types.iter().find(|t| t.id == id).cloned())
    }

    async fn list_service_types(&self) -> AppResult<Vec<ServiceType>> {
        Ok(self.lock().service_types.clone())
    }

    async fn create_service_type(&self, service_type: NewServiceType) -> AppResult<ServiceType> {
        let mut tables = self.lock();
        let created = ServiceType {
            id: tables.id(),
            name: service_type.name,
            service_id: service_type.service_id,
        };
        tables.service_types.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Appointment>> {
        Ok(self.lock().appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_scheduled_slot(
        &self,
        clinic_id: i32,
        date: NaiveDate,
        time_slot: NaiveTime,
    ) -> AppResult<Option<Appointment>> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .find(|a| {
                a.clinic_id == clinic_id
                    && a.date == date
                    && a.time_slot == time_slot
                    && a.status == AppointmentStatus::Scheduled
            })
            .cloned())
    }

    async fn create(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let mut tables = self.lock();
        let taken = tables.appointments.iter().any(|a| {
            a.clinic_id == appointment.clinic_id
                && a.date == appointment.date
                && a.time_slot == appointment.time_slot
                && a.status == AppointmentStatus::Scheduled
        });
        if taken {
            return Err(AppError::conflict("Time slot already booked at this clinic"));
        }
        let created = Appointment {
            id: tables.id(),
            date: appointment.date,
            time_slot: appointment.time_slot,
            status: AppointmentStatus::Scheduled,
            pet_id: appointment.pet_id,
            service_type_id: appointment.service_type_id,
            clinic_id: appointment.clinic_id,
            user_id: appointment.user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        tables.appointments.push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: i32, status: AppointmentStatus) -> AppResult<Appointment> {
        let mut tables = self.lock();
        let appointment = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound("appointment"))?;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Appointment>> {
        let mut found: Vec<_> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.date, a.time_slot));
        Ok(found)
    }

    async fn list_by_clinic(&self, clinic_id: i32) -> AppResult<Vec<Appointment>> {
        let mut found: Vec<_> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.clinic_id == clinic_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.date, a.time_slot));
        Ok(found)
    }

    async fn has_scheduled_for_pet(&self, pet_id: i32) -> AppResult<bool> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .any(|a| a.pet_id == pet_id && a.status == AppointmentStatus::Scheduled))
    }
}

#[async_trait]
impl ConsultationRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Consultation>> {
        Ok(self.lock().consultations.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_pet(&self, pet_id: i32) -> AppResult<Vec<Consultation>> {
        let mut found: Vec<_> = self
            .lock()
            .consultations
            .iter()
            .filter(|c| c.pet_id == pet_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.held_at, b.id).cmp(&(a.held_at, a.id)));
        Ok(found)
    }

    async fn create(&self, consultation: NewConsultation) -> AppResult<Consultation> {
        let mut tables = self.lock();
        let created = Consultation {
            id: tables.id(),
            pet_id: consultation.pet_id,
            clinic_id: consultation.clinic_id,
            held_at: consultation.held_at,
            vet_name: consultation.vet_name,
            diagnosis: consultation.diagnosis,
            prescription: consultation.prescription,
            notes: consultation.notes,
            created_at: Utc::now(),
        };
        tables.consultations.push(created.clone());
        Ok(created)
    }
}

/// Unit of Work handing out the same in-memory store for every repository
#[derive(Clone)]
pub struct MemoryUnitOfWork(pub Arc<MemoryStore>);

impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.0.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicRepository> {
        self.0.clone()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.0.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.0.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.0.clone()
    }

    fn consultations(&self) -> Arc<dyn ConsultationRepository> {
        self.0.clone()
    }
}

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(SECRET.as_bytes(), 1).unwrap()
}

/// Services over `store` with the clock frozen at [`now`]
pub fn services(store: Arc<MemoryStore>) -> Services {
    Services::from_unit_of_work(
        Arc::new(MemoryUnitOfWork(store)),
        token_issuer(),
        Arc::new(FixedClock(now())),
    )
}

/// Bearer header value for an account
pub fn bearer(id: i32, subject: &str, role: AuthRole) -> String {
    let token = token_issuer().issue(id, subject, role).unwrap();
    format!("Bearer {}", token.access_token)
}
