//! Clinic repository: accounts, opening hours and offered services.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use super::entities::{clinic, clinic_location, clinic_service, operating_hours, service};
use crate::domain::{
    Clinic, ClinicLocation, ClinicUpdate, NewClinic, NewClinicLocation, NewOperatingHours,
    OperatingHours, Service,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Clinic>>;

    async fn find_by_cnpj(&self, cnpj: &str) -> AppResult<Option<Clinic>>;

    /// One page of clinics ordered by id, plus the total count
    async fn list_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<Clinic>, u64)>;

    /// Create a clinic. A taken cnpj yields `Conflict`.
    async fn create(&self, clinic: NewClinic) -> AppResult<Clinic>;

    async fn update(&self, id: i32, changes: ClinicUpdate) -> AppResult<Clinic>;

    /// Remove a clinic. Fails with `InvalidState` while appointments or
    /// consultations reference it.
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Insert every entry or none
    async fn add_operating_hours(
        &self,
        hours: Vec<NewOperatingHours>,
    ) -> AppResult<Vec<OperatingHours>>;

    async fn list_operating_hours(&self, clinic_id: i32) -> AppResult<Vec<OperatingHours>>;

    /// Link services to a clinic, skipping pairs that already exist
    async fn link_services(&self, clinic_id: i32, service_ids: Vec<i32>) -> AppResult<()>;

    async fn list_services(&self, clinic_id: i32) -> AppResult<Vec<Service>>;

    /// Insert or replace the clinic's single location
    async fn save_location(&self, location: NewClinicLocation) -> AppResult<ClinicLocation>;

    async fn find_location(&self, clinic_id: i32) -> AppResult<Option<ClinicLocation>>;
}

pub struct ClinicStore {
    db: DatabaseConnection,
}

impl ClinicStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClinicRepository for ClinicStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Clinic>> {
        let result = clinic::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Clinic::from))
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> AppResult<Option<Clinic>> {
        let result = clinic::Entity::find()
            .filter(clinic::Column::Cnpj.eq(cnpj))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Clinic::from))
    }

    async fn list_paginated(&self, params: &PaginationParams) -> AppResult<(Vec<Clinic>, u64)> {
        let paginator = clinic::Entity::find()
            .order_by_asc(clinic::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        Ok((models.into_iter().map(Clinic::from).collect(), total))
    }

    async fn create(&self, new: NewClinic) -> AppResult<Clinic> {
        let now = chrono::Utc::now();
        let active_model = clinic::ActiveModel {
            name: Set(new.name),
            cnpj: Set(new.cnpj),
            phone: Set(new.phone),
            photo_url: Set(new.photo_url),
            rating: Set(0.0),
            rating_count: Set(0),
            password_hash: Set(new.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "CNPJ already registered"))?;

        Ok(Clinic::from(model))
    }

    async fn update(&self, id: i32, changes: ClinicUpdate) -> AppResult<Clinic> {
        let existing = clinic::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("clinic")?;

        let mut active: clinic::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(photo_url) = changes.photo_url {
            active.photo_url = Set(Some(photo_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Clinic::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = match clinic::Entity::delete_by_id(id).exec(&self.db).await {
            Ok(result) => result,
            Err(e) => {
                return Err(match e.sql_err() {
                    Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                        AppError::invalid_state(
                            "Clinic has appointments or consultations and cannot be removed",
                        )
                    }
                    _ => AppError::Database(e),
                })
            }
        };

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("clinic"));
        }

        Ok(())
    }

    async fn add_operating_hours(
        &self,
        hours: Vec<NewOperatingHours>,
    ) -> AppResult<Vec<OperatingHours>> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let mut created = Vec::with_capacity(hours.len());
        for entry in hours {
            let active_model = operating_hours::ActiveModel {
                clinic_id: Set(entry.clinic_id),
                weekday: Set(entry.weekday),
                opens_at: Set(entry.opens_at),
                closes_at: Set(entry.closes_at),
                ..Default::default()
            };
            // Dropping the transaction on error rolls it back
            let model = active_model.insert(&txn).await.map_err(AppError::from)?;
            created.push(OperatingHours::from(model));
        }

        txn.commit().await.map_err(AppError::from)?;
        Ok(created)
    }

    async fn list_operating_hours(&self, clinic_id: i32) -> AppResult<Vec<OperatingHours>> {
        let models = operating_hours::Entity::find()
            .filter(operating_hours::Column::ClinicId.eq(clinic_id))
            .order_by_asc(operating_hours::Column::Weekday)
            .order_by_asc(operating_hours::Column::OpensAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(OperatingHours::from).collect())
    }

    async fn link_services(&self, clinic_id: i32, service_ids: Vec<i32>) -> AppResult<()> {
        if service_ids.is_empty() {
            return Ok(());
        }

        let links = service_ids.into_iter().map(|service_id| clinic_service::ActiveModel {
            clinic_id: Set(clinic_id),
            service_id: Set(service_id),
        });

        clinic_service::Entity::insert_many(links)
            .on_conflict(
                OnConflict::columns([
                    clinic_service::Column::ClinicId,
                    clinic_service::Column::ServiceId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn list_services(&self, clinic_id: i32) -> AppResult<Vec<Service>> {
        let service_ids: Vec<i32> = clinic_service::Entity::find()
            .select_only()
            .column(clinic_service::Column::ServiceId)
            .filter(clinic_service::Column::ClinicId.eq(clinic_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = service::Entity::find()
            .filter(service::Column::Id.is_in(service_ids))
            .order_by_asc(service::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn save_location(&self, location: NewClinicLocation) -> AppResult<ClinicLocation> {
        let active_model = clinic_location::ActiveModel {
            clinic_id: Set(location.clinic_id),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            address: Set(location.address),
            city: Set(location.city),
            state: Set(location.state),
            postal_code: Set(location.postal_code),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = clinic_location::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(clinic_location::Column::ClinicId)
                    .update_columns([
                        clinic_location::Column::Latitude,
                        clinic_location::Column::Longitude,
                        clinic_location::Column::Address,
                        clinic_location::Column::City,
                        clinic_location::Column::State,
                        clinic_location::Column::PostalCode,
                        clinic_location::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(ClinicLocation::from(model))
    }

    async fn find_location(&self, clinic_id: i32) -> AppResult<Option<ClinicLocation>> {
        let result = clinic_location::Entity::find()
            .filter(clinic_location::Column::ClinicId.eq(clinic_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ClinicLocation::from))
    }
}
