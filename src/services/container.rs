//! Service Container - Centralized service access with parallel execution support.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent lookups

use std::future::Future;
use std::sync::Arc;

use super::{
    AppointmentManager, AppointmentService, AuthService, Authenticator, CatalogManager,
    CatalogService, ClinicManager, ClinicService, Clock, ConsultationManager,
    ConsultationService, PetManager, PetService, SystemClock, TokenIssuer, UserManager,
    UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn clinics(&self) -> Arc<dyn ClinicService>;

    fn pets(&self) -> Arc<dyn PetService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn appointments(&self) -> Arc<dyn AppointmentService>;

    fn consultations(&self) -> Arc<dyn ConsultationService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    clinic_service: Arc<dyn ClinicService>,
    pet_service: Arc<dyn PetService>,
    catalog_service: Arc<dyn CatalogService>,
    appointment_service: Arc<dyn AppointmentService>,
    consultation_service: Arc<dyn ConsultationService>,
}

impl Services {
    /// Wire every service over one Unit of Work
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        tokens: TokenIssuer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            clinic_service: Arc::new(ClinicManager::new(uow.clone())),
            pet_service: Arc::new(PetManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            appointment_service: Arc::new(AppointmentManager::new(uow.clone(), clock)),
            consultation_service: Arc::new(ConsultationManager::new(uow)),
        }
    }

    /// Create service container from database connection and config
    ///
    /// # Errors
    /// Fails when the token signing key is unusable.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> AppResult<Self> {
        let tokens = TokenIssuer::from_config(config)?;
        let uow = Arc::new(Persistence::new(db));

        Ok(Self::from_unit_of_work(uow, tokens, Arc::new(SystemClock)))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicService> {
        self.clinic_service.clone()
    }

    fn pets(&self) -> Arc<dyn PetService> {
        self.pet_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointment_service.clone()
    }

    fn consultations(&self) -> Arc<dyn ConsultationService> {
        self.consultation_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute three independent async operations in parallel.
    ///
    /// If any operation fails, the first error is returned.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Keeps input order so sorted listings stay sorted.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .buffered(limit.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_parallel_join3() {
        async fn op(value: i32) -> AppResult<i32> {
            Ok(value)
        }

        let (a, b, c) = parallel::join3(op(1), op(2), op(3)).await.unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_parallel_join3_propagates_error() {
        async fn ok() -> AppResult<i32> {
            Ok(1)
        }
        async fn missing() -> AppResult<i32> {
            Err(AppError::NotFound("pet"))
        }

        let result = parallel::join3(ok(), missing(), ok()).await;
        assert!(matches!(result, Err(AppError::NotFound("pet"))));
    }

    #[tokio::test]
    async fn test_parallel_join4() {
        async fn op(value: i32) -> AppResult<i32> {
            Ok(value)
        }

        let result = parallel::join4(op(1), op(2), op(3), op(4)).await.unwrap();
        assert_eq!(result, (1, 2, 3, 4));
    }

    #[tokio::test]
    async fn test_join_all_limited_propagates_error() {
        let futures = (0..4).map(|i| async move {
            if i == 2 {
                Err(AppError::NotFound("service"))
            } else {
                Ok(i)
            }
        });

        let result = parallel::join_all_limited(futures, 2).await;
        assert!(matches!(result, Err(AppError::NotFound("service"))));
    }

    #[tokio::test]
    async fn test_join_all_limited_keeps_order() {
        // Earlier items finish last
        let futures = (0..6u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(30 - i * 5)).await;
            Ok(i) as AppResult<u64>
        });

        let results = parallel::join_all_limited(futures, 3).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
    }
}
