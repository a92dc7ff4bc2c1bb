//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::provider::ProviderRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service::ServiceRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::provider_repository::SeaOrmProviderRepository;
use super::service_repository::SeaOrmServiceRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let services = repos.services().find_active(&filter).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    services: SeaOrmServiceRepository,
    providers: SeaOrmProviderRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            services: SeaOrmServiceRepository::new(db.clone()),
            providers: SeaOrmProviderRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn services(&self) -> &dyn ServiceRepository {
        &self.services
    }

    fn providers(&self) -> &dyn ProviderRepository {
        &self.providers
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
