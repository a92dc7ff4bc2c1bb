//! Repository doubles for application-layer tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::booking::{Booking, BookingDraft, BookingFilter, BookingRepository};
use crate::domain::provider::{Provider, ProviderRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service::{Service, ServiceFilter, ServiceRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::storage::InMemoryRepositoryProvider;
use crate::shared::errors::CONNECTION_ERROR_PREFIX;

/// Switches and counters shared by the faulty repositories.
#[derive(Default)]
pub struct Faults {
    pub fail_services: AtomicBool,
    pub fail_providers: AtomicBool,
    pub fail_service_lookups: AtomicBool,
    pub fail_booking_reads: AtomicBool,
    /// Booking reads take 50ms before answering
    pub slow_booking_reads: AtomicBool,
    pub fail_inserts: AtomicBool,
    pub stall_inserts: AtomicBool,
    /// Number of upcoming service reads that fail with a connection error
    pub transient_service_failures: AtomicUsize,
    pub service_calls: AtomicUsize,
    pub service_lookups: AtomicUsize,
    pub provider_calls: AtomicUsize,
    pub booking_reads: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl Faults {
    pub fn set(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

struct FaultyServices {
    inner: Arc<InMemoryRepositoryProvider>,
    faults: Arc<Faults>,
}

#[async_trait]
impl ServiceRepository for FaultyServices {
    async fn find_active(&self, filter: &ServiceFilter) -> DomainResult<Vec<Service>> {
        self.faults.service_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_services.load(Ordering::SeqCst) {
            return Err(DomainError::FetchFailed("services unavailable".into()));
        }
        let pending = &self.faults.transient_service_failures;
        if pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DomainError::FetchFailed(format!(
                "{} connection reset",
                CONNECTION_ERROR_PREFIX
            )));
        }
        self.inner.services().find_active(filter).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>> {
        self.faults.service_lookups.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_service_lookups.load(Ordering::SeqCst) {
            return Err(DomainError::FetchFailed("service lookup unavailable".into()));
        }
        self.inner.services().find_by_id(id).await
    }

    async fn save(&self, service: Service) -> DomainResult<()> {
        self.inner.services().save(service).await
    }
}

struct FaultyProviders {
    inner: Arc<InMemoryRepositoryProvider>,
    faults: Arc<Faults>,
}

#[async_trait]
impl ProviderRepository for FaultyProviders {
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Provider>> {
        self.faults.provider_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_providers.load(Ordering::SeqCst) {
            return Err(DomainError::FetchFailed("profiles unavailable".into()));
        }
        self.inner.providers().find_by_ids(ids).await
    }

    async fn save(&self, provider: Provider) -> DomainResult<()> {
        self.inner.providers().save(provider).await
    }
}

struct FaultyBookings {
    inner: Arc<InMemoryRepositoryProvider>,
    faults: Arc<Faults>,
}

#[async_trait]
impl BookingRepository for FaultyBookings {
    async fn find(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        self.faults.booking_reads.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_booking_reads.load(Ordering::SeqCst) {
            return Err(DomainError::FetchFailed("bookings unavailable".into()));
        }
        if self.faults.slow_booking_reads.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.inner.bookings().find(filter).await
    }

    async fn insert(&self, draft: BookingDraft) -> DomainResult<Booking> {
        self.faults.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.stall_inserts.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.faults.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::InsertFailed("write rejected".into()));
        }
        self.inner.bookings().insert(draft).await
    }
}

/// In-memory store wrapped with switchable failures and call counters.
pub struct FaultyRepos {
    pub store: Arc<InMemoryRepositoryProvider>,
    pub faults: Arc<Faults>,
    services: FaultyServices,
    providers: FaultyProviders,
    bookings: FaultyBookings,
}

impl FaultyRepos {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRepositoryProvider::new());
        let faults = Arc::new(Faults::default());
        Self {
            services: FaultyServices {
                inner: store.clone(),
                faults: faults.clone(),
            },
            providers: FaultyProviders {
                inner: store.clone(),
                faults: faults.clone(),
            },
            bookings: FaultyBookings {
                inner: store.clone(),
                faults: faults.clone(),
            },
            store,
            faults,
        }
    }
}

impl RepositoryProvider for FaultyRepos {
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

pub fn service(id: &str, category: &str, city: &str, provider_id: &str) -> Service {
    Service::new(
        id,
        format!("{} service {}", category, id),
        Decimal::new(750, 0),
        category,
        city,
        provider_id,
    )
}

/// The Pune cleaning catalogue: one service by P1 ("Asha").
pub async fn seed_pune_cleaning(repos: &dyn RepositoryProvider) {
    repos
        .providers()
        .save(Provider::new("P1", "Asha"))
        .await
        .expect("seed provider");
    repos
        .services()
        .save(service("1", "Cleaning", "Pune", "P1"))
        .await
        .expect("seed service");
}
