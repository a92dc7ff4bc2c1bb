//! In-memory storage implementation

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::booking::{
    Booking, BookingDraft, BookingFilter, BookingRepository, BookingStatus,
};
use crate::domain::provider::{Provider, ProviderRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::service::{Service, ServiceFilter, ServiceRepository};
use crate::domain::{DomainError, DomainResult};

/// Rows are tagged with an insertion sequence so reads keep store order.
struct Sequenced<T> {
    seq: u64,
    value: T,
}

// ── Services ────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryServiceRepository {
    services: DashMap<String, Sequenced<Service>>,
    counter: AtomicU64,
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn find_active(&self, filter: &ServiceFilter) -> DomainResult<Vec<Service>> {
        let mut rows: Vec<(u64, Service)> = self
            .services
            .iter()
            .filter(|e| filter.matches(&e.value().value))
            .map(|e| (e.value().seq, e.value().value.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, s)| s).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>> {
        Ok(self.services.get(id).map(|e| e.value.clone()))
    }

    async fn save(&self, service: Service) -> DomainResult<()> {
        service.validate()?;
        match self.services.entry(service.id.clone()) {
            Entry::Occupied(mut slot) => slot.get_mut().value = service,
            Entry::Vacant(slot) => {
                let seq = self.counter.fetch_add(1, Ordering::SeqCst);
                slot.insert(Sequenced {
                    seq,
                    value: service,
                });
            }
        }
        Ok(())
    }
}

// ── Providers ───────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryProviderRepository {
    providers: DashMap<String, Provider>,
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Provider>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.providers.get(id).map(|p| p.clone()))
            .collect())
    }

    async fn save(&self, provider: Provider) -> DomainResult<()> {
        self.providers.insert(provider.id.clone(), provider);
        Ok(())
    }
}

// ── Bookings ────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryBookingRepository {
    bookings: DashMap<String, Sequenced<Booking>>,
    /// (service_id, customer_id) -> id of the active booking holding the pair
    active_pairs: DashMap<(String, String), String>,
    counter: AtomicU64,
}

impl InMemoryBookingRepository {
    fn set_status(&self, id: &str, status: BookingStatus) -> DomainResult<Booking> {
        let mut row = self
            .bookings
            .get_mut(id)
            .ok_or_else(|| DomainError::Validation(format!("Unknown booking {}", id)))?;
        let booking = &mut row.value;
        let pair = (booking.service_id.clone(), booking.customer_id.clone());

        match (booking.is_active(), status.is_active()) {
            (true, false) => {
                self.active_pairs.remove_if(&pair, |_, holder| holder == id);
            }
            (false, true) => match self.active_pairs.entry(pair) {
                Entry::Occupied(slot) if slot.get() != id => {
                    return Err(DomainError::AlreadyBooked {
                        service_id: booking.service_id.clone(),
                        customer_id: booking.customer_id.clone(),
                    });
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(id.to_string());
                }
            },
            _ => {}
        }

        booking.status = status;
        Ok(booking.clone())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        let mut rows: Vec<(u64, Booking)> = self
            .bookings
            .iter()
            .filter(|e| filter.matches(&e.value().value))
            .map(|e| (e.value().seq, e.value().value.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, b)| b).collect())
    }

    async fn insert(&self, draft: BookingDraft) -> DomainResult<Booking> {
        let id = uuid::Uuid::new_v4().to_string();
        let booking = draft.into_booking(id.clone());

        if booking.is_active() {
            let pair = (booking.service_id.clone(), booking.customer_id.clone());
            // The entry guard serializes concurrent claims on the same pair.
            match self.active_pairs.entry(pair) {
                Entry::Occupied(_) => {
                    return Err(DomainError::AlreadyBooked {
                        service_id: booking.service_id,
                        customer_id: booking.customer_id,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(id.clone());
                }
            }
        }

        let seq = self.counter.fetch_add(1, Ordering::SeqCst);
        self.bookings.insert(
            id,
            Sequenced {
                seq,
                value: booking.clone(),
            },
        );
        Ok(booking)
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    services: InMemoryServiceRepository,
    providers: InMemoryProviderRepository,
    bookings: InMemoryBookingRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a booking to another status, as the provider-side workflow
    /// would. Leaving the active set frees the service/customer pair.
    pub fn update_booking_status(&self, id: &str, status: BookingStatus) -> DomainResult<Booking> {
        self.bookings.set_status(id, status)
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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
