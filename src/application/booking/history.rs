//! Per-customer booking history, cached until a booking invalidates it

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::service::InvalidationSink;
use crate::application::events::{
    CacheInvalidatedEvent, CacheScope, Delivery, Event, EventSubscriber,
};
use crate::application::policy::StorePolicy;
use crate::domain::{Booking, BookingFilter, DomainError, DomainResult, RepositoryProvider};

/// Read-through cache of each customer's bookings.
///
/// Every invalidation bumps the customer's generation. A fill that started
/// under an older generation is discarded, so a slow read can never
/// resurrect a list that a booking has already made stale.
pub struct BookingHistoryCache {
    repos: Arc<dyn RepositoryProvider>,
    policy: StorePolicy,
    entries: DashMap<String, Vec<Booking>>,
    generations: DashMap<String, u64>,
}

impl BookingHistoryCache {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: StorePolicy) -> Self {
        Self {
            repos,
            policy,
            entries: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    pub async fn customer_bookings(&self, customer_id: &str) -> DomainResult<Vec<Booking>> {
        if customer_id.trim().is_empty() {
            return Err(DomainError::Unauthenticated);
        }
        if let Some(hit) = self.entries.get(customer_id) {
            debug!(customer_id, "Booking history cache hit");
            return Ok(hit.clone());
        }

        let generation = self.generation(customer_id);
        let filter = BookingFilter::for_customer(customer_id);
        let bookings_repo = self.repos.bookings();
        let bookings = self
            .policy
            .read("fetch_customer_bookings", || bookings_repo.find(&filter))
            .await?;

        // Holding the generation entry keeps invalidations out until the
        // fill is either stored or discarded.
        let current = self.generations.entry(customer_id.to_string()).or_insert(0);
        if *current == generation {
            self.entries.insert(customer_id.to_string(), bookings.clone());
        } else {
            debug!(customer_id, "Discarding stale booking history fill");
        }
        drop(current);
        Ok(bookings)
    }

    pub fn invalidate_customer(&self, customer_id: &str) {
        *self.generations.entry(customer_id.to_string()).or_insert(0) += 1;
        if self.entries.remove(customer_id).is_some() {
            debug!(customer_id, "Booking history invalidated");
        }
    }

    /// Drop everything, e.g. after missing events.
    pub fn clear(&self) {
        for mut generation in self.generations.iter_mut() {
            *generation += 1;
        }
        self.entries.clear();
    }

    pub fn is_cached(&self, customer_id: &str) -> bool {
        self.entries.contains_key(customer_id)
    }

    /// React to a bus event. Only invalidations that cover customer
    /// bookings matter here.
    pub fn apply(&self, event: &Event) {
        if let Event::CacheInvalidated(e) = event {
            if e.covers(CacheScope::CustomerBookings) {
                self.invalidate_customer(&e.customer_id);
            }
        }
    }

    /// Keep the cache in step with the bus until the bus is dropped. Missed
    /// events may have been invalidations, so a lag clears the whole cache.
    pub fn spawn_listener(self: Arc<Self>, mut subscriber: EventSubscriber) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(delivery) = subscriber.recv_delivery().await {
                match delivery {
                    Delivery::Message(message) => self.apply(&message.event),
                    Delivery::Lagged(missed) => {
                        warn!(missed, "Booking history listener lagged, clearing cache");
                        self.clear();
                    }
                }
            }
            info!("Booking history listener stopped");
        })
    }

    fn generation(&self, customer_id: &str) -> u64 {
        self.generations.get(customer_id).map(|g| *g).unwrap_or(0)
    }
}

impl InvalidationSink for BookingHistoryCache {
    fn invalidate(&self, event: &CacheInvalidatedEvent) {
        if event.covers(CacheScope::CustomerBookings) {
            self.invalidate_customer(&event.customer_id);
        }
    }
}
