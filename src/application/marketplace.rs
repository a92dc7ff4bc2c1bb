//! Entry point for callers: listings, booking requests and booking history
//! over one repository provider.

use std::sync::Arc;

use tracing::info;

use crate::application::booking::{BookingHistoryCache, BookingService};
use crate::application::events::{create_event_bus, EventSubscriber, SharedEventBus};
use crate::application::listing::{ListingComposer, ViewState};
use crate::application::policy::StorePolicy;
use crate::config::AppConfig;
use crate::domain::{Booking, DomainResult, ListingFilter, ListingView, RepositoryProvider};

pub struct Marketplace {
    listings: ListingComposer,
    bookings: BookingService,
    history: Arc<BookingHistoryCache>,
    event_bus: SharedEventBus,
}

impl Marketplace {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: StorePolicy,
        event_bus: SharedEventBus,
    ) -> Self {
        let history = Arc::new(BookingHistoryCache::new(repos.clone(), policy.clone()));
        let bookings = BookingService::new(repos.clone(), policy.clone(), event_bus.clone())
            .with_sink(history.clone());

        Self {
            listings: ListingComposer::new(repos, policy),
            bookings,
            history,
            event_bus,
        }
    }

    pub fn from_config(repos: Arc<dyn RepositoryProvider>, config: &AppConfig) -> Self {
        let policy = config.store_policy();
        info!(
            timeout_ms = policy.timeout.as_millis() as u64,
            read_attempts = policy.read_retry.max_attempts,
            event_capacity = config.events.capacity,
            "Marketplace configured"
        );
        Self::new(repos, policy, create_event_bus(config.events.capacity))
    }

    pub async fn list_services(&self, filter: &ListingFilter) -> DomainResult<Vec<ListingView>> {
        self.listings.query(filter).await
    }

    /// Listings for whatever the browse screen currently has selected.
    pub async fn browse(&self, state: &ViewState) -> DomainResult<Vec<ListingView>> {
        self.listings.query(&state.filter()).await
    }

    pub async fn request_booking(
        &self,
        service_id: &str,
        customer_id: Option<&str>,
        provider_id: &str,
    ) -> DomainResult<Booking> {
        self.bookings
            .request_booking(service_id, customer_id, provider_id)
            .await
    }

    pub async fn customer_bookings(&self, customer_id: &str) -> DomainResult<Vec<Booking>> {
        self.history.customer_bookings(customer_id).await
    }

    /// Booking and invalidation events published from now on.
    pub fn subscribe(&self) -> EventSubscriber {
        self.event_bus.subscribe()
    }

    pub fn history(&self) -> Arc<BookingHistoryCache> {
        self.history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{seed_pune_cleaning, service};
    use crate::domain::{BookingStatus, ErrorKind, Event};
    use crate::infrastructure::database::test_support::migrated_connection;
    use crate::infrastructure::{InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
    use std::time::Duration;

    async fn in_memory() -> Marketplace {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_pune_cleaning(repos.as_ref()).await;
        Marketplace::from_config(repos, &AppConfig::default())
    }

    #[tokio::test]
    async fn browse_then_book_then_duplicate() {
        let market = in_memory().await;

        let mut state = ViewState::default();
        state.select_category("Cleaning");
        state.select_city("Pune");
        let listings = market.browse(&state).await.unwrap();
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];

        let booking = market
            .request_booking(&listing.service.id, Some("C9"), &listing.service.provider_id)
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        let err = market
            .request_booking(&listing.service.id, Some("C9"), &listing.service.provider_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyBooked);
    }

    #[tokio::test]
    async fn history_sees_a_new_booking_immediately() {
        let market = in_memory().await;

        assert!(market.customer_bookings("C9").await.unwrap().is_empty());
        assert!(market.history().is_cached("C9"));

        market.request_booking("1", Some("C9"), "P1").await.unwrap();

        assert!(!market.history().is_cached("C9"));
        let history = market.customer_bookings("C9").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].service_id, "1");
    }

    #[tokio::test]
    async fn subscribers_see_the_invalidation() {
        let market = in_memory().await;
        let mut events = market.subscribe();

        market.request_booking("1", Some("C9"), "P1").await.unwrap();

        let mut saw_invalidation = false;
        for _ in 0..2 {
            let message = tokio::time::timeout(Duration::from_millis(100), events.recv())
                .await
                .expect("Timeout")
                .expect("No message");
            if let Event::CacheInvalidated(e) = message.event {
                assert_eq!(e.customer_id, "C9");
                saw_invalidation = true;
            }
        }
        assert!(saw_invalidation);
    }

    #[tokio::test]
    async fn sqlite_backed_marketplace_enforces_one_active_booking() {
        let db = migrated_connection().await;
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        seed_pune_cleaning(repos.as_ref()).await;
        let market = Arc::new(Marketplace::from_config(repos, &AppConfig::default()));

        let listings = market
            .list_services(&ListingFilter::category("cleaning").with_city("Pune"))
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings[0].provider.as_ref().map(|p| p.id.as_str()),
            Some("P1")
        );

        let mut handles = Vec::new();
        for _ in 0..4 {
            let market = market.clone();
            handles.push(tokio::spawn(async move {
                market.request_booking("1", Some("C9"), "P1").await
            }));
        }
        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyBooked),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(market.customer_bookings("C9").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn both_stores_fold_non_ascii_categories_alike() {
        let db = migrated_connection().await;
        let stores: Vec<Arc<dyn RepositoryProvider>> = vec![
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(SeaOrmRepositoryProvider::new(db)),
        ];

        for repos in stores {
            seed_pune_cleaning(repos.as_ref()).await;
            repos
                .services()
                .save(service("2", "Ümzug", "Pune", "P1"))
                .await
                .unwrap();
            let market = Marketplace::from_config(repos, &AppConfig::default());

            let listings = market
                .list_services(&ListingFilter::category("ümzug").with_city("Pune"))
                .await
                .unwrap();
            assert_eq!(listings.len(), 1);
            assert_eq!(listings[0].service.id, "2");
        }
    }
}
