//! Booking request orchestration

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::guard::{BookingGuard, GuardDecision};
use crate::application::events::{
    BookingCreatedEvent, CacheInvalidatedEvent, CacheScope, Event, SharedEventBus,
};
use crate::application::policy::StorePolicy;
use crate::domain::{Booking, BookingDraft, DomainError, DomainResult, RepositoryProvider};

/// A cache that must forget state as soon as a booking lands.
///
/// Sinks run inline, after the insert is acknowledged and before
/// `request_booking` returns, so the caller's next read is already fresh.
/// Out-of-process consumers use the event bus instead.
pub trait InvalidationSink: Send + Sync {
    fn invalidate(&self, event: &CacheInvalidatedEvent);
}

/// Customer-initiated booking creation: guard, insert, invalidate.
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    guard: BookingGuard,
    policy: StorePolicy,
    event_bus: SharedEventBus,
    sinks: Vec<Arc<dyn InvalidationSink>>,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: StorePolicy,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            guard: BookingGuard::new(repos.clone(), policy.clone()),
            repos,
            policy,
            event_bus,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn InvalidationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Request a booking of `service_id` from `provider_id` on behalf of
    /// `customer_id`.
    ///
    /// `provider_id` must name the owner of the service; the guard resolves
    /// the service and rejects any other value.
    ///
    /// The guard and the insert are two separate steps. Concurrent requests
    /// for the same pair may both pass the guard; the store then accepts one
    /// and the other comes back as `AlreadyBooked`.
    pub async fn request_booking(
        &self,
        service_id: &str,
        customer_id: Option<&str>,
        provider_id: &str,
    ) -> DomainResult<Booking> {
        if service_id.trim().is_empty() {
            return Err(DomainError::Validation("service_id must not be empty".into()));
        }
        if provider_id.trim().is_empty() {
            return Err(DomainError::Validation("provider_id must not be empty".into()));
        }

        if let GuardDecision::Rejected(reason) =
            self.guard.check(service_id, customer_id, provider_id).await?
        {
            info!(service_id, ?customer_id, ?reason, "Booking request rejected");
            return Err(reason.into_error(service_id, customer_id, provider_id));
        }
        let Some(customer_id) = customer_id else {
            return Err(DomainError::Unauthenticated);
        };

        let draft = BookingDraft::pending(service_id, customer_id, provider_id);
        let booking = self
            .policy
            .write("insert_booking", self.repos.bookings().insert(draft))
            .await
            .map_err(|e| {
                error!(service_id, customer_id, error = %e, "Booking insert failed");
                e
            })?;

        info!(
            booking_id = %booking.id,
            service_id,
            customer_id,
            provider_id,
            "Booking requested"
        );

        self.announce(&booking);
        Ok(booking)
    }

    fn announce(&self, booking: &Booking) {
        let now = Utc::now();
        let invalidation = CacheInvalidatedEvent {
            customer_id: booking.customer_id.clone(),
            service_id: booking.service_id.clone(),
            scopes: vec![CacheScope::CustomerBookings, CacheScope::ServiceBookingState],
            timestamp: now,
        };

        for sink in &self.sinks {
            sink.invalidate(&invalidation);
        }

        self.event_bus.publish(Event::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id.clone(),
            service_id: booking.service_id.clone(),
            customer_id: booking.customer_id.clone(),
            provider_id: booking.provider_id.clone(),
            timestamp: now,
        }));
        self.event_bus.publish(Event::CacheInvalidated(invalidation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::{create_event_bus, EventSubscriber};
    use crate::application::test_support::{seed_pune_cleaning, FaultyRepos, Faults};
    use crate::domain::{BookingFilter, BookingStatus, ErrorKind};
    use std::sync::Mutex;
    use std::time::Duration;

    fn service(repos: Arc<FaultyRepos>) -> (BookingService, EventSubscriber) {
        let bus = create_event_bus(16);
        let subscriber = bus.subscribe();
        let policy = StorePolicy {
            timeout: Duration::from_millis(50),
            ..StorePolicy::default()
        };
        (BookingService::new(repos, policy, bus), subscriber)
    }

    async fn seeded() -> Arc<FaultyRepos> {
        let repos = Arc::new(FaultyRepos::new());
        seed_pune_cleaning(repos.as_ref()).await;
        repos
    }

    async fn stored(repos: &FaultyRepos) -> Vec<Booking> {
        repos
            .store
            .bookings()
            .find(&BookingFilter::default())
            .await
            .unwrap()
    }

    async fn next_event(subscriber: &mut EventSubscriber) -> Event {
        tokio::time::timeout(Duration::from_millis(100), subscriber.recv())
            .await
            .expect("Timeout")
            .expect("No message")
            .event
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl InvalidationSink for RecordingSink {
        fn invalidate(&self, event: &CacheInvalidatedEvent) {
            self.seen.lock().unwrap().push(event.customer_id.clone());
        }
    }

    #[tokio::test]
    async fn first_request_creates_pending_booking_then_duplicate_is_rejected() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());

        let booking = svc.request_booking("1", Some("C9"), "P1").await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.provider_id, "P1");

        let err = svc.request_booking("1", Some("C9"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyBooked);
        assert_eq!(stored(&repos).await.len(), 1);
    }

    #[tokio::test]
    async fn provider_booking_own_service_under_another_id_is_rejected() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());

        let err = svc.request_booking("1", Some("P1"), "PX").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfBooking);
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
    }

    #[tokio::test]
    async fn wrong_provider_never_inserts() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());

        let err = svc.request_booking("1", Some("C9"), "P5").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ProviderMismatch { ref provider_id, .. } if provider_id == "P5"
        ));
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
    }

    #[tokio::test]
    async fn unknown_service_never_inserts() {
        let repos = seeded().await;
        let (svc, mut sub) = service(repos.clone());

        let err = svc
            .request_booking("does-not-exist", Some("C9"), "P1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
        assert!(stored(&repos).await.is_empty());
        let nothing = tokio::time::timeout(Duration::from_millis(20), sub.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn self_booking_never_inserts() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());

        let err = svc.request_booking("1", Some("P1"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfBooking);
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
    }

    #[tokio::test]
    async fn anonymous_request_never_inserts() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());

        let err = svc.request_booking("1", None, "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
    }

    #[tokio::test]
    async fn blank_ids_are_validation_errors() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos);

        let err = svc.request_booking(" ", Some("C9"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = svc.request_booking("1", Some("C9"), "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn success_publishes_created_then_invalidated() {
        let repos = seeded().await;
        let (svc, mut sub) = service(repos);

        let booking = svc.request_booking("1", Some("C9"), "P1").await.unwrap();

        match next_event(&mut sub).await {
            Event::BookingCreated(e) => assert_eq!(e.booking_id, booking.id),
            other => panic!("unexpected event {:?}", other),
        }
        match next_event(&mut sub).await {
            Event::CacheInvalidated(e) => {
                assert_eq!(e.customer_id, "C9");
                assert_eq!(e.service_id, "1");
                assert!(e.covers(CacheScope::CustomerBookings));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn insert_failure_publishes_nothing() {
        let repos = seeded().await;
        Faults::set(&repos.faults.fail_inserts);
        let sink = Arc::new(RecordingSink::default());
        let (svc, mut sub) = service(repos);
        let svc = svc.with_sink(sink.clone());

        let err = svc.request_booking("1", Some("C9"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsertFailed);

        assert!(sink.seen.lock().unwrap().is_empty());
        let nothing = tokio::time::timeout(Duration::from_millis(20), sub.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn stalled_insert_times_out() {
        let repos = seeded().await;
        Faults::set(&repos.faults.stall_inserts);
        let (svc, _sub) = service(repos);

        let err = svc.request_booking("1", Some("C9"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn guard_lookup_failure_surfaces_as_fetch_failed() {
        let repos = seeded().await;
        Faults::set(&repos.faults.fail_booking_reads);
        let (svc, _sub) = service(repos.clone());

        let err = svc.request_booking("1", Some("C9"), "P1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
        assert_eq!(Faults::count(&repos.faults.insert_calls), 0);
    }

    #[tokio::test]
    async fn sinks_run_before_returning() {
        let repos = seeded().await;
        let sink = Arc::new(RecordingSink::default());
        let (svc, _sub) = service(repos);
        let svc = svc.with_sink(sink.clone());

        svc.request_booking("1", Some("C9"), "P1").await.unwrap();
        assert_eq!(*sink.seen.lock().unwrap(), vec!["C9".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_duplicates_create_one_booking() {
        let repos = seeded().await;
        let (svc, _sub) = service(repos.clone());
        let svc = Arc::new(svc);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.request_booking("1", Some("C9"), "P1").await
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
        assert_eq!(stored(&repos).await.len(), 1);
    }
}
