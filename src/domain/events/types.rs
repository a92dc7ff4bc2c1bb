//! Booking events
//!
//! Facts published after a successful mutation. Consumers holding cached
//! views keyed by customer must drop them on `CacheInvalidated`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached view families that a booking can make stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// A customer's booking history
    CustomerBookings,
    /// Per-service booking state shown next to a listing
    ServiceBookingState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    BookingCreated(BookingCreatedEvent),
    CacheInvalidated(CacheInvalidatedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::BookingCreated(_) => "booking_created",
            Event::CacheInvalidated(_) => "cache_invalidated",
        }
    }

    pub fn customer_id(&self) -> &str {
        match self {
            Event::BookingCreated(e) => &e.customer_id,
            Event::CacheInvalidated(e) => &e.customer_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: String,
    pub service_id: String,
    pub customer_id: String,
    pub provider_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInvalidatedEvent {
    pub customer_id: String,
    pub service_id: String,
    pub scopes: Vec<CacheScope>,
    pub timestamp: DateTime<Utc>,
}

impl CacheInvalidatedEvent {
    pub fn covers(&self, scope: CacheScope) -> bool {
        self.scopes.contains(&scope)
    }
}

/// Envelope delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_serializes_with_type_tag() {
        let event = Event::CacheInvalidated(CacheInvalidatedEvent {
            customer_id: "C9".into(),
            service_id: "1".into(),
            scopes: vec![CacheScope::CustomerBookings],
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(EventMessage::new(event)).unwrap();
        assert_eq!(json["type"], "CacheInvalidated");
        assert_eq!(json["data"]["customer_id"], "C9");
        assert_eq!(json["data"]["scopes"][0], "customer_bookings");
    }
}
