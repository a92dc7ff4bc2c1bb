//! Booking domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking status
///
/// Only `Pending` is ever produced by the customer-facing flow; the other
/// transitions belong to the provider-side workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Requested by the customer, awaiting the provider
    Pending,
    /// Accepted by the provider
    Accepted,
    /// Declined by the provider
    Rejected,
    /// Service delivered
    Completed,
}

impl BookingStatus {
    /// Statuses that block a new booking for the same service/customer pair.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Accepted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parse a stored status. Unknown values map to `Rejected` so that a
    /// corrupt row never counts as an active booking.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "completed" => Self::Completed,
            _ => Self::Rejected,
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking as handed to the store. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub service_id: String,
    pub customer_id: String,
    /// Copy of the service's provider at creation time
    pub provider_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingDraft {
    /// New pending request stamped with the current time.
    pub fn pending(
        service_id: impl Into<String>,
        customer_id: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            customer_id: customer_id.into(),
            provider_id: provider_id.into(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn into_booking(self, id: impl Into<String>) -> Booking {
        Booking {
            id: id.into(),
            service_id: self.service_id,
            customer_id: self.customer_id,
            provider_id: self.provider_id,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Persisted booking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub service_id: String,
    pub customer_id: String,
    pub provider_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Booking lookup criteria. Unset fields are not applied; an empty
/// `status_in` matches every status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub service_id: Option<String>,
    pub customer_id: Option<String>,
    pub status_in: Vec<BookingStatus>,
}

impl BookingFilter {
    /// Active bookings for one service/customer pair.
    pub fn active_for(service_id: &str, customer_id: &str) -> Self {
        Self {
            service_id: Some(service_id.to_string()),
            customer_id: Some(customer_id.to_string()),
            status_in: BookingStatus::ACTIVE.to_vec(),
        }
    }

    /// Every booking made by a customer.
    pub fn for_customer(customer_id: &str) -> Self {
        Self {
            customer_id: Some(customer_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.service_id
            .as_deref()
            .map_or(true, |id| booking.service_id == id)
            && self
                .customer_id
                .as_deref()
                .map_or(true, |id| booking.customer_id == id)
            && (self.status_in.is_empty() || self.status_in.contains(&booking.status))
    }
}

// ── Tests ──────────────────────────────────────────────────────
