//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, BookingDraft, BookingFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find bookings matching the filter, oldest first
    async fn find(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>>;

    /// Insert a new booking and return it with its assigned id.
    ///
    /// Implementations must reject a second active booking for the same
    /// service/customer pair with `DomainError::AlreadyBooked`, independently
    /// of any check the caller performed beforehand.
    async fn insert(&self, draft: BookingDraft) -> DomainResult<Booking>;
}
