//! Pre-insertion checks for booking requests

use std::sync::Arc;

use tracing::debug;

use crate::application::policy::StorePolicy;
use crate::domain::{BookingFilter, DomainError, DomainResult, RepositoryProvider};

/// Why a booking request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Unauthenticated,
    SelfBooking,
    ServiceUnavailable,
    ProviderMismatch,
    AlreadyBooked,
}

impl RejectReason {
    pub fn into_error(
        self,
        service_id: &str,
        customer_id: Option<&str>,
        provider_id: &str,
    ) -> DomainError {
        let customer_id = customer_id.unwrap_or_default().to_string();
        let service_id = service_id.to_string();
        match self {
            RejectReason::Unauthenticated => DomainError::Unauthenticated,
            RejectReason::SelfBooking => DomainError::SelfBooking { customer_id },
            RejectReason::ServiceUnavailable => DomainError::ServiceUnavailable { service_id },
            RejectReason::ProviderMismatch => DomainError::ProviderMismatch {
                service_id,
                provider_id: provider_id.to_string(),
            },
            RejectReason::AlreadyBooked => DomainError::AlreadyBooked {
                service_id,
                customer_id,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Rejected(RejectReason),
}

/// Validates a prospective booking against the caller's identity, the
/// service being booked and the bookings already on record.
///
/// This is a fast-path check only. Nothing stops another request for the
/// same pair from landing between `check` and the insert; the store's
/// uniqueness rule is what finally settles it.
pub struct BookingGuard {
    repos: Arc<dyn RepositoryProvider>,
    policy: StorePolicy,
}

impl BookingGuard {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: StorePolicy) -> Self {
        Self { repos, policy }
    }

    /// Checks run cheapest first: identity and the claimed provider need no
    /// I/O. Then the service is resolved so that self-booking is judged
    /// against its real owner, and finally one lookup for an active booking
    /// on the same pair. Store errors are returned as errors, never as a
    /// decision.
    pub async fn check(
        &self,
        service_id: &str,
        customer_id: Option<&str>,
        provider_id: &str,
    ) -> DomainResult<GuardDecision> {
        let Some(customer_id) = customer_id.filter(|c| !c.trim().is_empty()) else {
            return Ok(GuardDecision::Rejected(RejectReason::Unauthenticated));
        };

        if customer_id == provider_id {
            return Ok(GuardDecision::Rejected(RejectReason::SelfBooking));
        }

        let services = self.repos.services();
        let service = self
            .policy
            .read("fetch_service", || services.find_by_id(service_id))
            .await?;
        let Some(service) = service.filter(|s| s.is_active) else {
            debug!(service_id, "Service missing or inactive");
            return Ok(GuardDecision::Rejected(RejectReason::ServiceUnavailable));
        };

        if service.provider_id == customer_id {
            return Ok(GuardDecision::Rejected(RejectReason::SelfBooking));
        }
        if service.provider_id != provider_id {
            debug!(
                service_id,
                claimed = provider_id,
                owner = %service.provider_id,
                "Provider does not own service"
            );
            return Ok(GuardDecision::Rejected(RejectReason::ProviderMismatch));
        }

        let filter = BookingFilter::active_for(service_id, customer_id);
        let bookings = self.repos.bookings();
        let existing = self
            .policy
            .read("fetch_bookings", || bookings.find(&filter))
            .await?;

        if let Some(active) = existing.first() {
            debug!(
                service_id,
                customer_id,
                booking_id = %active.id,
                status = %active.status,
                "Active booking already on record"
            );
            return Ok(GuardDecision::Rejected(RejectReason::AlreadyBooked));
        }

        Ok(GuardDecision::Allowed)
    }
}
