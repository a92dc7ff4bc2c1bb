pub mod booking;
pub mod events;
pub mod listing;
pub mod provider;
pub mod repositories;
pub mod service;

// Re-export commonly used types
pub use booking::{Booking, BookingDraft, BookingFilter, BookingRepository, BookingStatus};
pub use events::{CacheScope, Event, EventMessage};
pub use listing::{ListingFilter, ListingView};
pub use provider::{Provider, ProviderRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use service::{Service, ServiceFilter, ServiceRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, ErrorKind};
