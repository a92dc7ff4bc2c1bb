//! Booking request flow and the caches it keeps fresh

pub mod guard;
pub mod history;
pub mod service;

pub use guard::{BookingGuard, GuardDecision, RejectReason};
pub use history::BookingHistoryCache;
pub use service::{BookingService, InvalidationSink};
