//! Booking aggregate
//!
//! Contains the Booking entity, its status machine, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingDraft, BookingFilter, BookingStatus};
pub use repository::BookingRepository;
