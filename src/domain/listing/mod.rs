//! Listing read model
//!
//! Denormalized, never-persisted views combining a service with its provider.

pub mod model;

pub use model::{ListingFilter, ListingView};
