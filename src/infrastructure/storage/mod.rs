//! In-process storage
//!
//! DashMap-backed repositories for development, demos and tests. Enforces
//! the same one-active-booking-per-pair rule as the SQL schema.

mod memory;

pub use memory::InMemoryRepositoryProvider;
