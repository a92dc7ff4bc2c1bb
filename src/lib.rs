//! # servicehub
//!
//! Service marketplace core: customers browse active service listings and
//! request bookings from providers.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, filters, events and repository traits
//! - **application**: Listing composition, booking guard and service, history cache
//! - **infrastructure**: SeaORM persistence and in-process storage
//! - **shared**: Errors, retry/deadline helpers, tracing setup
//!
//! At most one active (pending or accepted) booking exists per
//! (service, customer) pair. The application checks first, but the store
//! enforces it: a partial unique index in SQL, an atomic claim in memory.

pub mod application;
pub mod catalogue;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use application::{create_event_bus, Event, EventBus, Marketplace, SharedEventBus};
pub use shared::errors::{AppError, DomainError, ErrorKind, InfraError};
