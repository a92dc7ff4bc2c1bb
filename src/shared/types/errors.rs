use thiserror::Error;

/// Prefix used by repositories when a read or write failed because the
/// store could not be reached at all (pool exhausted, connection dropped).
pub const CONNECTION_ERROR_PREFIX: &str = "Connection error:";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Booking failed: {0}")]
    InsertFailed(String),

    #[error("No customer identity supplied")]
    Unauthenticated,

    #[error("Customer {customer_id} cannot book their own service")]
    SelfBooking { customer_id: String },

    #[error("Customer {customer_id} already has an active booking for service {service_id}")]
    AlreadyBooked {
        service_id: String,
        customer_id: String,
    },

    #[error("Service {service_id} does not exist or is no longer offered")]
    ServiceUnavailable { service_id: String },

    #[error("Service {service_id} is not offered by provider {provider_id}")]
    ProviderMismatch {
        service_id: String,
        provider_id: String,
    },

    #[error("Timed out during {operation}")]
    Timeout { operation: &'static str },

    #[error("Validation: {0}")]
    Validation(String),
}

/// Stable, payload-free classification of a [`DomainError`] for callers
/// that only need to branch on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FetchFailed,
    InsertFailed,
    Unauthenticated,
    SelfBooking,
    AlreadyBooked,
    ServiceUnavailable,
    ProviderMismatch,
    Timeout,
    Validation,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::FetchFailed(_) => ErrorKind::FetchFailed,
            DomainError::InsertFailed(_) => ErrorKind::InsertFailed,
            DomainError::Unauthenticated => ErrorKind::Unauthenticated,
            DomainError::SelfBooking { .. } => ErrorKind::SelfBooking,
            DomainError::AlreadyBooked { .. } => ErrorKind::AlreadyBooked,
            DomainError::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            DomainError::ProviderMismatch { .. } => ErrorKind::ProviderMismatch,
            DomainError::Timeout { .. } => ErrorKind::Timeout,
            DomainError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Whether this error is likely transient (deadline elapsed, store
    /// unreachable) and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::Timeout { .. } => true,
            DomainError::FetchFailed(msg) | DomainError::InsertFailed(msg) => {
                msg.starts_with(CONNECTION_ERROR_PREFIX)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}
