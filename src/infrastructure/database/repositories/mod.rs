//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod provider_repository;
pub mod repository_provider;
pub mod service_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::DbErr;

use crate::shared::errors::{DomainError, CONNECTION_ERROR_PREFIX};

fn describe(e: &DbErr) -> String {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            format!("{} {}", CONNECTION_ERROR_PREFIX, e)
        }
        _ => format!("Database error: {}", e),
    }
}

/// Map a failed read into the fetch-failed kind.
pub(crate) fn read_err(e: DbErr) -> DomainError {
    DomainError::FetchFailed(describe(&e))
}

/// Map a failed write into the insert-failed kind.
pub(crate) fn write_err(e: DbErr) -> DomainError {
    DomainError::InsertFailed(describe(&e))
}
