//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::booking::BookingRepository;
use super::provider::ProviderRepository;
use super::service::ServiceRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let services = repos.services().find_active(&filter).await?;
///     let providers = repos.providers().find_by_ids(&ids).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn services(&self) -> &dyn ServiceRepository;
    fn providers(&self) -> &dyn ProviderRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
