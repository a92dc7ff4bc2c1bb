//! Service repository interface

use async_trait::async_trait;

use super::model::{Service, ServiceFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Find active services matching the filter, in store order
    async fn find_active(&self, filter: &ServiceFilter) -> DomainResult<Vec<Service>>;

    /// Find a service by ID (active or not)
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Service>>;

    /// Insert or replace a service
    async fn save(&self, service: Service) -> DomainResult<()>;
}
