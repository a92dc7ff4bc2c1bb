//! Provider repository interface

use async_trait::async_trait;

use super::model::Provider;
use crate::domain::DomainResult;

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Batched lookup. Unknown ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Provider>>;

    /// Insert or replace a provider
    async fn save(&self, provider: Provider) -> DomainResult<()>;
}
