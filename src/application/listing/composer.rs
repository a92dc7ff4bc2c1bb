//! Listing composition: active services joined with their providers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::policy::StorePolicy;
use crate::domain::{
    DomainResult, ListingFilter, ListingView, Provider, RepositoryProvider, Service,
};

/// Builds customer-facing listings.
///
/// Two store round trips at most: one for the services, one batched lookup
/// for every provider they reference. Either failing fails the query; an
/// empty result always means "nothing matched".
pub struct ListingComposer {
    repos: Arc<dyn RepositoryProvider>,
    policy: StorePolicy,
}

impl ListingComposer {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: StorePolicy) -> Self {
        Self { repos, policy }
    }

    pub async fn query(&self, filter: &ListingFilter) -> DomainResult<Vec<ListingView>> {
        let service_filter = filter.to_service_filter();
        let services_repo = self.repos.services();

        let services = self
            .policy
            .read("fetch_services", || services_repo.find_active(&service_filter))
            .await
            .map_err(|e| {
                warn!(error = %e, ?service_filter, "Service fetch failed");
                e
            })?;

        if services.is_empty() {
            debug!(?service_filter, "No services matched");
            return Ok(Vec::new());
        }

        let provider_ids = distinct_provider_ids(&services);
        let providers_repo = self.repos.providers();

        let providers = self
            .policy
            .read("fetch_providers", || providers_repo.find_by_ids(&provider_ids))
            .await
            .map_err(|e| {
                warn!(error = %e, count = provider_ids.len(), "Provider fetch failed");
                e
            })?;

        debug!(
            services = services.len(),
            providers = providers.len(),
            "Composed listings"
        );
        Ok(join(services, providers))
    }
}

/// Provider ids in first-seen order, without repeats.
fn distinct_provider_ids(services: &[Service]) -> Vec<String> {
    let mut seen = HashSet::new();
    services
        .iter()
        .filter(|s| seen.insert(s.provider_id.as_str()))
        .map(|s| s.provider_id.clone())
        .collect()
}

fn join(services: Vec<Service>, providers: Vec<Provider>) -> Vec<ListingView> {
    let by_id: HashMap<String, Provider> = providers
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    services
        .into_iter()
        .map(|service| {
            let provider = by_id.get(&service.provider_id).cloned();
            ListingView { service, provider }
        })
        .collect()
}
