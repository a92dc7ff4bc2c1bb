//! Seed catalogue: providers and services loaded from a TOML file
//!
//! ```toml
//! [[providers]]
//! id = "P1"
//! display_name = "Asha"
//!
//! [[services]]
//! id = "1"
//! title = "Deep cleaning"
//! price = "750"
//! category = "Cleaning"
//! city = "Pune"
//! provider_id = "P1"
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{DomainResult, Provider, RepositoryProvider, Service};
use crate::shared::errors::InfraError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalogue {
    pub providers: Vec<Provider>,
    pub services: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub city: String,
    pub provider_id: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ServiceEntry> for Service {
    fn from(entry: ServiceEntry) -> Self {
        let mut service = Service::new(
            entry.id,
            entry.title,
            entry.price,
            entry.category,
            entry.city,
            entry.provider_id,
        );
        service.description = entry.description;
        if !entry.active {
            service.deactivate();
        }
        service
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub providers: usize,
    pub services: usize,
}

impl Catalogue {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Upsert every provider, then every service. Services are validated
    /// first so a bad entry leaves the store untouched.
    pub async fn seed(self, repos: &dyn RepositoryProvider) -> DomainResult<SeedReport> {
        let services: Vec<Service> = self.services.into_iter().map(Service::from).collect();
        for service in &services {
            service.validate()?;
        }

        let mut report = SeedReport::default();
        for provider in self.providers {
            repos.providers().save(provider).await?;
            report.providers += 1;
        }
        for service in services {
            repos.services().save(service).await?;
            report.services += 1;
        }

        info!(
            providers = report.providers,
            services = report.services,
            "Catalogue seeded"
        );
        Ok(report)
    }
}
