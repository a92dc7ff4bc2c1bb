//! Listing view types

use serde::{Deserialize, Serialize};

use crate::domain::provider::Provider;
use crate::domain::service::{Service, ServiceFilter};

/// What the customer selected on the browse screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub city: Option<String>,
}

impl ListingFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            city: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Store-level filter. Blank selections are treated as unset.
    pub fn to_service_filter(&self) -> ServiceFilter {
        fn non_blank(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        }

        ServiceFilter {
            category: non_blank(&self.category),
            city: non_blank(&self.city),
        }
    }
}

/// A service enriched with its provider
///
/// `provider` is `None` exactly when no provider record matched
/// `service.provider_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub service: Service,
    pub provider: Option<Provider>,
}
