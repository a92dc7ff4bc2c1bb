//! Service domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// A bookable offering published by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Non-negative price in the marketplace currency
    pub price: Decimal,
    /// Matched case-insensitively by listing queries
    pub category: String,
    pub city: String,
    pub provider_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        city: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            price,
            category: category.into(),
            city: city.into(),
            provider_id: provider_id.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Normalized category used for case-insensitive comparison.
    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::Validation("Service id must not be empty".into()));
        }
        if self.provider_id.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "Service {} has no provider",
                self.id
            )));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(DomainError::Validation(format!(
                "Service {} has a negative price",
                self.id
            )));
        }
        Ok(())
    }
}

/// Unicode-aware lowercase form of a category. Stores that persist a
/// category must also persist this key and compare against it, since SQL
/// `lower()` only folds ASCII on some backends.
pub fn category_key(category: &str) -> String {
    category.to_lowercase()
}

/// Listing criteria for active services.
///
/// `category` compares case-insensitively, `city` exactly. A `None` field
/// is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub city: Option<String>,
}

impl ServiceFilter {
    pub fn matches(&self, service: &Service) -> bool {
        service.is_active
            && self
                .category
                .as_deref()
                .map_or(true, |c| service.category_key() == category_key(c))
            && self.city.as_deref().map_or(true, |c| service.city == c)
    }
}
