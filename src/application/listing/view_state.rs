//! Browse selection state
//!
//! City filtering only applies within a chosen category, so picking a
//! category always clears the city.

use serde::{Deserialize, Serialize};

use crate::domain::ListingFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    category: Option<String>,
    city: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Choose a category. Resets the city selection.
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
        self.city = None;
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.city = Some(city.into());
    }

    pub fn clear(&mut self) {
        self.category = None;
        self.city = None;
    }

    /// The listing query this selection stands for.
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            category: self.category.clone(),
            city: self.city.clone(),
        }
    }
}
