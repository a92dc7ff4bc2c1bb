//! Service aggregate
//!
//! A provider's bookable offering and the repository that lists them.

pub mod model;
pub mod repository;

pub use model::{category_key, Service, ServiceFilter};
pub use repository::ServiceRepository;
