//! Provider aggregate

pub mod model;
pub mod repository;

pub use model::Provider;
pub use repository::ProviderRepository;
