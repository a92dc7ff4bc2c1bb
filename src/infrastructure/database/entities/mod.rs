//! Database entities module

pub mod booking;
pub mod provider;
pub mod service;

pub use booking::Entity as Booking;
pub use provider::Entity as Provider;
pub use service::Entity as Service;
