//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_providers;
mod m20250601_000002_create_services;
mod m20250601_000003_create_bookings;

pub use m20250601_000003_create_bookings::ACTIVE_PAIR_INDEX;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_providers::Migration),
            Box::new(m20250601_000002_create_services::Migration),
            Box::new(m20250601_000003_create_bookings::Migration),
        ]
    }
}
