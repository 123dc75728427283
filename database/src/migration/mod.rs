pub use sea_orm_migration::prelude::*;

mod m20260401_000001_create_events_table;
mod m20260401_000002_create_boost_checkouts_table;
mod m20260401_000003_create_boost_receipts_table;
mod m20260401_000004_create_notifications_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_events_table::Migration),
            Box::new(m20260401_000002_create_boost_checkouts_table::Migration),
            Box::new(m20260401_000003_create_boost_receipts_table::Migration),
            Box::new(m20260401_000004_create_notifications_table::Migration),
        ]
    }
}
