use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_events;
mod m20261001_000003_create_ticket_categories;
mod m20261001_000004_create_tickets;
mod m20261001_000005_create_cart_lines;
mod m20261001_000006_create_transaction_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_events::Migration),
            Box::new(m20261001_000003_create_ticket_categories::Migration),
            Box::new(m20261001_000004_create_tickets::Migration),
            Box::new(m20261001_000005_create_cart_lines::Migration),
            Box::new(m20261001_000006_create_transaction_records::Migration),
        ]
    }
}
