use sea_orm_migration::prelude::*;

use super::m20260401_000001_create_events_table::Events;
use super::m20260401_000002_create_boost_checkouts_table::BoostCheckouts;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260401_000003_create_boost_receipts_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoostReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoostReceipts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One receipt per checkout
                    .col(
                        ColumnDef::new(BoostReceipts::BoostCheckoutId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BoostReceipts::EventId).text().not_null())
                    .col(ColumnDef::new(BoostReceipts::OrganizerId).text().not_null())
                    .col(ColumnDef::new(BoostReceipts::EventTitle).text().not_null())
                    .col(ColumnDef::new(BoostReceipts::Level).small_integer().not_null())
                    .col(ColumnDef::new(BoostReceipts::Amount).big_integer().not_null())
                    .col(ColumnDef::new(BoostReceipts::Currency).text().not_null())
                    .col(
                        ColumnDef::new(BoostReceipts::BoostUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BoostReceipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boost_receipts_checkout")
                            .from(BoostReceipts::Table, BoostReceipts::BoostCheckoutId)
                            .to(BoostCheckouts::Table, BoostCheckouts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boost_receipts_event")
                            .from(BoostReceipts::Table, BoostReceipts::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boost_receipts_organizer_created")
                    .table(BoostReceipts::Table)
                    .col(BoostReceipts::OrganizerId)
                    .col(BoostReceipts::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(BoostReceipts::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum BoostReceipts {
    Table,
    Id,
    BoostCheckoutId,
    EventId,
    OrganizerId,
    EventTitle,
    Level,
    Amount,
    Currency,
    BoostUntil,
    CreatedAt,
}
