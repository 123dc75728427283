use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260401_000002_create_boost_checkouts_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger of checkout sessions; processed_at is the exactly-once claim
        manager
            .create_table(
                Table::create()
                    .table(BoostCheckouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoostCheckouts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BoostCheckouts::SessionHash)
                            .text()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BoostCheckouts::LegacySessionId)
                            .text()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BoostCheckouts::Status)
                            .text()
                            .not_null()
                            .default("CREATED"),
                    )
                    .col(ColumnDef::new(BoostCheckouts::Level).small_integer().not_null())
                    .col(ColumnDef::new(BoostCheckouts::Amount).big_integer().not_null())
                    .col(ColumnDef::new(BoostCheckouts::Currency).text().not_null())
                    .col(ColumnDef::new(BoostCheckouts::EventId).text().not_null())
                    .col(ColumnDef::new(BoostCheckouts::OrganizerId).text().not_null())
                    .col(ColumnDef::new(BoostCheckouts::ProcessedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(BoostCheckouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BoostCheckouts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boost_checkouts_event_id")
                    .table(BoostCheckouts::Table)
                    .col(BoostCheckouts::EventId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boost_checkouts_organizer_id")
                    .table(BoostCheckouts::Table)
                    .col(BoostCheckouts::OrganizerId)
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
                    .table(BoostCheckouts::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum BoostCheckouts {
    Table,
    Id,
    SessionHash,
    LegacySessionId,
    Status,
    Level,
    Amount,
    Currency,
    EventId,
    OrganizerId,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}
