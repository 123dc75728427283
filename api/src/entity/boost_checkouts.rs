//! SeaORM Entity for boost_checkouts table (the checkout ledger)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boost_checkouts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Keyed HMAC of the provider session id
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub session_hash: Option<String>,
    /// Raw provider session id, only present on rows written before hashing
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub legacy_session_id: Option<String>,

    /// CREATED, PAID or PROCESSED
    #[sea_orm(column_type = "Text")]
    pub status: String,
    pub level: i16,
    pub amount: i64,
    #[sea_orm(column_type = "Text")]
    pub currency: String,

    #[sea_orm(column_type = "Text")]
    pub event_id: String,
    #[sea_orm(column_type = "Text")]
    pub organizer_id: String,

    /// Set exactly once, by the first successful claim
    #[sea_orm(nullable)]
    pub processed_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::boost_receipts::Entity")]
    BoostReceipt,
}

impl Related<super::boost_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoostReceipt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
