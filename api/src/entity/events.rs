//! SeaORM Entity for events table
//!
//! Only the columns the boost flow reads or writes are mapped here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub organizer_id: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,

    pub starts_at: DateTimeUtc,
    pub is_cancelled: bool,

    pub is_boosted: bool,
    /// 0 = none, 1 = basic, 2 = premium
    pub boost_level: i16,
    #[sea_orm(nullable)]
    pub boost_until: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::boost_receipts::Entity")]
    BoostReceipts,
}

impl Related<super::boost_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoostReceipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
