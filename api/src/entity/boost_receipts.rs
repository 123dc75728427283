//! SeaORM Entity for boost_receipts table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boost_receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub boost_checkout_id: i32,

    #[sea_orm(column_type = "Text")]
    pub event_id: String,
    #[sea_orm(column_type = "Text")]
    pub organizer_id: String,
    /// Title at purchase time
    #[sea_orm(column_type = "Text")]
    pub event_title: String,

    pub level: i16,
    pub amount: i64,
    #[sea_orm(column_type = "Text")]
    pub currency: String,
    pub boost_until: DateTimeUtc,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::boost_checkouts::Entity",
        from = "Column::BoostCheckoutId",
        to = "super::boost_checkouts::Column::Id"
    )]
    BoostCheckout,
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
}

impl Related<super::boost_checkouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoostCheckout.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
