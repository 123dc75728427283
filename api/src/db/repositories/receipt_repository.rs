// Repository for boost receipts (billing records)

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::DbError;
use crate::entity::boost_receipts;

/// Receipt values for one processed checkout
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub boost_checkout_id: i32,
    pub event_id: String,
    pub organizer_id: String,
    pub event_title: String,
    pub level: i16,
    pub amount: i64,
    pub currency: String,
    pub boost_until: DateTime<Utc>,
}

/// Aggregated revenue for one currency and level
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct RevenueRow {
    pub currency: String,
    pub level: i16,
    pub receipts: i64,
    pub total_amount: i64,
}

#[derive(Clone, Debug)]
pub struct ReceiptRepository {
    conn: DatabaseConnection,
}

impl ReceiptRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Receipts belonging to an organizer, newest first
    pub async fn find_by_organizer(
        &self,
        organizer_id: &str,
    ) -> Result<Vec<boost_receipts::Model>, DbError> {
        let results = boost_receipts::Entity::find()
            .filter(boost_receipts::Column::OrganizerId.eq(organizer_id))
            .order_by_desc(boost_receipts::Column::CreatedAt)
            .order_by_desc(boost_receipts::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    /// Receipt count and amount totals grouped by currency and level
    pub async fn revenue_by_currency_and_level(&self) -> Result<Vec<RevenueRow>, DbError> {
        let rows = boost_receipts::Entity::find()
            .select_only()
            .column(boost_receipts::Column::Currency)
            .column(boost_receipts::Column::Level)
            .column_as(Expr::col(boost_receipts::Column::Id).count(), "receipts")
            .column_as(
                SimpleExpr::from(Func::cast_as(
                    Expr::col(boost_receipts::Column::Amount).sum(),
                    Alias::new("BIGINT"),
                )),
                "total_amount",
            )
            .group_by(boost_receipts::Column::Currency)
            .group_by(boost_receipts::Column::Level)
            .order_by_asc(boost_receipts::Column::Currency)
            .order_by_asc(boost_receipts::Column::Level)
            .into_model::<RevenueRow>()
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Inserts the receipt for a checkout, or refreshes it when one already exists.
    /// There is never more than one receipt per checkout.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        receipt: &NewReceipt,
        now: DateTime<Utc>,
    ) -> Result<boost_receipts::Model, DbErr> {
        let row = boost_receipts::ActiveModel {
            boost_checkout_id: Set(receipt.boost_checkout_id),
            event_id: Set(receipt.event_id.clone()),
            organizer_id: Set(receipt.organizer_id.clone()),
            event_title: Set(receipt.event_title.clone()),
            level: Set(receipt.level),
            amount: Set(receipt.amount),
            currency: Set(receipt.currency.clone()),
            boost_until: Set(receipt.boost_until),
            created_at: Set(now),
            ..Default::default()
        };

        boost_receipts::Entity::insert(row)
            .on_conflict(
                OnConflict::column(boost_receipts::Column::BoostCheckoutId)
                    .update_columns([
                        boost_receipts::Column::Level,
                        boost_receipts::Column::Amount,
                        boost_receipts::Column::Currency,
                        boost_receipts::Column::BoostUntil,
                        boost_receipts::Column::EventTitle,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        boost_receipts::Entity::find()
            .filter(boost_receipts::Column::BoostCheckoutId.eq(receipt.boost_checkout_id))
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("boost receipt missing after upsert".to_string()))
    }
}
