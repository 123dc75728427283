// Repository for the boost checkout ledger

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
};

use crate::db::DbError;
use crate::entity::boost_checkouts;

/// Processing state of a checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStatus {
    Created,
    Paid,
    Processed,
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Created => "CREATED",
            CheckoutStatus::Paid => "PAID",
            CheckoutStatus::Processed => "PROCESSED",
        }
    }
}

/// Purchase details recorded on a ledger row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub level: i16,
    pub amount: i64,
    pub currency: String,
    pub event_id: String,
    pub organizer_id: String,
}

#[derive(Clone, Debug)]
pub struct CheckoutRepository {
    conn: DatabaseConnection,
}

impl CheckoutRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records a freshly created checkout session as CREATED.
    /// A row that already exists for the hash is left untouched.
    pub async fn record_created(
        &self,
        session_hash: &str,
        details: &CheckoutDetails,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let row = new_row(session_hash, details, CheckoutStatus::Created, now);
        boost_checkouts::Entity::insert(row)
            .on_conflict(
                OnConflict::column(boost_checkouts::Column::SessionHash)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;
        Ok(())
    }

    /// Finds the ledger row for a session, by hash first and then by the raw id
    /// rows written before hashing was introduced carry. The row is locked for the
    /// rest of the transaction where the backend supports it.
    pub async fn find_by_session<C: ConnectionTrait>(
        db: &C,
        session_hash: &str,
        raw_session_id: &str,
    ) -> Result<Option<boost_checkouts::Model>, DbErr> {
        let by_hash = find_locked(
            db,
            boost_checkouts::Column::SessionHash.eq(session_hash),
        )
        .await?;
        if by_hash.is_some() {
            return Ok(by_hash);
        }

        find_locked(
            db,
            boost_checkouts::Column::LegacySessionId.eq(raw_session_id),
        )
        .await
    }

    /// Idempotently records a confirmed payment for a session.
    ///
    /// Creates the row when missing, otherwise refreshes the purchase details. A
    /// legacy row is re-keyed to the hash and its raw id is dropped. The move to
    /// PAID only applies while the row is unclaimed, so a PROCESSED row stays
    /// PROCESSED whatever ran before. This call never gates anything.
    pub async fn upsert_paid<C: ConnectionTrait>(
        db: &C,
        session_hash: &str,
        raw_session_id: &str,
        details: &CheckoutDetails,
        now: DateTime<Utc>,
    ) -> Result<boost_checkouts::Model, DbErr> {
        if Self::find_by_session(db, session_hash, raw_session_id)
            .await?
            .is_none()
        {
            let row = new_row(session_hash, details, CheckoutStatus::Paid, now);
            // A concurrent callback may insert the same hash first
            boost_checkouts::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(boost_checkouts::Column::SessionHash)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
        }

        let existing = Self::find_by_session(db, session_hash, raw_session_id)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound("boost checkout vanished during upsert".to_string())
            })?;
        let checkout_id = existing.id;

        // Status is left out of this write; it only moves forward below
        let mut active: boost_checkouts::ActiveModel = existing.into();
        active.session_hash = Set(Some(session_hash.to_string()));
        active.legacy_session_id = Set(None);
        active.level = Set(details.level);
        active.amount = Set(details.amount);
        active.currency = Set(details.currency.clone());
        active.event_id = Set(details.event_id.clone());
        active.organizer_id = Set(details.organizer_id.clone());
        active.updated_at = Set(now);
        active.update(db).await?;

        boost_checkouts::Entity::update_many()
            .col_expr(
                boost_checkouts::Column::Status,
                Expr::value(CheckoutStatus::Paid.as_str()),
            )
            .filter(
                Condition::all()
                    .add(boost_checkouts::Column::Id.eq(checkout_id))
                    .add(boost_checkouts::Column::ProcessedAt.is_null()),
            )
            .exec(db)
            .await?;

        boost_checkouts::Entity::find_by_id(checkout_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound("boost checkout vanished during upsert".to_string())
            })
    }

    /// Claims a ledger row for processing.
    ///
    /// Single conditional write: succeeds for exactly one caller per row, the one
    /// that flips `processed_at` from NULL. Returns whether this caller won.
    pub async fn claim<C: ConnectionTrait>(
        db: &C,
        checkout_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = boost_checkouts::Entity::update_many()
            .col_expr(boost_checkouts::Column::ProcessedAt, Expr::value(now))
            .col_expr(
                boost_checkouts::Column::Status,
                Expr::value(CheckoutStatus::Processed.as_str()),
            )
            .col_expr(boost_checkouts::Column::UpdatedAt, Expr::value(now))
            .filter(
                Condition::all()
                    .add(boost_checkouts::Column::Id.eq(checkout_id))
                    .add(boost_checkouts::Column::ProcessedAt.is_null()),
            )
            .exec(db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

async fn find_locked<C: ConnectionTrait>(
    db: &C,
    condition: SimpleExpr,
) -> Result<Option<boost_checkouts::Model>, DbErr> {
    let query = boost_checkouts::Entity::find().filter(condition);
    match db.get_database_backend() {
        DbBackend::Postgres | DbBackend::MySql => query.lock_exclusive().one(db).await,
        DbBackend::Sqlite => query.one(db).await,
    }
}

fn new_row(
    session_hash: &str,
    details: &CheckoutDetails,
    status: CheckoutStatus,
    now: DateTime<Utc>,
) -> boost_checkouts::ActiveModel {
    boost_checkouts::ActiveModel {
        session_hash: Set(Some(session_hash.to_string())),
        legacy_session_id: Set(None),
        status: Set(status.as_str().to_string()),
        level: Set(details.level),
        amount: Set(details.amount),
        currency: Set(details.currency.clone()),
        event_id: Set(details.event_id.clone()),
        organizer_id: Set(details.organizer_id.clone()),
        processed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}
