// Repository for event lookups and boost updates

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::DbError;
use crate::entity::events;

#[derive(Clone, Debug)]
pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get event by ID
    pub async fn get_by_id(&self, event_id: &str) -> Result<Option<events::Model>, DbError> {
        let result = events::Entity::find_by_id(event_id.to_string())
            .one(&self.conn)
            .await?;
        Ok(result)
    }

    /// Events whose boost window is still open at `now`, strongest first
    pub async fn find_active_boosted(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<events::Model>, DbError> {
        let results = events::Entity::find()
            .filter(events::Column::IsCancelled.eq(false))
            .filter(events::Column::IsBoosted.eq(true))
            .filter(events::Column::BoostLevel.gt(0))
            .filter(events::Column::BoostUntil.gt(now))
            .order_by_desc(events::Column::BoostLevel)
            .order_by_desc(events::Column::BoostUntil)
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    /// Loads an event inside a transaction, row-locked where the backend supports it
    pub async fn find_for_update<C: ConnectionTrait>(
        db: &C,
        event_id: &str,
    ) -> Result<Option<events::Model>, DbErr> {
        let query = events::Entity::find_by_id(event_id.to_string());
        match db.get_database_backend() {
            DbBackend::Postgres | DbBackend::MySql => query.lock_exclusive().one(db).await,
            DbBackend::Sqlite => query.one(db).await,
        }
    }

    /// Writes a new boost window onto an event
    pub async fn apply_boost<C: ConnectionTrait>(
        db: &C,
        event: events::Model,
        level: i16,
        until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<events::Model, DbErr> {
        let mut active: events::ActiveModel = event.into();
        active.is_boosted = Set(true);
        active.boost_level = Set(level);
        active.boost_until = Set(Some(until));
        active.updated_at = Set(now);
        active.update(db).await
    }
}
