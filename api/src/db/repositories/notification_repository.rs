use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::DbError;
use crate::entity::notifications;

/// Notification kind emitted when a boost becomes active
pub const KIND_BOOST_ACTIVATED: &str = "BOOST_ACTIVATED";

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

/// Repository for the user-facing notification feed
#[derive(Clone, Debug)]
pub struct NotificationRepository {
    conn: DatabaseConnection,
}

impl NotificationRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Latest notifications for a user
    pub async fn find_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<notifications::Model>, DbError> {
        let results = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(results)
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        notification: NewNotification,
        now: DateTime<Utc>,
    ) -> Result<notifications::Model, DbErr> {
        notifications::ActiveModel {
            user_id: Set(notification.user_id),
            kind: Set(notification.kind),
            title: Set(notification.title),
            body: Set(notification.body),
            link: Set(notification.link),
            read_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
