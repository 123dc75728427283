// Health check service implementation

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use tracing::warn;

pub struct HealthChecker {
    conn: DatabaseConnection,
}

impl HealthChecker {
    pub fn new(conn: &DatabaseConnection) -> Self {
        Self { conn: conn.clone() }
    }

    /// True when the database answers a trivial query
    pub async fn check(&self) -> bool {
        let backend = self.conn.get_database_backend();
        match self
            .conn
            .execute(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
