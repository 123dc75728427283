use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::migration::Migrator;

async fn connect() -> Result<DatabaseConnection, Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    info!("Connecting to database {} on {}", config.name, config.host);

    Database::connect(&config.url).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        Box::new(e) as Box<dyn Error>
    })
}

/// Execute the migrate command
pub async fn execute(steps: Option<u32>) -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    let pending = Migrator::get_pending_migrations(&connection).await?;
    info!("{} pending migrations", pending.len());
    for m in &pending {
        info!("Pending: {}", m.name());
    }

    match steps {
        Some(n) => info!("Running {} migrations", n),
        None => info!("Running all pending migrations"),
    }

    Migrator::up(&connection, steps).await.map_err(|e| {
        error!("Failed to run migrations: {:?}", e);
        e
    })?;

    info!("Migrations applied");
    Ok(())
}

/// Roll back the last `steps` migrations (one by default)
pub async fn rollback(steps: Option<u32>) -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;
    let steps = steps.unwrap_or(1);

    info!("Rolling back {} migrations", steps);
    Migrator::down(&connection, Some(steps)).await.map_err(|e| {
        error!("Failed to roll back migrations: {:?}", e);
        e
    })?;

    info!("Rollback complete");
    Ok(())
}

/// Drop every table and re-run all migrations
pub async fn reset() -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    info!("Resetting database");
    Migrator::fresh(&connection).await.map_err(|e| {
        error!("Failed to reset database: {:?}", e);
        e
    })?;

    info!("Database reset complete");
    Ok(())
}

/// Print applied and pending migrations
pub async fn status() -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    let applied = Migrator::get_applied_migrations(&connection).await?;
    let pending = Migrator::get_pending_migrations(&connection).await?;

    info!(
        "{} applied, {} pending",
        applied.len(),
        pending.len()
    );
    for m in &applied {
        info!("Applied: {}", m.name());
    }
    for m in &pending {
        info!("Pending: {}", m.name());
    }

    Ok(())
}
