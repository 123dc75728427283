use std::error::Error;
use std::process::Command;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Execute the create command
pub async fn execute(name: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    let db_name = name.unwrap_or_else(|| config.name.clone());

    if !is_valid_identifier(&db_name) {
        return Err(format!("Invalid database name: {}", db_name).into());
    }

    info!("Creating database: {}", db_name);
    let server_url = config.server_url();

    let output = Command::new("psql")
        .arg(&server_url)
        .arg("-t")
        .arg("-c")
        .arg(format!(
            "SELECT 1 FROM pg_database WHERE datname = '{}'",
            db_name
        ))
        .output()
        .map_err(|e| {
            error!("Failed to execute psql: {}", e);
            e
        })?;

    if String::from_utf8_lossy(&output.stdout).trim() == "1" {
        info!("Database '{}' already exists", db_name);
        return Ok(());
    }

    let output = Command::new("psql")
        .arg(&server_url)
        .arg("-c")
        .arg(format!("CREATE DATABASE \"{}\"", db_name))
        .output()?;

    if output.status.success() {
        info!("Database '{}' created successfully", db_name);
        Ok(())
    } else {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        error!("Failed to create database: {}", error_msg);
        Err(format!("Failed to create database: {}", error_msg).into())
    }
}

/// Names are interpolated into SQL, so only plain identifiers pass
fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
