use clap::{Parser, Subcommand};
use std::error::Error;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod migration;

/// Viao Database Management CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for database management
#[derive(Subcommand)]
enum Commands {
    /// Create a new database
    Create {
        /// Database name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Run database migrations
    Migrate {
        /// Number of migrations to run (all if not specified)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Rollback {
        /// Number of migrations to roll back (one if not specified)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Reset database (drop all tables and run migrations)
    Reset,
    /// Show database status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create { name } => commands::create::execute(name).await?,
        Commands::Migrate { steps } => commands::migrate::execute(steps).await?,
        Commands::Rollback { steps } => commands::migrate::rollback(steps).await?,
        Commands::Reset => commands::migrate::reset().await?,
        Commands::Status => commands::migrate::status().await?,
    }

    Ok(())
}
