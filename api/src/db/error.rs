// Failures of the boost store

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not be opened at startup
    #[error("Boost store unreachable: {0}")]
    Unreachable(String),

    #[error("Boost store query failed: {0}")]
    Query(#[from] DbErr),
}
