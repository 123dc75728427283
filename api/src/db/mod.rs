// Database Module
// Connection pooling, error types and repositories for the Viao API

mod error;
mod pool;
pub mod repositories;

pub use error::DbError;
pub use pool::DbPool;
pub use repositories::Repositories;
