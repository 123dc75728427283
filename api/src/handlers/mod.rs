// Handlers Module
// HTTP endpoint handlers, shared application state and the route table

mod boosts;
mod health;
mod notifications;
mod stripe;

pub use boosts::{get_boosted_events, get_receipts, get_revenue_report};
pub use health::health_check;
pub use notifications::get_notifications;
pub use stripe::{create_checkout, stripe_success};

use axum::routing::{get, post, Router};
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::ApiConfig;
use crate::db::Repositories;
use crate::payments::CheckoutGateway;

/// Everything a request handler needs
pub struct AppContext {
    pub config: ApiConfig,
    pub repositories: Repositories,
    /// `None` when no payment provider is configured
    pub gateway: Option<Arc<dyn CheckoutGateway>>,
    pub authenticator: Arc<dyn Authenticator>,
}

// Type alias for the application state
pub type AppState = Arc<AppContext>;

/// API route table
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/stripe/success", get(stripe_success))
        .route("/api/stripe/checkout", post(create_checkout))
        .route("/api/events/boosted", get(get_boosted_events))
        .route("/api/boosts/receipts", get(get_receipts))
        .route("/api/notifications", get(get_notifications))
        .route("/api/admin/boosts/revenue", get(get_revenue_report))
        .with_state(state)
}
