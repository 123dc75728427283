// Viao API server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use http::{header, Method};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use viao_api::auth::SignedCookieAuthenticator;
use viao_api::config::ApiConfig;
use viao_api::db::DbPool;
use viao_api::handlers::{router, AppContext};
use viao_api::payments::{CheckoutGateway, StripeClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_IN_FLIGHT_REQUESTS: usize = 256;

fn load_env() {
    dotenv::dotenv().ok();
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load API configuration from environment
    let config = ApiConfig::from_env();
    tracing::info!(
        "Configuration loaded (boosting_enabled={}, payments_configured={}, hash_secret_configured={})",
        config.boosting_enabled,
        config.stripe_secret_key.is_some(),
        config.session_hash_secret.is_some()
    );

    // Establish database connection pool
    let db_pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Payment provider client, absent when no secret key is configured
    let gateway: Option<Arc<dyn CheckoutGateway>> = match StripeClient::new(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Payments disabled: {}", e);
            None
        }
    };

    let app_state = Arc::new(AppContext {
        repositories: db_pool.repositories(),
        gateway,
        authenticator: Arc::new(SignedCookieAuthenticator::new(config.auth_secret.clone())),
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .max_age(Duration::from_secs(3600));
    // Session cookies only travel to the configured web origin
    let cors = match config
        .app_url
        .as_deref()
        .and_then(|url| url.trim_end_matches('/').parse::<http::HeaderValue>().ok())
    {
        Some(origin) => cors
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        None => cors.allow_origin(Any),
    };

    // Set up API routes
    let app = router(app_state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Parse server address from config
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
