// Boost checkout creation

use chrono::{DateTime, Utc};
use tracing::info;

use crate::auth::Caller;
use crate::db::repositories::CheckoutDetails;
use crate::domain::boost::BoostLevel;
use crate::error::{ViaoError, ViaoResult};
use crate::handlers::AppState;
use crate::models::{CreateCheckoutRequest, CreateCheckoutResponse};
use crate::payments::NewCheckoutSession;
use crate::services::session_hash::hash_session_id;

/// Placeholder the provider substitutes with the real session id on redirect
const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Starts a boost purchase for one of the caller's events.
///
/// Opens a hosted checkout session whose metadata names the event, the organizer
/// and the tier, and records it in the ledger as CREATED.
pub async fn create_checkout(
    state: &AppState,
    caller: Option<&Caller>,
    request: &CreateCheckoutRequest,
    origin: &str,
    now: DateTime<Utc>,
) -> ViaoResult<CreateCheckoutResponse> {
    let caller = caller.ok_or(ViaoError::Unauthorized)?;
    if !caller.is_organizer() {
        return Err(ViaoError::Forbidden(
            "Only organizers can boost events".to_string(),
        ));
    }
    if !state.config.boosting_enabled {
        return Err(ViaoError::Unavailable("Boosting is disabled".to_string()));
    }
    let gateway = state
        .gateway
        .as_ref()
        .ok_or_else(|| ViaoError::Unavailable("Payments are not configured".to_string()))?;
    let secret = state.config.session_hash_secret.as_deref().ok_or_else(|| {
        ViaoError::Unavailable("Checkout hashing secret is not configured".to_string())
    })?;

    let event = state
        .repositories
        .events
        .get_by_id(&request.event_id)
        .await?
        .ok_or_else(|| ViaoError::NotFound(format!("Event {} not found", request.event_id)))?;
    if event.organizer_id != caller.user_id {
        return Err(ViaoError::Forbidden(
            "Event belongs to another organizer".to_string(),
        ));
    }
    if event.is_cancelled {
        return Err(ViaoError::InvalidRequest(
            "Cancelled events cannot be boosted".to_string(),
        ));
    }

    let amount = price_for(state, request.level);
    let currency = state.config.boost_currency.clone();
    let new_session = NewCheckoutSession {
        product_name: format!("{} boost: {}", request.level.label(), event.title),
        amount,
        currency: currency.clone(),
        success_url: format!(
            "{}/api/stripe/success?session_id={}",
            origin, SESSION_ID_PLACEHOLDER
        ),
        cancel_url: format!("{}/events?payment=cancelled&eventId={}", origin, event.id),
        metadata: vec![
            ("eventId".to_string(), event.id.clone()),
            ("organizerId".to_string(), caller.user_id.clone()),
            ("level".to_string(), request.level.as_i16().to_string()),
        ],
    };

    let session = gateway.create_session(&new_session).await?;

    state
        .repositories
        .checkouts
        .record_created(
            &hash_session_id(secret, &session.id),
            &CheckoutDetails {
                level: request.level.as_i16(),
                amount,
                currency,
                event_id: event.id.clone(),
                organizer_id: caller.user_id.clone(),
            },
            now,
        )
        .await?;

    info!(
        "Checkout created: event={} level={} amount={}",
        event.id,
        request.level.as_i16(),
        amount
    );

    Ok(CreateCheckoutResponse {
        session_id: session.id,
        url: session.url,
    })
}

fn price_for(state: &AppState, level: BoostLevel) -> i64 {
    match level {
        BoostLevel::Basic => state.config.boost_price_basic,
        BoostLevel::Premium => state.config.boost_price_premium,
    }
}
