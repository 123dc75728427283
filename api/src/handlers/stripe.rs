// Payment endpoints: checkout creation and the post-payment return target

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    Json,
};
use chrono::Utc;
use tracing::warn;

use crate::error::ViaoResult;
use crate::handlers::AppState;
use crate::models::{CreateCheckoutRequest, CreateCheckoutResponse, StripeSuccessQuery};
use crate::services::boost_service;
use crate::services::checkout_service;
use crate::services::redirect::{resolve_public_origin, Location};

fn public_origin(state: &AppState, headers: &HeaderMap) -> String {
    resolve_public_origin(
        state.config.app_url.as_deref(),
        headers,
        &format!("http://{}", state.config.server_addr()),
    )
}

/// Handler for GET /api/stripe/success - Browser return target after payment.
/// Always answers with a redirect; failures carry a `reason` code.
pub async fn stripe_success(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<StripeSuccessQuery>,
) -> Redirect {
    let caller = state.authenticator.authenticate(&headers);
    let origin = public_origin(&state, &headers);

    let location = match boost_service::reconcile(
        &state,
        caller.as_ref(),
        params.session_id.as_deref(),
        Utc::now(),
    )
    .await
    {
        Ok(_) => Location::success(),
        Err(failure) => {
            warn!("Boost reconciliation refused: reason={}", failure.reason.code());
            Location::failure(
                failure.reason,
                failure.session_id.as_deref(),
                failure.event_id.as_deref(),
            )
        }
    };

    Redirect::to(&location.to_absolute(&origin))
}

/// Handler for POST /api/stripe/checkout - Opens a boost checkout for an event
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCheckoutRequest>,
) -> ViaoResult<Json<CreateCheckoutResponse>> {
    let caller = state.authenticator.authenticate(&headers);
    let origin = public_origin(&state, &headers);
    let response =
        checkout_service::create_checkout(&state, caller.as_ref(), &request, &origin, Utc::now())
            .await?;
    Ok(Json(response))
}
