// Handlers for boost listings, receipts and revenue

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use crate::error::ViaoResult;
use crate::handlers::AppState;
use crate::models::{BoostedEventsResponse, ReceiptsResponse, RevenueReport};
use crate::services::boost_query_service;

/// Handler for GET /api/events/boosted - Events with an active boost
pub async fn get_boosted_events(
    State(state): State<AppState>,
) -> ViaoResult<Json<BoostedEventsResponse>> {
    let response = boost_query_service::get_boosted_events(&state, Utc::now()).await?;
    Ok(Json(response))
}

/// Handler for GET /api/boosts/receipts - The calling organizer's receipts
pub async fn get_receipts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ViaoResult<Json<ReceiptsResponse>> {
    let caller = state.authenticator.authenticate(&headers);
    let response = boost_query_service::get_receipts(&state, caller.as_ref()).await?;
    Ok(Json(response))
}

/// Handler for GET /api/admin/boosts/revenue - Revenue totals for the admin console
pub async fn get_revenue_report(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ViaoResult<Json<RevenueReport>> {
    let caller = state.authenticator.authenticate(&headers);
    let response = boost_query_service::get_revenue_report(&state, caller.as_ref()).await?;
    Ok(Json(response))
}
