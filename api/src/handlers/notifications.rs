use axum::{extract::State, http::HeaderMap, Json};

use crate::error::ViaoResult;
use crate::handlers::AppState;
use crate::models::NotificationsResponse;
use crate::services::boost_query_service;

/// Handler for GET /api/notifications - The caller's notification feed
pub async fn get_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ViaoResult<Json<NotificationsResponse>> {
    let caller = state.authenticator.authenticate(&headers);
    let response = boost_query_service::get_notifications(&state, caller.as_ref()).await?;
    Ok(Json(response))
}
