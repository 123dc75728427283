use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::payments::GatewayError;

#[derive(Error, Debug)]
pub enum ViaoError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type ViaoResult<T> = Result<T, ViaoError>;

impl IntoResponse for ViaoError {
    fn into_response(self) -> Response {
        let status = match &self {
            ViaoError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ViaoError::NotFound(_) => StatusCode::NOT_FOUND,
            ViaoError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ViaoError::Unauthorized => StatusCode::UNAUTHORIZED,
            ViaoError::Forbidden(_) => StatusCode::FORBIDDEN,
            ViaoError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ViaoError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let err_msg = match self {
            // Storage and internal details stay in the logs
            ViaoError::DatabaseError(msg) | ViaoError::InternalError(msg) => {
                tracing::error!("Request failed: {}", msg);
                "Internal server error".to_string()
            }
            ViaoError::NotFound(msg)
            | ViaoError::InvalidRequest(msg)
            | ViaoError::Forbidden(msg)
            | ViaoError::Unavailable(msg) => msg,
            ViaoError::Unauthorized => "Unauthorized".to_string(),
        };

        let body = Json(json!({
            "error": err_msg
        }));

        (status, body).into_response()
    }
}

// DbError to ViaoError conversion implementation
impl From<DbError> for ViaoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Unreachable(msg) => ViaoError::DatabaseError(msg),
            DbError::Query(err) => ViaoError::DatabaseError(err.to_string()),
        }
    }
}

impl From<GatewayError> for ViaoError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured => {
                ViaoError::Unavailable("Payments are not configured".to_string())
            }
            other => ViaoError::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ViaoError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ViaoError::Forbidden("not yours".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ViaoError::NotFound("event".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ViaoError::from(GatewayError::NotConfigured).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_db_error_maps_to_database_error() {
        let err = ViaoError::from(DbError::Unreachable("connection refused".into()));
        assert!(matches!(err, ViaoError::DatabaseError(msg) if msg == "connection refused"));

        let err = ViaoError::from(DbError::from(sea_orm::DbErr::Custom("boom".into())));
        assert!(matches!(err, ViaoError::DatabaseError(msg) if msg.contains("boom")));
    }
}
