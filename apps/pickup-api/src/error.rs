//! Error types for the EcoPickup API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_proxy::ChatError;
use route_proxy::RouteError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Submission not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Submission not found: {}", id),
            ),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Route(RouteError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Route planning request timed out".to_string(),
            ),
            ApiError::Route(RouteError::Remote { status, message }) => {
                tracing::error!("Mapping service failed with {}: {}", status, message);
                // Relay the upstream status the way the dashboard expects.
                (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "Failed to get map data".to_string(),
                )
            }
            ApiError::Route(e @ RouteError::Transport(_)) => {
                tracing::error!("Mapping service unreachable: {}", e);
                (StatusCode::BAD_GATEWAY, "Failed to get map data".to_string())
            }
            ApiError::Chat(e) => {
                tracing::error!("Chat model failed: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
