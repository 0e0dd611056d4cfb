use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

// ==============================================================================
// Error Type
// ==============================================================================

/// Transport-level failures. RPC outcomes, including RPC errors, travel as
/// dispatcher replies and never pass through here.
pub(crate) enum AppError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
