mod connections;
mod error;
mod rpc;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use conclave_core::dispatch::{QueuedResponse, ResponseQueue};
use conclave_core::rpc::ChainContext;

pub use connections::PendingConnections;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub chain: Arc<dyn ChainContext>,
    pub queue: Arc<ResponseQueue<QueuedResponse>>,
    pub connections: Arc<PendingConnections>,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/rpc",
            post(rpc::post_rpc).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound("route not found".to_string())
}
