use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use conclave_core::dispatch::{QueuedResponse, Reply, ReplyStatus};
use conclave_core::rpc;

use super::error::AppError;
use super::SharedState;

// ==============================================================================
// Handler
// ==============================================================================

/// Run one RPC call and answer with whatever the dispatcher delivers for
/// this connection.
pub(super) async fn post_rpc(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let pending = state.connections.register();
    let connection = pending.id();

    let chain = Arc::clone(&state.chain);
    let processed = tokio::task::spawn_blocking(move || rpc::process(&body, chain.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("request handler failed: {e}")))?;

    tracing::debug!(%connection, rpc.method = ?processed.method, "queueing response");
    state.queue.push(QueuedResponse::new(connection, processed));

    let reply = pending
        .recv()
        .await
        .ok_or_else(|| AppError::Internal("dispatcher dropped the reply".to_string()))?;
    Ok(reply_response(reply))
}

fn reply_response(reply: Reply) -> Response {
    let status = match reply.status {
        ReplyStatus::Ok => StatusCode::OK,
        ReplyStatus::UserError => StatusCode::BAD_REQUEST,
        ReplyStatus::InternalError => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONNECTION, "close"),
        ],
        reply.body,
    )
        .into_response()
}
