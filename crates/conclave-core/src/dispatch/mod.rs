//! Response dispatch.
//!
//! Handlers produce a [`QueuedResponse`] tagged with the connection it must
//! be written back to. Those move through a shared [`ResponseQueue`] and a
//! fixed pool of [`DispatchWorker`] threads hands each one to the transport
//! through a [`ResponseSink`].

mod queue;
mod worker;

pub use queue::{Dequeued, ResponseQueue};
pub use worker::{DispatchWorker, WorkerPool, WorkerState, WorkerStep, WorkerSummary};

use std::fmt;

use serde_json::json;

use crate::error::RpcError;
use crate::rpc::{Method, Processed, RpcResponse};

/// Opaque tag for the inbound connection a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Ok,
    UserError,
    InternalError,
}

/// A serialized response ready to be written to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: ReplyStatus,
    pub body: String,
}

/// A handler outcome waiting for a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedResponse {
    pub connection: ConnectionId,
    pub method: Option<Method>,
    pub outcome: Result<RpcResponse, RpcError>,
}

impl QueuedResponse {
    pub fn new(connection: ConnectionId, processed: Processed) -> Self {
        Self {
            connection,
            method: processed.method,
            outcome: processed.outcome,
        }
    }

    pub fn status(&self) -> ReplyStatus {
        match &self.outcome {
            Ok(_) => ReplyStatus::Ok,
            Err(err) if err.is_user_error() => ReplyStatus::UserError,
            Err(_) => ReplyStatus::InternalError,
        }
    }

    /// `{"method", "result"}` on success, `{"method", "error": {"code",
    /// "message"}}` otherwise. `method` is omitted when the request never
    /// named a known one.
    pub fn to_json(&self) -> serde_json::Value {
        let mut document = serde_json::Map::new();
        if let Some(method) = self.method {
            document.insert("method".into(), json!(method.name()));
        }
        match &self.outcome {
            Ok(response) => {
                document.insert("result".into(), response.to_json());
            }
            Err(err) => {
                document.insert(
                    "error".into(),
                    json!({ "code": err.code(), "message": err.to_string() }),
                );
            }
        }
        serde_json::Value::Object(document)
    }

    pub fn to_reply(&self) -> Reply {
        Reply {
            status: self.status(),
            body: self.to_json().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
    #[error("connection {0} closed before the reply was written")]
    Closed(ConnectionId),
}

/// Transport side of the dispatcher: writes a reply to a connection.
pub trait ResponseSink: Send + Sync {
    fn deliver(&self, connection: ConnectionId, reply: Reply) -> Result<(), DeliveryError>;
}
