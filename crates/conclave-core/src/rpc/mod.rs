//! RPC message model.
//!
//! Each remote method has one [`RpcRequest`] variant and one [`RpcResponse`]
//! variant, tied together by [`Method`]. Requests are validated when they are
//! built from JSON and run against a [`ChainContext`], the seam behind which
//! the chain backends live. [`memory::MemoryChain`] is an in-process backend;
//! `mock::RecordingChain` is a test double.

mod context;
pub mod memory;
#[cfg(test)]
pub mod mock;
mod request;
mod response;
pub mod types;

pub use context::ChainContext;
pub use request::RpcRequest;
pub use response::RpcResponse;
pub use types::Method;

use tracing::{debug, warn};

use crate::error::RpcError;

/// Outcome of one request body: the method, when the body named a known
/// one, and the handler result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub method: Option<Method>,
    pub outcome: Result<RpcResponse, RpcError>,
}

/// Parse a raw request body and run it against `ctx`.
///
/// Never fails: malformed input becomes a user-input error outcome so that
/// the caller always has something to answer the connection with.
pub fn process(body: &[u8], ctx: &dyn ChainContext) -> Processed {
    let document: serde_json::Value = match serde_json::from_slice(body) {
        Ok(document) => document,
        Err(e) => {
            warn!(body_len = body.len(), error = %e, "malformed JSON request");
            return Processed {
                method: None,
                outcome: Err(RpcError::InvalidRequest(format!("malformed JSON: {e}"))),
            };
        }
    };

    let method = request::method_of(&document).ok();
    let outcome = RpcRequest::from_json(&document).and_then(|request| {
        debug!(rpc.method = %request.method(), "handling request");
        request.handle(ctx)
    });

    match &outcome {
        Ok(_) => debug!(rpc.method = ?method, "request handled"),
        Err(err) if err.is_user_error() => {
            debug!(rpc.method = ?method, error = %err, "request rejected")
        }
        Err(err) => warn!(rpc.method = ?method, error = %err, "backend failure"),
    }

    Processed { method, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock::RecordingChain;

    #[test]
    fn malformed_body_is_user_error_without_method() {
        let processed = process(b"{not json", &RecordingChain::new(false));
        assert_eq!(processed.method, None);
        assert!(matches!(processed.outcome, Err(RpcError::InvalidRequest(_))));
    }

    #[test]
    fn known_method_is_kept_when_params_are_bad() {
        let chain = RecordingChain::new(false);
        let processed = process(
            br#"{"method":"getconclaveoutput","params":{}}"#,
            &chain,
        );
        assert_eq!(processed.method, Some(Method::GetConclaveOutput));
        assert!(processed.outcome.is_err());
        assert_eq!(chain.backend_calls(), 0);
    }

    #[test]
    fn valid_body_runs_handler() {
        let processed = process(br#"{"method":"getnodeinfo"}"#, &RecordingChain::new(true));
        assert_eq!(processed.method, Some(Method::GetNodeInfo));
        assert_eq!(processed.outcome, Ok(RpcResponse::NodeInfo { testnet: true }));
    }
}
