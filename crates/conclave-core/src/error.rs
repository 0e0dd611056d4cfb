/// Failure to rebuild a value from its binary or JSON form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset}, {remaining} left")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("non-canonical CompactSize encoding of {0}")]
    NonCanonicalCompactSize(u64),

    #[error("length {announced} announced for {field}, decoded {consumed} bytes")]
    LengthMismatch {
        field: &'static str,
        announced: usize,
        consumed: usize,
    },

    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    #[error("cursor position {position} is past the end of a {len}-byte buffer")]
    InvalidPosition { position: usize, len: usize },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("invalid JSON document: {0}")]
    Json(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Failure reported by a chain backend while serving a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("rejected by backend: {0}")]
    Rejected(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a failed RPC request, either from the caller's input or from
/// the backend that served it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("address {address} belongs to the {address_network} network but this node serves the {node_network} network")]
    NetworkMismatch {
        address: String,
        address_network: &'static str,
        node_network: &'static str,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RpcError {
    /// `true` for errors caused by the request itself rather than the node.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }

    /// Stable machine-readable code used in error documents.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownMethod(_) => "unknown_method",
            Self::NetworkMismatch { .. } => "network_mismatch",
            Self::Backend(BackendError::Rejected(_)) => "rejected",
            Self::Backend(BackendError::Unavailable(_)) => "backend_unavailable",
        }
    }
}

impl From<DecodeError> for RpcError {
    fn from(err: DecodeError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
