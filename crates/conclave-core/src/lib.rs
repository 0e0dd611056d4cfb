pub mod codec;
pub mod dispatch;
pub mod error;
pub mod hash;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;

pub use error::{DecodeError, RpcError};
pub use hash::{Hash256, HashIdentity};
