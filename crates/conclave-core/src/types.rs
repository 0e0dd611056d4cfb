//! Transaction value types for both chains.
//!
//! Every type here is an immutable value: equality is field-wise, and each
//! one converts losslessly to and from its binary form ([`Encode`] /
//! [`Decode`]) and its JSON document form ([`JsonDocument`]).
//!
//! [`Encode`]: crate::codec::Encode
//! [`Decode`]: crate::codec::Decode
//! [`JsonDocument`]: crate::codec::JsonDocument

mod bitcoin_tx;
mod conclave_tx;
mod entry;
mod outpoint;

pub use bitcoin_tx::{BitcoinInput, BitcoinOutput, BitcoinTx};
pub use conclave_tx::{ConclaveClaimTx, ConclaveEntryTx, ConclaveOutput, ConclaveRichOutput};
pub use entry::{EntryTx, EntryTxOutputs};
pub use outpoint::Outpoint;
