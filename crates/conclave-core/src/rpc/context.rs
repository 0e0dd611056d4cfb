use bitcoin::Address;

use crate::error::BackendError;
use crate::hash::Hash256;
use crate::types::{BitcoinTx, ConclaveRichOutput, EntryTx, Outpoint};

/// The chain backends a request is served against.
///
/// Requests only reach these methods after their parameters have been
/// validated, including the network of any address argument.
pub trait ChainContext: Send + Sync {
    /// `true` when the node serves the test network.
    fn is_testnet(&self) -> bool;

    /// Native-chain balance of `address`, in satoshis.
    fn bitcoin_balance(&self, address: &Address) -> Result<u64, BackendError>;

    /// Overlay-chain balance of `address`.
    fn conclave_balance(&self, address: &Address) -> Result<u64, BackendError>;

    /// The overlay output at `outpoint`, if the backend knows it.
    fn conclave_output(
        &self,
        outpoint: &Outpoint,
    ) -> Result<Option<ConclaveRichOutput>, BackendError>;

    /// Submit a native-chain transaction, returning its display-order id.
    fn submit_bitcoin_tx(&self, tx: &BitcoinTx) -> Result<Hash256, BackendError>;

    fn submit_entry_tx(&self, entry: &EntryTx) -> Result<(), BackendError>;
}
