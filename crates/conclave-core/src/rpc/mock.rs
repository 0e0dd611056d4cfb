use std::sync::atomic::{AtomicUsize, Ordering};

use bitcoin::Address;

use crate::error::BackendError;
use crate::hash::Hash256;
use crate::types::{BitcoinTx, ConclaveRichOutput, EntryTx, Outpoint};

use super::ChainContext;

/// A chain backend for testing that answers with canned values and counts
/// how many backend calls reached it.
pub struct RecordingChain {
    testnet: bool,
    balance: u64,
    fail: bool,
    calls: AtomicUsize,
}

impl RecordingChain {
    pub fn new(testnet: bool) -> Self {
        Self {
            testnet,
            balance: 0,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = balance;
        self
    }

    /// Make every backend call fail as unavailable.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn backend_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BackendError::Unavailable("recording chain set to fail".into()));
        }
        Ok(())
    }
}

impl ChainContext for RecordingChain {
    fn is_testnet(&self) -> bool {
        self.testnet
    }

    fn bitcoin_balance(&self, _address: &Address) -> Result<u64, BackendError> {
        self.record()?;
        Ok(self.balance)
    }

    fn conclave_balance(&self, _address: &Address) -> Result<u64, BackendError> {
        self.record()?;
        Ok(self.balance)
    }

    fn conclave_output(
        &self,
        _outpoint: &Outpoint,
    ) -> Result<Option<ConclaveRichOutput>, BackendError> {
        self.record()?;
        Ok(None)
    }

    fn submit_bitcoin_tx(&self, tx: &BitcoinTx) -> Result<Hash256, BackendError> {
        self.record()?;
        Ok(tx.txid())
    }

    fn submit_entry_tx(&self, _entry: &EntryTx) -> Result<(), BackendError> {
        self.record()
    }
}
