//! In-memory chain backend for development nodes and tests.
//!
//! Keeps every submitted transaction and answers balances by matching
//! output scripts against the address's script. Nothing is ever spent:
//! this backend does no UTXO tracking or validation beyond the structural
//! checks an entry pair needs to be indexable.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bitcoin::{Address, Script};
use tracing::{debug, info};

use crate::error::BackendError;
use crate::hash::Hash256;
use crate::types::{BitcoinTx, ConclaveRichOutput, EntryTx, Outpoint};

use super::ChainContext;

#[derive(Default)]
struct Ledger {
    bitcoin_txs: HashMap<Hash256, BitcoinTx>,
    conclave_outputs: BTreeMap<Outpoint, ConclaveRichOutput>,
}

pub struct MemoryChain {
    testnet: bool,
    ledger: RwLock<Ledger>,
}

impl MemoryChain {
    pub fn new(testnet: bool) -> Self {
        Self {
            testnet,
            ledger: RwLock::new(Ledger::default()),
        }
    }

    pub fn bitcoin_tx_count(&self) -> usize {
        self.read().map(|ledger| ledger.bitcoin_txs.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, BackendError> {
        self.ledger.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, BackendError> {
        self.ledger.write().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> BackendError {
    BackendError::Unavailable("ledger lock poisoned".into())
}

fn sum_matching<'a>(script: &Script, values: impl Iterator<Item = (&'a Script, u64)>) -> u64 {
    values
        .filter(|(candidate, _)| *candidate == script)
        .fold(0u64, |acc, (_, value)| acc.saturating_add(value))
}

impl ChainContext for MemoryChain {
    fn is_testnet(&self) -> bool {
        self.testnet
    }

    fn bitcoin_balance(&self, address: &Address) -> Result<u64, BackendError> {
        let script = address.script_pubkey();
        let ledger = self.read()?;
        let outputs = ledger
            .bitcoin_txs
            .values()
            .flat_map(|tx| &tx.outputs)
            .map(|output| (output.script_pubkey.as_script(), output.value));
        Ok(sum_matching(&script, outputs))
    }

    fn conclave_balance(&self, address: &Address) -> Result<u64, BackendError> {
        let script = address.script_pubkey();
        let ledger = self.read()?;
        let outputs = ledger.conclave_outputs.values().map(|rich| {
            (
                rich.conclave_output.script_pubkey.as_script(),
                rich.conclave_output.value,
            )
        });
        Ok(sum_matching(&script, outputs))
    }

    fn conclave_output(
        &self,
        outpoint: &Outpoint,
    ) -> Result<Option<ConclaveRichOutput>, BackendError> {
        Ok(self.read()?.conclave_outputs.get(outpoint).cloned())
    }

    fn submit_bitcoin_tx(&self, tx: &BitcoinTx) -> Result<Hash256, BackendError> {
        if tx.outputs.is_empty() {
            return Err(BackendError::Rejected("transaction has no outputs".into()));
        }
        let total = tx
            .total_output_value()
            .ok_or_else(|| BackendError::Rejected("output values overflow".into()))?;
        let txid = tx.txid();
        let fresh = self.write()?.bitcoin_txs.insert(txid, tx.clone()).is_none();
        if fresh {
            info!(%txid, outputs = tx.outputs.len(), total, "accepted bitcoin transaction");
        } else {
            debug!(%txid, "bitcoin transaction already known");
        }
        Ok(txid)
    }

    fn submit_entry_tx(&self, entry: &EntryTx) -> Result<(), BackendError> {
        let claim = &entry.claim_tx;
        let trustees = claim.trustees.len();
        if claim.min_sigs == 0 || usize::try_from(claim.min_sigs).map_or(true, |m| m > trustees) {
            return Err(BackendError::Rejected(format!(
                "claim needs {} signatures from {trustees} trustees",
                claim.min_sigs
            )));
        }

        let fund_txid = entry.fund_tx.txid();
        if let Some(funding) = claim.funding_outpoint {
            if entry.fund_tx.outpoint(funding.index) != Some(funding) {
                return Err(BackendError::Rejected(format!(
                    "claim funding outpoint {funding} is not an output of {fund_txid}"
                )));
            }
        }

        let rich_outputs = claim.rich_outputs();
        let mut ledger = self.write()?;
        ledger.bitcoin_txs.insert(fund_txid, entry.fund_tx.clone());
        for rich in rich_outputs {
            ledger.conclave_outputs.insert(rich.outpoint, rich);
        }
        info!(
            %fund_txid,
            claim_txid = %claim.txid(),
            outputs = claim.outputs.len(),
            "accepted entry transaction"
        );
        Ok(())
    }
}
