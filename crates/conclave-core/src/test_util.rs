//! Shared test helpers for `conclave-core` unit tests.
//!
//! Builders for the transaction types so that tests across modules share a
//! single source of truth for dummy data construction.

use bitcoin::{PublicKey, ScriptBuf};

use crate::hash::Hash256;
use crate::types::{
    BitcoinInput, BitcoinOutput, BitcoinTx, ConclaveClaimTx, ConclaveOutput, EntryTx, Outpoint,
};

// ==============================================================================
// Hash Helpers
// ==============================================================================

/// A deterministic `Hash256` from a single distinguishing byte.
pub fn hash_from_byte(b: u8) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Hash256::from_bytes(bytes)
}

// ==============================================================================
// Script and Key Helpers
// ==============================================================================

/// A P2WPKH scriptPubKey whose 20-byte program is filled with `tag`.
pub fn p2wpkh_script(tag: u8) -> ScriptBuf {
    let mut bytes = vec![0x00, 0x14];
    bytes.extend_from_slice(&[tag; 20]);
    ScriptBuf::from_bytes(bytes)
}

/// The first `n` (at most three) compressed multiples of the secp256k1
/// generator: G, 2G, 3G.
pub fn trustee_keys(n: usize) -> Vec<PublicKey> {
    [
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",
        "02f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9",
    ]
    .iter()
    .take(n)
    .map(|key| key.parse().expect("fixture public key must parse"))
    .collect()
}

// ==============================================================================
// Transaction Builders
// ==============================================================================

pub fn bitcoin_input(funding: Hash256, index: u32) -> BitcoinInput {
    BitcoinInput {
        outpoint: Outpoint::new(funding, index),
        script_sig: ScriptBuf::from_bytes(vec![0x51]),
        sequence: 0xFFFF_FFFE,
    }
}

/// One input, two P2WPKH outputs worth 50_000 and 30_000 sats.
pub fn sample_bitcoin_tx() -> BitcoinTx {
    BitcoinTx {
        version: 2,
        inputs: vec![bitcoin_input(hash_from_byte(1), 0)],
        outputs: vec![
            BitcoinOutput {
                value: 50_000,
                script_pubkey: p2wpkh_script(0x11),
            },
            BitcoinOutput {
                value: 30_000,
                script_pubkey: p2wpkh_script(0x22),
            },
        ],
        lock_time: 0,
    }
}

pub fn conclave_output(value: u64, predecessor: Option<Outpoint>) -> ConclaveOutput {
    ConclaveOutput {
        script_pubkey: p2wpkh_script(0x33),
        value,
        predecessor,
    }
}

/// A 2-of-3 claim with two outputs.
pub fn sample_claim_tx(funding_outpoint: Option<Outpoint>) -> ConclaveClaimTx {
    ConclaveClaimTx {
        outputs: vec![
            conclave_output(20_000, funding_outpoint),
            conclave_output(10_000, None),
        ],
        trustees: trustee_keys(3),
        min_sigs: 2,
        funding_outpoint,
    }
}

/// A claim funded by output 0 of `sample_bitcoin_tx()`.
pub fn sample_entry_tx() -> EntryTx {
    let fund_tx = sample_bitcoin_tx();
    let funding = fund_tx.outpoint(0);
    EntryTx {
        claim_tx: sample_claim_tx(funding),
        fund_tx,
    }
}
