//! Overlay-chain outputs and the trustee-governed transactions that create them.

use bitcoin::{PublicKey, ScriptBuf};
use serde::{Deserialize, Serialize};

use crate::codec::json::{decimal, pubkey_hex_seq, script_hex};
use crate::codec::{Decode, Encode, JsonDocument, Reader};
use crate::error::DecodeError;
use crate::hash::{Hash256, HashIdentity};

use super::Outpoint;

// ==============================================================================
// Outputs
// ==============================================================================

/// An overlay output. `predecessor` is the outpoint that funded it and is
/// absent for root outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConclaveOutput {
    #[serde(rename = "scriptPubKey", with = "script_hex")]
    pub script_pubkey: ScriptBuf,
    #[serde(with = "decimal")]
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<Outpoint>,
}

impl Encode for ConclaveOutput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.script_pubkey.encode_to(out);
        self.value.encode_to(out);
        self.predecessor.encode_to(out);
    }
}

impl Decode for ConclaveOutput {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            script_pubkey: ScriptBuf::decode_from(reader)?,
            value: reader.read_u64()?,
            predecessor: Option::decode_from(reader)?,
        })
    }
}

impl JsonDocument for ConclaveOutput {}

/// A [`ConclaveOutput`] together with its own locator, for addressing an
/// output without its parent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclaveRichOutput {
    pub outpoint: Outpoint,
    pub conclave_output: ConclaveOutput,
}

impl Encode for ConclaveRichOutput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.outpoint.encode_to(out);
        self.conclave_output.encode_to(out);
    }
}

impl Decode for ConclaveRichOutput {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            outpoint: Outpoint::decode_from(reader)?,
            conclave_output: ConclaveOutput::decode_from(reader)?,
        })
    }
}

impl JsonDocument for ConclaveRichOutput {}
impl HashIdentity for ConclaveRichOutput {}

// ==============================================================================
// Trustee Transactions
// ==============================================================================

// Entry and claim transactions share one layout:
//
//   outputs || trustees || min_sigs (u32 LE) || funding_outpoint (optional)
//
// `min_sigs <= trustees.len()` is a backend rule and is not checked here.
macro_rules! trustee_tx {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub outputs: Vec<ConclaveOutput>,
            #[serde(with = "pubkey_hex_seq")]
            pub trustees: Vec<PublicKey>,
            #[serde(with = "decimal")]
            pub min_sigs: u32,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub funding_outpoint: Option<Outpoint>,
        }

        impl $name {
            /// Display-order id, as referenced by an [`Outpoint`].
            pub fn txid(&self) -> Hash256 {
                self.hash256().reversed()
            }

            /// Each output paired with its locator inside this transaction.
            pub fn rich_outputs(&self) -> Vec<ConclaveRichOutput> {
                let txid = self.txid();
                (0u32..)
                    .zip(&self.outputs)
                    .map(|(index, output)| ConclaveRichOutput {
                        outpoint: Outpoint::new(txid, index),
                        conclave_output: output.clone(),
                    })
                    .collect()
            }
        }

        impl Encode for $name {
            fn encode_to(&self, out: &mut Vec<u8>) {
                self.outputs.encode_to(out);
                self.trustees.encode_to(out);
                self.min_sigs.encode_to(out);
                self.funding_outpoint.encode_to(out);
            }
        }

        impl Decode for $name {
            fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
                Ok(Self {
                    outputs: Vec::decode_from(reader)?,
                    trustees: Vec::decode_from(reader)?,
                    min_sigs: reader.read_u32()?,
                    funding_outpoint: Option::decode_from(reader)?,
                })
            }
        }

        impl JsonDocument for $name {}
        impl HashIdentity for $name {}
    };
}

trustee_tx!(
    /// Overlay transaction that admits value under a set of trustees.
    ConclaveEntryTx
);

trustee_tx!(
    /// Claim half of an entry pair; authorized by the funding Bitcoin
    /// transaction it is coupled with in an [`EntryTx`](super::EntryTx).
    ConclaveClaimTx
);
