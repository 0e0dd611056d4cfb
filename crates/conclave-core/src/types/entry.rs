use serde::{Deserialize, Serialize};

use crate::codec::{write_reference, Decode, Encode, JsonDocument, Reader};
use crate::error::DecodeError;
use crate::hash::{Hash256, HashIdentity};

use super::{BitcoinTx, ConclaveClaimTx, ConclaveOutput};

/// A two-phase entry into the overlay: the Bitcoin transaction that funds it
/// and the overlay claim it authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTx {
    pub fund_tx: BitcoinTx,
    pub claim_tx: ConclaveClaimTx,
}

impl EntryTx {
    pub fn txid(&self) -> Hash256 {
        self.hash256().reversed()
    }
}

impl Encode for EntryTx {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.fund_tx.encode_to(out);
        self.claim_tx.encode_to(out);
    }
}

impl Decode for EntryTx {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            fund_tx: BitcoinTx::decode_from(reader)?,
            claim_tx: ConclaveClaimTx::decode_from(reader)?,
        })
    }
}

impl JsonDocument for EntryTx {}
impl HashIdentity for EntryTx {}

/// Overlay outputs minted against a known Bitcoin transaction.
///
/// Not interchangeable with [`ConclaveEntryTx`](super::ConclaveEntryTx):
/// this shape names the funding transaction by id only and carries no
/// trustee set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTxOutputs {
    pub outputs: Vec<ConclaveOutput>,
    pub bitcoin_txid: Hash256,
}

impl EntryTxOutputs {
    pub fn txid(&self) -> Hash256 {
        self.hash256().reversed()
    }
}

impl Encode for EntryTxOutputs {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.outputs.encode_to(out);
        write_reference(out, &self.bitcoin_txid);
    }
}

impl Decode for EntryTxOutputs {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            outputs: Vec::decode_from(reader)?,
            bitcoin_txid: reader.read_reference()?,
        })
    }
}

impl JsonDocument for EntryTxOutputs {}
impl HashIdentity for EntryTxOutputs {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use crate::types::Outpoint;

    #[test]
    fn entry_tx_is_fund_then_claim() {
        let entry = sample_entry_tx();
        let mut expected = entry.fund_tx.encode();
        expected.extend(entry.claim_tx.encode());
        assert_eq!(entry.encode(), expected);

        let (decoded, end) = EntryTx::decode_at(&expected, 0).expect("entry must decode");
        assert_eq!(decoded, entry);
        assert_eq!(end, expected.len());
    }

    #[test]
    fn entry_tx_round_trips_through_json() {
        let entry = sample_entry_tx();
        let json = entry.to_json();
        assert!(json.get("fundTx").is_some());
        assert!(json.get("claimTx").is_some());
        assert_eq!(EntryTx::from_json(&json), Ok(entry));
    }

    #[test]
    fn entry_tx_decodes_from_shared_buffer() {
        let entry = sample_entry_tx();
        let mut buf = vec![0xaa, 0xbb];
        let start = buf.len();
        entry.encode_to(&mut buf);
        let trailer = Outpoint::new(hash_from_byte(5), 3);
        trailer.encode_to(&mut buf);

        let (decoded, next) = EntryTx::decode_at(&buf, start).expect("entry");
        let (outpoint, end) = Outpoint::decode_at(&buf, next).expect("trailer");
        assert_eq!(decoded, entry);
        assert_eq!(outpoint, trailer);
        assert_eq!(end, buf.len());
    }

    #[test]
    fn changing_claim_changes_entry_hash() {
        let entry = sample_entry_tx();
        let mut other = entry.clone();
        other.claim_tx.min_sigs += 1;
        assert_ne!(entry, other);
        assert_ne!(entry.hash256(), other.hash256());
    }

    #[test]
    fn entry_outputs_reference_is_reversed() {
        let outputs = EntryTxOutputs {
            outputs: vec![conclave_output(1, None)],
            bitcoin_txid: hash_from_byte(0xee),
        };
        let bytes = outputs.encode();
        assert_eq!(bytes[bytes.len() - 1], 0xee);
        assert_eq!(EntryTxOutputs::decode(&bytes), Ok(outputs.clone()));
        assert_eq!(
            outputs.to_json().get("bitcoinTxid"),
            Some(&serde_json::json!(hash_from_byte(0xee).to_string()))
        );
        assert_eq!(EntryTxOutputs::from_json(&outputs.to_json()), Ok(outputs));
    }
}
