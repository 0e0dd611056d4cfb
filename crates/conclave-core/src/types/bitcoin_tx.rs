//! Native-chain transactions in Bitcoin's legacy (non-witness) layout.

use bitcoin::ScriptBuf;
use serde::{Deserialize, Serialize};

use crate::codec::json::{decimal, script_hex};
use crate::codec::{Decode, Encode, JsonDocument, Reader};
use crate::error::DecodeError;
use crate::hash::{Hash256, HashIdentity};

use super::Outpoint;

// ==============================================================================
// Input
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinInput {
    pub outpoint: Outpoint,
    #[serde(with = "script_hex")]
    pub script_sig: ScriptBuf,
    #[serde(with = "decimal")]
    pub sequence: u32,
}

impl Encode for BitcoinInput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.outpoint.encode_to(out);
        self.script_sig.encode_to(out);
        self.sequence.encode_to(out);
    }
}

impl Decode for BitcoinInput {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            outpoint: Outpoint::decode_from(reader)?,
            script_sig: ScriptBuf::decode_from(reader)?,
            sequence: reader.read_u32()?,
        })
    }
}

impl JsonDocument for BitcoinInput {}

// ==============================================================================
// Output
// ==============================================================================

/// `value` is in satoshis and may span the full `u64` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinOutput {
    #[serde(with = "decimal")]
    pub value: u64,
    #[serde(rename = "scriptPubKey", with = "script_hex")]
    pub script_pubkey: ScriptBuf,
}

impl Encode for BitcoinOutput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.value.encode_to(out);
        self.script_pubkey.encode_to(out);
    }
}

impl Decode for BitcoinOutput {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            value: reader.read_u64()?,
            script_pubkey: ScriptBuf::decode_from(reader)?,
        })
    }
}

impl JsonDocument for BitcoinOutput {}

// ==============================================================================
// Transaction
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinTx {
    #[serde(with = "decimal")]
    pub version: u32,
    pub inputs: Vec<BitcoinInput>,
    pub outputs: Vec<BitcoinOutput>,
    #[serde(with = "decimal")]
    pub lock_time: u32,
}

impl BitcoinTx {
    /// Display-order id, as referenced by an [`Outpoint`].
    pub fn txid(&self) -> Hash256 {
        self.hash256().reversed()
    }

    /// Locator of the output at `index`, if the transaction has one.
    pub fn outpoint(&self, index: u32) -> Option<Outpoint> {
        let i = usize::try_from(index).ok()?;
        (i < self.outputs.len()).then(|| Outpoint::new(self.txid(), index))
    }

    /// Sum of output values, `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, output| acc.checked_add(output.value))
    }
}

impl Encode for BitcoinTx {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.version.encode_to(out);
        self.inputs.encode_to(out);
        self.outputs.encode_to(out);
        self.lock_time.encode_to(out);
    }
}

impl Decode for BitcoinTx {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            version: reader.read_u32()?,
            inputs: Vec::decode_from(reader)?,
            outputs: Vec::decode_from(reader)?,
            lock_time: reader.read_u32()?,
        })
    }
}

impl JsonDocument for BitcoinTx {}
impl HashIdentity for BitcoinTx {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn output_layout_is_le_value_then_script() {
        let script = p2wpkh_script(7);
        let max = BitcoinOutput {
            value: u64::MAX,
            script_pubkey: script.clone(),
        };
        let one = BitcoinOutput {
            value: 1,
            script_pubkey: script.clone(),
        };

        let max_bytes = max.encode();
        let one_bytes = one.encode();
        assert_eq!(&max_bytes[..8], &[0xff; 8]);
        assert_eq!(&one_bytes[..8], &[0x01, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&max_bytes[8..], &script.encode()[..]);
        assert_eq!(max_bytes[8..], one_bytes[8..]);
    }

    #[test]
    fn output_value_renders_as_decimal_string() {
        let output = BitcoinOutput {
            value: u64::MAX,
            script_pubkey: ScriptBuf::from_bytes(vec![0x51]),
        };
        assert_eq!(
            output.to_json(),
            serde_json::json!({ "value": "18446744073709551615", "scriptPubKey": "51" })
        );
    }

    #[test]
    fn input_equality_is_field_wise() {
        let a = bitcoin_input(hash_from_byte(1), 0);
        assert_eq!(a, bitcoin_input(hash_from_byte(1), 0));

        let mut b = a.clone();
        b.sequence = 0;
        assert_ne!(a, b);

        let mut c = a.clone();
        c.script_sig = ScriptBuf::from_bytes(vec![0x00]);
        assert_ne!(a, c);

        assert_ne!(a, bitcoin_input(hash_from_byte(1), 1));
    }

    #[test]
    fn tx_round_trips_through_both_encodings() {
        let tx = sample_bitcoin_tx();
        assert_eq!(BitcoinTx::decode(&tx.encode()), Ok(tx.clone()));
        assert_eq!(BitcoinTx::from_json(&tx.to_json()), Ok(tx));
    }

    #[test]
    fn tx_json_keys_and_order_are_fixed() {
        let tx = sample_bitcoin_tx();
        let text = tx.to_json().to_string();
        let version = text.find("\"version\"").expect("version key");
        let inputs = text.find("\"inputs\"").expect("inputs key");
        let outputs = text.find("\"outputs\"").expect("outputs key");
        let lock_time = text.find("\"lockTime\"").expect("lockTime key");
        assert!(version < inputs && inputs < outputs && outputs < lock_time);
        assert!(text.contains("\"scriptSig\""));

        let value = text.find("\"value\"").expect("value key");
        let script = text.find("\"scriptPubKey\"").expect("scriptPubKey key");
        assert!(value < script);
        assert_eq!(text, serde_json::to_string(&tx).expect("serialize"));
    }

    #[test]
    fn reordering_outputs_changes_identity() {
        let tx = sample_bitcoin_tx();
        let mut swapped = tx.clone();
        swapped.outputs.reverse();
        assert_ne!(tx, swapped);
        assert_ne!(tx.hash256(), swapped.hash256());
        assert_eq!(tx.hash256(), sample_bitcoin_tx().hash256());
    }

    #[test]
    fn outpoint_helper_checks_bounds() {
        let tx = sample_bitcoin_tx();
        assert_eq!(tx.outpoint(1), Some(Outpoint::new(tx.txid(), 1)));
        assert_eq!(tx.outpoint(2), None);
        assert_eq!(tx.total_output_value(), Some(80_000));
    }

    #[test]
    fn truncated_tx_fails() {
        let bytes = sample_bitcoin_tx().encode();
        for cut in [0, 3, 5, bytes.len() - 1] {
            assert!(
                BitcoinTx::decode(&bytes[..cut]).is_err(),
                "prefix of {cut} bytes must not decode"
            );
        }
    }
}
