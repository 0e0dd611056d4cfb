use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::json::decimal;
use crate::codec::{write_reference, Decode, Encode, JsonDocument, Reader};
use crate::error::DecodeError;
use crate::hash::{Hash256, HashIdentity};

/// One output of one transaction.
///
/// `tx_id` is held in display order; on the wire it is written reversed,
/// which puts the raw digest bytes first as native tooling expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    pub tx_id: Hash256,
    #[serde(with = "decimal")]
    pub index: u32,
}

impl Outpoint {
    pub fn new(tx_id: Hash256, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

impl Encode for Outpoint {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_reference(out, &self.tx_id);
        self.index.encode_to(out);
    }
}

impl Decode for Outpoint {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            tx_id: reader.read_reference()?,
            index: reader.read_u32()?,
        })
    }
}

impl JsonDocument for Outpoint {}
impl HashIdentity for Outpoint {}
