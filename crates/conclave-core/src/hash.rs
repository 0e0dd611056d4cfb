//! Content-derived 256-bit identities.
//!
//! Every network-addressable object is identified by the double SHA-256 of
//! its canonical binary encoding. The digest is kept in natural byte order;
//! references to transactions carry the byte-reversed form, which is also
//! the order block explorers display.

use std::fmt;
use std::str::FromStr;

use bitcoin::hashes::{sha256d, Hash as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::Encode;
use crate::error::DecodeError;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const LEN: usize = 32;

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// SHA-256 applied twice over `bytes`.
    pub fn digest(bytes: &[u8]) -> Self {
        Self(sha256d::Hash::hash(bytes).to_byte_array())
    }

    /// Same 32 bytes in reverse order.
    pub fn reversed(&self) -> Self {
        let mut bytes = self.0;
        bytes.reverse();
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl FromStr for Hash256 {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| DecodeError::Hex(format!("{e}: {s}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Objects addressed on the network by the digest of their own encoding.
pub trait HashIdentity: Encode {
    fn hash256(&self) -> Hash256 {
        Hash256::digest(&self.encode())
    }
}
