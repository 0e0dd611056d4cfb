//! Canonical binary encoding shared by every transaction type.
//!
//! Layout rules:
//!
//! ```text
//! u32 / u64          little-endian, fixed width
//! Hash256 reference  32 bytes, reversed
//! byte string        CompactSize(len) || bytes
//! Vec<T>             CompactSize(count) || T || T || ...
//! Option<T>          CompactSize(len(T)) || T      when present
//!                    0x00                          when absent
//! ```
//!
//! Structs encode their fields in declaration order with no framing of
//! their own. Decoding walks a [`Reader`] over one shared buffer, so a
//! composite type never needs to know the encoded length of its parts.

pub mod json;

use bitcoin::{PublicKey, ScriptBuf};

use crate::error::DecodeError;
use crate::hash::Hash256;

pub use json::JsonDocument;

// ==============================================================================
// Traits
// ==============================================================================

pub trait Encode {
    fn encode_to(&self, out: &mut Vec<u8>);

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }
}

pub trait Decode: Sized {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError>;

    /// Decode one value starting at `position`, returning it together with
    /// the position just past its encoding.
    fn decode_at(bytes: &[u8], position: usize) -> Result<(Self, usize), DecodeError> {
        let mut reader = Reader::at(bytes, position)?;
        let value = Self::decode_from(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Decode a buffer holding exactly one value.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode_from(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

// ==============================================================================
// Reader
// ==============================================================================

/// Forward-only cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn at(bytes: &'a [u8], position: usize) -> Result<Self, DecodeError> {
        if position > bytes.len() {
            return Err(DecodeError::InvalidPosition {
                position,
                len: bytes.len(),
            });
        }
        Ok(Self { bytes, position })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.position,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..start + len])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Bitcoin's variable-length integer; non-minimal forms are rejected.
    pub fn read_compact_size(&mut self) -> Result<u64, DecodeError> {
        let (value, minimum) = match self.read_u8()? {
            tag @ 0..=0xfc => return Ok(u64::from(tag)),
            0xfd => (u64::from(u16::from_le_bytes(self.read_array()?)), 0xfd),
            0xfe => (u64::from(self.read_u32()?), 0x1_0000),
            0xff => (self.read_u64()?, 0x1_0000_0000),
        };
        if value < minimum {
            return Err(DecodeError::NonCanonicalCompactSize(value));
        }
        Ok(value)
    }

    /// A CompactSize length that must fit in what is left of the buffer.
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        let offset = self.position;
        let len = self.read_compact_size()?;
        match usize::try_from(len) {
            Ok(len) if len <= self.remaining() => Ok(len),
            _ => Err(DecodeError::UnexpectedEnd {
                offset,
                needed: usize::try_from(len).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            }),
        }
    }

    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_length()?;
        self.read_bytes(len)
    }

    /// A transaction reference: 32 bytes stored in reverse order.
    pub fn read_reference(&mut self) -> Result<Hash256, DecodeError> {
        Ok(Hash256::from_bytes(self.read_array()?).reversed())
    }

    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

// ==============================================================================
// Writers
// ==============================================================================

pub fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

pub fn write_reference(out: &mut Vec<u8>, hash: &Hash256) {
    out.extend_from_slice(hash.reversed().as_bytes());
}

// ==============================================================================
// Primitive Impls
// ==============================================================================

impl Encode for u32 {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Decode for u32 {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        reader.read_u32()
    }
}

impl Encode for u64 {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Decode for u64 {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        reader.read_u64()
    }
}

/// A standalone content hash, in natural byte order.
impl Encode for Hash256 {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }
}

impl Decode for Hash256 {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Hash256::from_bytes(reader.read_array()?))
    }
}

impl Encode for ScriptBuf {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_var_bytes(out, self.as_bytes());
    }
}

impl Decode for ScriptBuf {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(ScriptBuf::from_bytes(reader.read_var_bytes()?.to_vec()))
    }
}

impl Encode for PublicKey {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_var_bytes(out, &self.to_bytes());
    }
}

impl Decode for PublicKey {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let bytes = reader.read_var_bytes()?;
        PublicKey::from_slice(bytes).map_err(|e| DecodeError::InvalidPublicKey(e.to_string()))
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_compact_size(out, self.len() as u64);
        for item in self {
            item.encode_to(out);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        // Every element takes at least one byte, so the count is bounded by
        // what is left of the buffer.
        let count = reader.read_length()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode_from(reader)?);
        }
        Ok(items)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            None => write_compact_size(out, 0),
            Some(value) => write_var_bytes(out, &value.encode()),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let body = reader.read_var_bytes()?;
        if body.is_empty() {
            return Ok(None);
        }
        let mut inner = Reader::new(body);
        let value = T::decode_from(&mut inner)?;
        if inner.remaining() != 0 {
            return Err(DecodeError::LengthMismatch {
                field: "optional",
                announced: body.len(),
                consumed: inner.position(),
            });
        }
        Ok(Some(value))
    }
}
