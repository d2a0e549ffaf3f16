//! Codec Adapter
//!
//! Three decode conventions coexist on the node's query surface:
//!     length-prefixed binary — collections and transactions
//!     bare binary            — single objects (accounts)
//!     JSON                   — governance queries
//!
//! `BinaryCodec` encodes values with bincode (fixed-width integers, no
//! trailing bytes allowed). The length-prefixed form puts the payload's byte
//! length in front as an unsigned LEB128 varint.

use crate::error::CodecError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode/decode contract consumed by the accessors, submitter and monitor
pub trait Codec: Send + Sync {
    fn encode_bare<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode_bare<T: DeserializeOwned>(&self, bz: &[u8]) -> Result<T, CodecError>;

    fn encode_length_prefixed<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode_length_prefixed<T: DeserializeOwned>(&self, bz: &[u8]) -> Result<T, CodecError>;

    fn encode_json<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode_json<T: DeserializeOwned>(&self, bz: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bz)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl Codec for BinaryCodec {
    fn encode_bare<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(options().serialize(value)?)
    }

    fn decode_bare<T: DeserializeOwned>(&self, bz: &[u8]) -> Result<T, CodecError> {
        if bz.is_empty() {
            return Err(CodecError::Empty);
        }
        Ok(options().deserialize(bz)?)
    }

    fn encode_length_prefixed<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let payload = self.encode_bare(value)?;
        let mut out = Vec::with_capacity(payload.len() + 10);
        put_uvarint(&mut out, payload.len() as u64);
        out.extend_from_slice(&payload);
        Ok(out)
    }

    fn decode_length_prefixed<T: DeserializeOwned>(&self, bz: &[u8]) -> Result<T, CodecError> {
        if bz.is_empty() {
            return Err(CodecError::Empty);
        }
        let (declared, n) = read_uvarint(bz)?;
        let payload = &bz[n..];
        if declared != payload.len() as u64 {
            return Err(CodecError::Length {
                declared,
                available: payload.len(),
            });
        }
        self.decode_bare(payload)
    }
}

fn put_uvarint(buf: &mut Vec<u8>, mut v: u64) {
    while v >= 0x80 {
        buf.push((v as u8) | 0x80);
        v >>= 7;
    }
    buf.push(v as u8);
}

/// Returns the value and the number of bytes consumed
fn read_uvarint(bz: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut x: u64 = 0;
    let mut shift = 0u32;
    for (i, &b) in bz.iter().enumerate() {
        if i == 10 {
            return Err(CodecError::Varint);
        }
        if b < 0x80 {
            // 10th byte may only carry the top bit of a u64
            if i == 9 && b > 1 {
                return Err(CodecError::Varint);
            }
            return Ok((x | (u64::from(b) << shift), i + 1));
        }
        x |= u64::from(b & 0x7f) << shift;
        shift += 7;
    }
    Err(CodecError::Varint)
}
