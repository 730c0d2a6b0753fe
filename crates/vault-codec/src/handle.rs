//! ciphertext handle formatting
//!
//! the relayer sdk hands back handles as byte arrays, plain number arrays or
//! strings. the contract takes `bytes32`, so every handle is normalized to a
//! `0x`-prefixed string of exactly [`HANDLE_HEX_LEN`] characters before it is
//! passed along. a width mismatch is rejected by the node, not by us.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// prefix of every hex string crossing the contract boundary
pub const HEX_PREFIX: &str = "0x";

/// byte width of a ciphertext handle
pub const HANDLE_BYTES: usize = 32;

/// canonical handle length: prefix + 64 hex digits
pub const HANDLE_HEX_LEN: usize = HEX_PREFIX.len() + HANDLE_BYTES * 2;

/// handle as produced by an encryption backend, before normalization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawHandle {
    /// byte buffer
    Bytes(Vec<u8>),
    /// number array, one element per byte
    Indexed(Vec<u64>),
    /// hex string, with or without prefix
    Text(String),
    /// anything else, stringified as is
    Numeric(u128),
}

impl From<Vec<u8>> for RawHandle {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<[u8; HANDLE_BYTES]> for RawHandle {
    fn from(bytes: [u8; HANDLE_BYTES]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for RawHandle {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawHandle {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// normalize a raw handle to the canonical 66-character hex form
///
/// shorter results are right-padded with `'0'`, longer ones cut.
pub fn format_handle(raw: &RawHandle) -> String {
    let hex = match raw {
        RawHandle::Bytes(bytes) => prefixed_hex(bytes),
        RawHandle::Indexed(elements) => {
            let digits: String = elements.iter().map(|e| format!("{:02x}", e)).collect();
            format!("{HEX_PREFIX}{digits}")
        }
        RawHandle::Text(text) if text.starts_with(HEX_PREFIX) => text.clone(),
        RawHandle::Text(text) => format!("{HEX_PREFIX}{text}"),
        RawHandle::Numeric(n) => format!("{HEX_PREFIX}{n}"),
    };

    fit_width(hex, HANDLE_HEX_LEN)
}

/// hex-encode a proof buffer. unlike handles, proofs keep their length.
pub fn format_proof(proof: &[u8]) -> String {
    prefixed_hex(proof)
}

fn prefixed_hex(bytes: &[u8]) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

fn fit_width(mut hex: String, width: usize) -> String {
    let len = hex.chars().count();
    if len < width {
        hex.extend(std::iter::repeat('0').take(width - len));
        hex
    } else if len > width {
        hex.chars().take(width).collect()
    } else {
        hex
    }
}

/// 32-byte ciphertext handle as stored on chain
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle(pub [u8; HANDLE_BYTES]);

impl CiphertextHandle {
    /// parse a canonical `0x` + 64 hex digit handle
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| Error::InvalidHandle(format!("missing 0x prefix: {s}")))?;

        let mut bytes = [0u8; HANDLE_BYTES];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidHandle(format!("{s}: {e}")))?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HANDLE_BYTES] {
        &self.0
    }

    /// canonical hex form, same shape [`format_handle`] produces
    pub fn to_hex(&self) -> String {
        prefixed_hex(&self.0)
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self.to_hex())
    }
}

impl From<[u8; HANDLE_BYTES]> for CiphertextHandle {
    fn from(bytes: [u8; HANDLE_BYTES]) -> Self {
        Self(bytes)
    }
}
