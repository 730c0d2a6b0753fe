//! 20-byte evm account / contract address

use crate::error::{Error, Result};
use crate::handle::HEX_PREFIX;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

pub const ADDRESS_BYTES: usize = 20;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// the zero address, used by the self-test
    pub const ZERO: Self = Self([0u8; ADDRESS_BYTES]);

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// lowercase `0x` hex
    pub fn to_hex(&self) -> String {
        format!("{HEX_PREFIX}{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = Error;

    /// accepts mixed-case (checksummed) input, checksum is not verified
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| Error::InvalidAddress(format!("missing 0x prefix: {s}")))?;

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{s}: {e}")))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checksummed() {
        let addr: Address = "0xb420eecda221E7BbbdEa4383CFef5eef68c2ddf3".parse().unwrap();
        assert_eq!(addr.to_hex(), "0xb420eecda221e7bbbdea4383cfef5eef68c2ddf3");
        assert_eq!(addr.0[0], 0xb4);
    }

    #[test]
    fn test_zero() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(zero, Address::ZERO);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("b420eecda221E7BbbdEa4383CFef5eef68c2ddf3".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xg420eecda221E7BbbdEa4383CFef5eef68c2ddf3".parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr = Address([0x42; ADDRESS_BYTES]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "42".repeat(20)));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
