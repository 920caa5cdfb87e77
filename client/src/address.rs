//! 20-byte account and contract addresses

use crate::error::ClientError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// EVM account or contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Deterministic address for tests: every byte set to `seed`
    pub fn repeat_byte(seed: u8) -> Self {
        Self([seed; 20])
    }
}

impl FromStr for Address {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if hex_part.len() != 40 {
            return Err(ClientError::Config(format!(
                "address {} must be 20 bytes of hex",
                s
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|e| ClientError::Config(format!("address {}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checksummed_address() {
        let addr: Address = "0x196D3B04be42371a5E924C39A14ae0dB8882FD46".parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x19);
        assert_eq!(addr.as_bytes()[19], 0x46);
        assert_eq!(
            addr.to_string(),
            "0x196d3b04be42371a5e924c39a14ae0db8882fd46"
        );
    }

    #[test]
    fn test_parse_without_prefix() {
        let addr: Address = "31ed4401530Cd2137A66fA19D8cB986eaB41b7Bf".parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x31);
    }

    #[test]
    fn test_reject_bad_addresses() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz6D3B04be42371a5E924C39A14ae0dB8882FD46".parse::<Address>().is_err());
        assert!("".parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr = Address::repeat_byte(0xab);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
