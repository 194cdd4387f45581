//! Numeric chain identifiers.
//!
//! Every chain the checkout accepts is an EVM network, so a chain is identified
//! by its EIP-155 chain id (`1` for Ethereum, `56` for BNB Smart Chain, `137`
//! for Polygon). The CAIP-2 form `eip155:<id>` is accepted wherever a chain id
//! is parsed from text, which keeps configuration files readable.
//!
//! ```
//! use kitpay_types::chain::ChainId;
//!
//! let bsc: ChainId = "56".parse().unwrap();
//! assert_eq!(bsc, ChainId::new(56));
//!
//! let polygon: ChainId = "eip155:137".parse().unwrap();
//! assert_eq!(polygon.inner(), 137);
//! assert_eq!(polygon.as_caip2(), "eip155:137");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// The CAIP-2 namespace for EVM-compatible chains.
pub const EIP155_NAMESPACE: &str = "eip155";

/// A numeric EVM chain id.
///
/// Serializes as a JSON number. Deserializes from a number, a decimal string,
/// or a CAIP-2 `eip155:<id>` string (the latter two are what JSON map keys look like).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ChainId(u64);

impl ChainId {
    /// Creates a chain id from its numeric value.
    pub const fn new(chain_id: u64) -> Self {
        Self(chain_id)
    }

    /// Returns the numeric chain id.
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Formats the chain id as a CAIP-2 identifier, e.g. `eip155:56`.
    pub fn as_caip2(&self) -> String {
        format!("{}:{}", EIP155_NAMESPACE, self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ChainId> for u64 {
    fn from(value: ChainId) -> Self {
        value.0
    }
}

/// Error returned when parsing an invalid chain id string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainIdFormatError {
    /// The CAIP-2 namespace is not `eip155`.
    #[error("Invalid namespace {0}, expected eip155")]
    InvalidNamespace(String),
    /// The chain reference is not a valid unsigned integer.
    #[error("Invalid chain id {0}")]
    InvalidReference(String),
}

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reference = match s.split_once(':') {
            Some((namespace, reference)) => {
                if namespace != EIP155_NAMESPACE {
                    return Err(ChainIdFormatError::InvalidNamespace(namespace.into()));
                }
                reference
            }
            None => s,
        };
        reference
            .trim()
            .parse::<u64>()
            .map(ChainId)
            .map_err(|_| ChainIdFormatError::InvalidReference(s.into()))
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChainIdVisitor;

        impl de::Visitor<'_> for ChainIdVisitor {
            type Value = ChainId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a numeric chain id or an eip155:<id> string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ChainId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(ChainId)
                    .map_err(|_| E::custom(format!("negative chain id {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ChainIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_caip2() {
        assert_eq!("1".parse::<ChainId>().unwrap(), ChainId::new(1));
        assert_eq!("eip155:56".parse::<ChainId>().unwrap(), ChainId::new(56));
    }

    #[test]
    fn test_parse_rejects_foreign_namespace() {
        let err = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp"
            .parse::<ChainId>()
            .unwrap_err();
        assert_eq!(err, ChainIdFormatError::InvalidNamespace("solana".into()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("mainnet".parse::<ChainId>().is_err());
        assert!("eip155:".parse::<ChainId>().is_err());
        assert!("-1".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_serde_number_and_string() {
        let json = serde_json::to_string(&ChainId::new(137)).unwrap();
        assert_eq!(json, "137");
        let from_number: ChainId = serde_json::from_str("137").unwrap();
        let from_caip2: ChainId = serde_json::from_str("\"eip155:137\"").unwrap();
        assert_eq!(from_number, from_caip2);
    }
}
