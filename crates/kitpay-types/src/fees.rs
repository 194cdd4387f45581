//! Per-chain gas-fee hints.
//!
//! Some chains get explicit fee parameters instead of whatever the wallet
//! would estimate: BNB Smart Chain uses a fixed low legacy gas price, Polygon a
//! fixed EIP-1559 fee pair. A chain without an entry gets no override.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::chain::ChainId;
use crate::networks::KnownNetwork;

/// One gwei in wei.
pub const GWEI: u128 = 1_000_000_000;

/// Gas limit of a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Fee overrides handed to the wallet with a transaction. Unset fields are
/// left to the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHints {
    /// Legacy gas price, in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// Gas limit, in gas units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// EIP-1559 max fee per gas, in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 max priority fee per gas, in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
}

impl FeeHints {
    /// True when no field overrides anything.
    pub fn is_empty(&self) -> bool {
        *self == FeeHints::default()
    }

    /// The same hints with the gas limit dropped.
    ///
    /// A fixed limit sized for a value transfer is too small for a token
    /// contract call, so contract calls let the wallet estimate it.
    pub fn without_gas_limit(self) -> Self {
        FeeHints {
            gas_limit: None,
            ..self
        }
    }
}

static FEE_HINTS: LazyLock<HashMap<ChainId, FeeHints>> = LazyLock::new(|| {
    HashMap::from([
        (
            ChainId::bsc(),
            FeeHints {
                gas_price: Some(GWEI / 10),
                gas_limit: Some(NATIVE_TRANSFER_GAS),
                ..FeeHints::default()
            },
        ),
        (
            ChainId::polygon(),
            FeeHints {
                max_fee_per_gas: Some(100 * GWEI),
                max_priority_fee_per_gas: Some(2 * GWEI),
                ..FeeHints::default()
            },
        ),
    ])
});

/// Fee overrides for a chain, if any are configured.
pub fn fee_hints_for(chain_id: ChainId) -> Option<&'static FeeHints> {
    FEE_HINTS.get(&chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bsc_uses_low_legacy_gas_price() {
        let hints = fee_hints_for(ChainId::bsc()).unwrap();
        assert_eq!(hints.gas_price, Some(100_000_000));
        assert_eq!(hints.gas_limit, Some(21_000));
        assert!(hints.max_fee_per_gas.is_none());
    }

    #[test]
    fn test_polygon_uses_fixed_priority_pair() {
        let hints = fee_hints_for(ChainId::polygon()).unwrap();
        assert_eq!(hints.max_fee_per_gas, Some(100 * GWEI));
        assert_eq!(hints.max_priority_fee_per_gas, Some(2 * GWEI));
        assert!(hints.gas_price.is_none());
    }

    #[test]
    fn test_ethereum_has_no_override() {
        assert!(fee_hints_for(ChainId::ethereum()).is_none());
    }

    #[test]
    fn test_without_gas_limit() {
        let hints = fee_hints_for(ChainId::bsc()).unwrap().without_gas_limit();
        assert!(hints.gas_limit.is_none());
        assert_eq!(hints.gas_price, Some(GWEI / 10));
        assert!(FeeHints::default().is_empty());
    }
}
