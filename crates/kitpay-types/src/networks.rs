//! Registry of the chains and tokens the checkout accepts.
//!
//! The registry is static: three EVM chains, each with its native currency
//! first and two USD stablecoins after it. The order of [`tokens_for`] is the
//! order a buyer sees on the token selector, and the first entry is the default
//! selection after a chain change.
//!
//! | Chain | Id | Tokens |
//! |---|---|---|
//! | Ethereum | 1 | ETH, USDT, USDC |
//! | BNB Smart Chain | 56 | BNB, USDT, USDC |
//! | Polygon | 137 | MATIC, USDT, USDC |
//!
//! Stablecoins on BNB Smart Chain are the Binance-Peg deployments with 18
//! decimals; on Ethereum and Polygon they have 6.
//!
//! # Examples
//!
//! ```
//! use kitpay_types::chain::ChainId;
//! use kitpay_types::networks::{tokens_for, KnownNetwork};
//!
//! let symbols: Vec<_> = tokens_for(ChainId::bsc()).iter().map(|t| t.symbol).collect();
//! assert_eq!(symbols, ["BNB", "USDT", "USDC"]);
//!
//! assert!(tokens_for(ChainId::new(999_999)).is_empty());
//! ```

use alloy_primitives::address;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::chain::{ChainDescriptor, ChainId};
use crate::token::TokenDescriptor;

/// Static descriptors of every accepted chain, in selector order.
pub static KNOWN_CHAINS: [ChainDescriptor; 3] = [
    ChainDescriptor {
        id: ChainId::new(1),
        key: "ETHEREUM",
        display_name: "Ethereum",
        native_symbol: "ETH",
        explorer_base_url: Some("https://etherscan.io"),
    },
    ChainDescriptor {
        id: ChainId::new(137),
        key: "POLYGON",
        display_name: "Polygon",
        native_symbol: "MATIC",
        explorer_base_url: Some("https://polygonscan.com"),
    },
    ChainDescriptor {
        id: ChainId::new(56),
        key: "BSC",
        display_name: "BNB Smart Chain",
        native_symbol: "BNB",
        explorer_base_url: Some("https://bscscan.com"),
    },
];

static ETHEREUM_TOKENS: [TokenDescriptor; 3] = [
    TokenDescriptor {
        symbol: "ETH",
        display_name: "Ethereum",
        is_native: true,
        decimals: 18,
        contract_address: None,
        logo: "🔹",
    },
    TokenDescriptor {
        symbol: "USDT",
        display_name: "Tether USD",
        is_native: false,
        decimals: 6,
        contract_address: Some(address!("0xdAC17F958D2ee523a2206206994597C13D831ec7")),
        logo: "💵",
    },
    TokenDescriptor {
        symbol: "USDC",
        display_name: "USD Coin",
        is_native: false,
        decimals: 6,
        contract_address: Some(address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")),
        logo: "$",
    },
];

static POLYGON_TOKENS: [TokenDescriptor; 3] = [
    TokenDescriptor {
        symbol: "MATIC",
        display_name: "Polygon",
        is_native: true,
        decimals: 18,
        contract_address: None,
        logo: "🟣",
    },
    TokenDescriptor {
        symbol: "USDT",
        display_name: "Tether USD",
        is_native: false,
        decimals: 6,
        contract_address: Some(address!("0xc2132D05D31c914a87C6611C10748AEb04B58e8F")),
        logo: "💵",
    },
    TokenDescriptor {
        symbol: "USDC",
        display_name: "USD Coin",
        is_native: false,
        decimals: 6,
        contract_address: Some(address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174")),
        logo: "💲",
    },
];

static BSC_TOKENS: [TokenDescriptor; 3] = [
    TokenDescriptor {
        symbol: "BNB",
        display_name: "Binance Coin",
        is_native: true,
        decimals: 18,
        contract_address: None,
        logo: "🟡",
    },
    TokenDescriptor {
        symbol: "USDT",
        display_name: "Tether USD",
        is_native: false,
        decimals: 18,
        contract_address: Some(address!("0x55d398326f99059fF775485246999027B3197955")),
        logo: "💵",
    },
    TokenDescriptor {
        symbol: "USDC",
        display_name: "USD Coin",
        is_native: false,
        decimals: 18,
        contract_address: Some(address!("0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d")),
        logo: "💲",
    },
];

static CHAIN_TOKENS: LazyLock<HashMap<ChainId, &'static [TokenDescriptor]>> =
    LazyLock::new(|| {
        HashMap::from([
            (ChainId::ethereum(), &ETHEREUM_TOKENS[..]),
            (ChainId::polygon(), &POLYGON_TOKENS[..]),
            (ChainId::bsc(), &BSC_TOKENS[..]),
        ])
    });

static CHAIN_BY_ID: LazyLock<HashMap<ChainId, &'static ChainDescriptor>> =
    LazyLock::new(|| KNOWN_CHAINS.iter().map(|c| (c.id, c)).collect());

/// All accepted chains in selector order.
pub fn known_chains() -> &'static [ChainDescriptor] {
    &KNOWN_CHAINS
}

/// Looks up the descriptor of an accepted chain.
pub fn chain_by_id(chain_id: ChainId) -> Option<&'static ChainDescriptor> {
    CHAIN_BY_ID.get(&chain_id).copied()
}

/// Looks up a chain by its selector label (`ETHEREUM`, `POLYGON`, `BSC`), ignoring case.
pub fn chain_by_key(key: &str) -> Option<&'static ChainDescriptor> {
    KNOWN_CHAINS
        .iter()
        .find(|chain| chain.key.eq_ignore_ascii_case(key))
}

/// Tokens payable on a chain, native currency first.
///
/// An unknown chain yields an empty slice rather than an error.
pub fn tokens_for(chain_id: ChainId) -> &'static [TokenDescriptor] {
    CHAIN_TOKENS.get(&chain_id).copied().unwrap_or(&[])
}

/// Finds a token on a chain by symbol, ignoring case.
pub fn token_by_symbol(chain_id: ChainId, symbol: &str) -> Option<&'static TokenDescriptor> {
    tokens_for(chain_id)
        .iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
}

/// Convenience constructors for per-network values on the accepted chains.
///
/// Implemented for [`ChainId`], [`ChainDescriptor`], and the token marker
/// types [`USDT`] and [`USDC`], so call sites read as `USDC::polygon()`.
pub trait KnownNetwork<A> {
    /// Ethereum mainnet (chain id 1)
    fn ethereum() -> A;
    /// Polygon PoS (chain id 137)
    fn polygon() -> A;
    /// BNB Smart Chain (chain id 56)
    fn bsc() -> A;
}

impl KnownNetwork<ChainId> for ChainId {
    fn ethereum() -> ChainId {
        ChainId::new(1)
    }

    fn polygon() -> ChainId {
        ChainId::new(137)
    }

    fn bsc() -> ChainId {
        ChainId::new(56)
    }
}

impl KnownNetwork<ChainDescriptor> for ChainDescriptor {
    fn ethereum() -> ChainDescriptor {
        KNOWN_CHAINS[0].clone()
    }

    fn polygon() -> ChainDescriptor {
        KNOWN_CHAINS[1].clone()
    }

    fn bsc() -> ChainDescriptor {
        KNOWN_CHAINS[2].clone()
    }
}

/// Marker struct for Tether USD deployments.
#[allow(clippy::upper_case_acronyms)]
pub struct USDT;

/// Marker struct for USD Coin deployments.
#[allow(clippy::upper_case_acronyms)]
pub struct USDC;

impl KnownNetwork<TokenDescriptor> for USDT {
    fn ethereum() -> TokenDescriptor {
        ETHEREUM_TOKENS[1].clone()
    }

    fn polygon() -> TokenDescriptor {
        POLYGON_TOKENS[1].clone()
    }

    fn bsc() -> TokenDescriptor {
        BSC_TOKENS[1].clone()
    }
}

impl KnownNetwork<TokenDescriptor> for USDC {
    fn ethereum() -> TokenDescriptor {
        ETHEREUM_TOKENS[2].clone()
    }

    fn polygon() -> TokenDescriptor {
        POLYGON_TOKENS[2].clone()
    }

    fn bsc() -> TokenDescriptor {
        BSC_TOKENS[2].clone()
    }
}

/// The native token of an accepted chain, if the chain is known.
pub fn native_token(chain_id: ChainId) -> Option<&'static TokenDescriptor> {
    tokens_for(chain_id).iter().find(|token| token.is_native)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chain_has_native_token_without_contract() {
        for chain in known_chains() {
            let natives: Vec<_> = tokens_for(chain.id).iter().filter(|t| t.is_native).collect();
            assert_eq!(natives.len(), 1, "chain {}", chain.id);
            assert!(natives[0].contract_address.is_none());
            assert_eq!(natives[0].symbol, chain.native_symbol);
        }
    }

    #[test]
    fn test_every_non_native_token_has_contract() {
        for chain in known_chains() {
            for token in tokens_for(chain.id).iter().filter(|t| !t.is_native) {
                let address = token.contract_address.expect("contract address");
                assert!(!address.is_zero(), "{} on {}", token.symbol, chain.id);
                assert!(token.is_well_formed());
            }
        }
    }

    #[test]
    fn test_native_token_is_listed_first() {
        for chain in known_chains() {
            assert!(tokens_for(chain.id)[0].is_native);
        }
    }

    #[test]
    fn test_tokens_for_unknown_chain_is_empty() {
        assert!(tokens_for(ChainId::new(8453)).is_empty());
        assert!(native_token(ChainId::new(8453)).is_none());
    }

    #[test]
    fn test_bsc_tokens() {
        let symbols: Vec<_> = tokens_for(ChainId::bsc()).iter().map(|t| t.symbol).collect();
        assert_eq!(symbols, ["BNB", "USDT", "USDC"]);
        assert_eq!(USDT::bsc().decimals, 18);
        assert_eq!(USDC::ethereum().decimals, 6);
    }

    #[test]
    fn test_lookups() {
        assert_eq!(chain_by_key("bsc").unwrap().id, ChainId::bsc());
        assert_eq!(chain_by_id(ChainId::polygon()).unwrap().native_symbol, "MATIC");
        assert!(chain_by_id(ChainId::new(10)).is_none());
        assert_eq!(
            token_by_symbol(ChainId::polygon(), "usdc").unwrap(),
            &USDC::polygon()
        );
        assert!(token_by_symbol(ChainId::polygon(), "DAI").is_none());
    }

    #[test]
    fn test_explorer_tx_url() {
        let hash = "0xabc";
        assert_eq!(
            ChainDescriptor::bsc().explorer_tx_url(hash).unwrap(),
            "https://bscscan.com/tx/0xabc"
        );
        let bare = ChainDescriptor {
            explorer_base_url: None,
            ..ChainDescriptor::ethereum()
        };
        assert!(bare.explorer_tx_url(hash).is_none());
    }
}
