use alloy_primitives::B256;
use kitpay_types::chain::ChainId;
use kitpay_types::config::{LiteralOrEnv, RpcConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Configuration of the local wallet.
///
/// Example JSON:
/// ```json
/// {
///   "signer": "$BUYER_PRIVATE_KEY",
///   "default_chain": 1,
///   "chains": {
///     "eip155:1": { "rpc": [{ "http": "$ETHEREUM_RPC_URL" }] },
///     "eip155:56": { "rpc": [{ "http": "https://bsc-dataseed.bnbchain.org", "rate_limit": 10 }] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmWalletConfig {
    /// Private key of the paying account, literal or `$VAR`.
    pub signer: LiteralOrEnv<EvmPrivateKey>,
    /// Chains the wallet can operate on, keyed by chain id.
    pub chains: HashMap<ChainId, EvmChainConfig>,
    /// Chain the wallet points at right after connecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_chain: Option<ChainId>,
}

impl EvmWalletConfig {
    /// The configured default chain, or the lowest configured chain id.
    pub fn initial_chain(&self) -> Option<ChainId> {
        self.default_chain
            .filter(|chain| self.chains.contains_key(chain))
            .or_else(|| self.chains.keys().min().copied())
    }
}

/// Per-chain wallet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmChainConfig {
    /// JSON-RPC endpoints, tried with fallback.
    pub rpc: Vec<RpcConfig>,
}

/// A validated 32-byte EVM private key.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EvmPrivateKey(B256);

impl EvmPrivateKey {
    pub fn as_b256(&self) -> &B256 {
        &self.0
    }
}

impl fmt::Debug for EvmPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EvmPrivateKey(<redacted>)")
    }
}

impl FromStr for EvmPrivateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid evm private key: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xcafe000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_deserialize_with_caip2_keys() {
        let json = format!(
            r#"{{
                "signer": "{KEY}",
                "chains": {{
                    "eip155:1": {{ "rpc": [{{ "http": "https://eth.llamarpc.com" }}] }},
                    "56": {{ "rpc": [{{ "http": "https://bsc-dataseed.bnbchain.org", "rate_limit": 10 }}] }}
                }}
            }}"#
        );
        let config: EvmWalletConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.chains.len(), 2);
        assert!(config.chains.contains_key(&ChainId::new(56)));
        assert_eq!(config.initial_chain(), Some(ChainId::new(1)));
    }

    #[test]
    fn test_default_chain_must_be_configured() {
        let json = format!(
            r#"{{
                "signer": "{KEY}",
                "default_chain": 137,
                "chains": {{ "56": {{ "rpc": [{{ "http": "https://bsc-dataseed.bnbchain.org" }}] }} }}
            }}"#
        );
        let config: EvmWalletConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.initial_chain(), Some(ChainId::new(56)));
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let key: EvmPrivateKey = KEY.parse().unwrap();
        assert!(!format!("{key:?}").contains("cafe"));
        assert!("0x1234".parse::<EvmPrivateKey>().is_err());
    }
}
