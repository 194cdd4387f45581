//! Chain identifiers and static chain descriptors.
//!
//! - [`ChainId`] - A numeric EVM chain id (e.g., `56` for BNB Smart Chain)
//! - [`ChainDescriptor`] - Display name, native currency and block explorer of a chain
//!
//! Descriptors for the accepted chains live in [`crate::networks`].

mod chain_id;

pub use chain_id::*;

use serde::Serialize;

/// Static description of a chain the checkout accepts payments on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// Numeric chain id.
    pub id: ChainId,
    /// Uppercase label shown on the chain selector (e.g., `BSC`).
    pub key: &'static str,
    /// Human-readable chain name (e.g., `BNB Smart Chain`).
    pub display_name: &'static str,
    /// Symbol of the chain's native currency.
    pub native_symbol: &'static str,
    /// Base URL of the default block explorer, without a trailing slash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_base_url: Option<&'static str>,
}

impl ChainDescriptor {
    /// Builds the explorer link for a transaction hash on this chain.
    ///
    /// Returns `None` when the chain has no known explorer.
    pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> Option<String> {
        self.explorer_base_url
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}
