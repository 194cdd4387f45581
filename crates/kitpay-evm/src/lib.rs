//! Alloy-backed wallet provider for kitpay.
//!
//! [`EvmWallet`] implements [`kitpay_types::wallet::WalletProvider`] with a
//! local private key and one JSON-RPC provider per configured chain. It is the
//! wallet the `kitpay pay` command uses; browser and mobile wallets implement
//! the same trait on their side of the bridge.
//!
//! - [`config`] - Wallet configuration (signer key, per-chain RPC endpoints)
//! - [`provider`] - The wallet itself and its fee-hint handling
//!
//! # Feature Flags
//!
//! - `telemetry` - Emit `tracing` events for transport selection and broadcasts

pub mod config;
pub mod provider;

pub use config::{EvmChainConfig, EvmPrivateKey, EvmWalletConfig};
pub use provider::{EvmWallet, EvmWalletError};
