//! Core types for the kitpay checkout.
//!
//! This crate holds everything the checkout needs to know about the world
//! before a wallet is involved: which chains are accepted, which tokens can be
//! paid with on each of them, how much of each token the kit costs, and which
//! fee overrides to hand to the wallet. It also defines the [`WalletProvider`]
//! trait, the seam between the checkout and whatever actually holds the keys.
//!
//! # Modules
//!
//! - [`chain`]: Numeric EVM chain identifiers and static chain descriptors.
//! - [`networks`]: Registry of accepted chains and their tokens.
//! - [`token`]: Token descriptors and amount scaling.
//! - [`pricing`]: Fixed per-token amounts for the product price.
//! - [`fees`]: Per-chain gas-fee hints.
//! - [`erc20`]: Minimal token-transfer contract interface.
//! - [`wallet`]: The wallet provider interface consumed by the checkout.
//! - [`config`]: Configuration primitives shared by the binaries.
//! - [`util`]: Human-readable decimal amount parsing.
//!
//! [`WalletProvider`]: wallet::WalletProvider

pub mod chain;
pub mod config;
pub mod erc20;
pub mod fees;
pub mod networks;
pub mod pricing;
pub mod token;
pub mod util;
pub mod wallet;

/// The single destination address for every payment, on every chain and token.
pub const FIXED_RECIPIENT: alloy_primitives::Address =
    alloy_primitives::address!("0x2c92d387d7ee0836f12c0ba9ee1f30522161531c");
