//! Fixed-price crypto checkout for a single product.
//!
//! A buyer opens the storefront, presses "Buy Now", connects a wallet, picks a
//! chain and token, and pays a fixed amount to a single recipient address.
//! Once the wallet returns a transaction hash the download link is revealed.
//!
//! Chain and token tables, fixed amounts and fee hints live in
//! [`kitpay_types`]; the alloy-backed wallet lives in [`kitpay_evm`]. This
//! crate holds the checkout flow itself:
//!
//! - [`session`] - Wallet session adapter over any [`WalletProvider`](kitpay_types::wallet::WalletProvider)
//! - [`dispatcher`] - Builds and submits the payment transaction
//! - [`checkout`] - The checkout form state machine
//! - [`storefront`] - Product listing and the "Buy Now" gate
//! - [`handlers`] - Read-only HTTP catalog
//! - [`config`] - Command line and configuration file
//! - [`run`] - Subcommand entry points
//! - [`util`] - Telemetry and graceful shutdown
//!
//! Payment confirmation is purely what the wallet reports; nothing is
//! verified server-side.

pub mod checkout;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod run;
pub mod session;
pub mod storefront;
pub mod util;

#[cfg(test)]
mod mock;
