//! The wallet provider interface consumed by the checkout.
//!
//! A wallet provider is whatever holds the buyer's keys: a browser extension,
//! a mobile wallet bridged over a relay, or a local signer. The checkout only
//! needs six things from it: connect, disconnect, report the active account and
//! chain, switch chain, and sign-and-send either a native transfer or a
//! contract call. Key custody, signing and broadcast stay on the provider's side.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::Serialize;
use std::sync::Arc;

use crate::chain::ChainId;
use crate::fees::FeeHints;

/// The account a connected wallet is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// Address that will sign and pay.
    pub address: Address,
    /// Chain the wallet is currently pointed at.
    pub chain_id: ChainId,
}

/// A plain value transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTransfer {
    /// Recipient of the value.
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    /// Fee overrides for this transaction.
    pub fees: FeeHints,
}

/// A contract call carrying pre-encoded calldata and no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Contract to call.
    pub to: Address,
    /// ABI-encoded function call.
    pub calldata: Bytes,
    /// Fee overrides for this transaction.
    pub fees: FeeHints,
}

/// Failures reported by a wallet provider.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WalletError {
    /// The wallet holder declined the request.
    #[error("User rejected the request")]
    UserRejected,
    /// No account is connected.
    #[error("Wallet is not connected")]
    NotConnected,
    /// The wallet cannot operate on the requested chain.
    #[error("Chain {0} is not supported by the wallet")]
    UnsupportedChain(ChainId),
    /// JSON-RPC or transport failure, including node-side rejections such as
    /// insufficient funds.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Any other provider-specific failure.
    #[error("{0}")]
    Custom(String),
}

/// Operations the checkout needs from a wallet.
///
/// Every method may suspend for as long as the wallet holder takes to approve
/// or reject the request; implementations must not impose their own timeout.
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet to connect and returns the account it exposes.
    async fn connect(&self) -> Result<WalletAccount, WalletError>;

    /// Drops the connection.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// The connected account and its active chain, or `None` when disconnected.
    fn account(&self) -> Option<WalletAccount>;

    /// Asks the wallet to change its active chain.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError>;

    /// Signs and broadcasts a value transfer, returning its hash.
    async fn send_native(&self, tx: NativeTransfer) -> Result<TxHash, WalletError>;

    /// Signs and broadcasts a contract call, returning its hash.
    async fn send_contract_call(&self, tx: ContractCall) -> Result<TxHash, WalletError>;
}

#[async_trait::async_trait]
impl<T: WalletProvider + ?Sized> WalletProvider for Arc<T> {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        (**self).connect().await
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        (**self).disconnect().await
    }

    fn account(&self) -> Option<WalletAccount> {
        (**self).account()
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        (**self).switch_chain(chain_id).await
    }

    async fn send_native(&self, tx: NativeTransfer) -> Result<TxHash, WalletError> {
        (**self).send_native(tx).await
    }

    async fn send_contract_call(&self, tx: ContractCall) -> Result<TxHash, WalletError> {
        (**self).send_contract_call(tx).await
    }
}
