//! Turns a token and a human-readable amount into one wallet submission.
//!
//! Native tokens become a plain value transfer to [`FIXED_RECIPIENT`]. Every
//! other token becomes an ERC-20 `transfer(recipient, amount)` call on the
//! token's contract. Gas-fee hints for the active chain are attached as-is.
//!
//! All precondition failures are reported before the wallet is contacted, and
//! each call submits at most once.

use alloy_primitives::{Address, TxHash};
use kitpay_types::FIXED_RECIPIENT;
use kitpay_types::erc20::transfer_calldata;
use kitpay_types::fees::fee_hints_for;
use kitpay_types::token::TokenDescriptor;
use kitpay_types::util::money_amount::MoneyAmountParseError;
use kitpay_types::wallet::{ContractCall, NativeTransfer, WalletError};
use tracing::instrument;

use crate::session::WalletSessionAdapter;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Token {0} has no contract address")]
    MissingContractAddress(&'static str),
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(#[from] MoneyAmountParseError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Submits payments through the wallet behind a session adapter.
#[derive(Debug, Clone)]
pub struct TransactionDispatcher {
    session: WalletSessionAdapter,
    recipient: Address,
}

impl TransactionDispatcher {
    pub fn new(session: WalletSessionAdapter) -> Self {
        Self {
            session,
            recipient: FIXED_RECIPIENT,
        }
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    /// Sends `amount` of `token` and returns the transaction hash, or `None` on
    /// any failure. The failure itself is logged.
    pub async fn send(&self, amount: &str, token: &TokenDescriptor) -> Option<TxHash> {
        match self.try_send(amount, token).await {
            Ok(tx_hash) => Some(tx_hash),
            Err(error) => {
                tracing::error!(%error, token = token.symbol, amount, "Payment was not submitted");
                None
            }
        }
    }

    /// Like [`send`](Self::send), but reports why nothing was submitted.
    #[instrument(skip_all, err, fields(token = token.symbol, amount = %amount))]
    pub async fn try_send(
        &self,
        amount: &str,
        token: &TokenDescriptor,
    ) -> Result<TxHash, DispatchError> {
        let chain_id = self
            .session
            .session()
            .account()
            .ok_or(DispatchError::NotConnected)?
            .chain_id;
        let fees = fee_hints_for(chain_id).copied().unwrap_or_default();
        let wallet = self.session.provider();

        let tx_hash = if token.is_native {
            let value = token.parse(amount)?.value;
            let tx = NativeTransfer {
                to: self.recipient,
                value,
                fees,
            };
            tracing::debug!(chain = %chain_id, %value, "Sending native transfer");
            wallet.send_native(tx).await?
        } else {
            let contract = token
                .contract_address
                .ok_or(DispatchError::MissingContractAddress(token.symbol))?;
            let value = token.parse(amount)?.value;
            // A flat 21000 gas limit only covers value transfers.
            let tx = ContractCall {
                to: contract,
                calldata: transfer_calldata(self.recipient, value),
                fees: fees.without_gas_limit(),
            };
            tracing::debug!(chain = %chain_id, %contract, %value, "Sending token transfer");
            wallet.send_contract_call(tx).await?
        };

        tracing::info!(chain = %chain_id, tx = %tx_hash, "Payment submitted");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockWallet;
    use alloy_primitives::U256;
    use alloy_sol_types::SolCall;
    use kitpay_types::chain::ChainId;
    use kitpay_types::erc20::IERC20;
    use kitpay_types::fees::{FeeHints, GWEI};
    use kitpay_types::networks::{KnownNetwork, USDC, USDT, native_token, token_by_symbol};
    use std::sync::Arc;

    fn dispatcher(wallet: &Arc<MockWallet>) -> TransactionDispatcher {
        TransactionDispatcher::new(WalletSessionAdapter::from_shared(wallet.clone()))
    }

    #[tokio::test]
    async fn test_send_when_disconnected_never_calls_wallet() {
        let wallet = Arc::new(MockWallet::disconnected());
        let eth = native_token(ChainId::ethereum()).unwrap();
        assert_eq!(dispatcher(&wallet).send("0.068", eth).await, None);
        assert_eq!(
            dispatcher(&wallet).try_send("0.068", eth).await,
            Err(DispatchError::NotConnected)
        );
        assert_eq!(wallet.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_missing_contract_address_fails_before_wallet() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()));
        let broken = TokenDescriptor {
            contract_address: None,
            ..USDT::ethereum()
        };
        assert_eq!(
            dispatcher(&wallet).try_send("99", &broken).await,
            Err(DispatchError::MissingContractAddress("USDT"))
        );
        assert_eq!(wallet.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_fails_before_wallet() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()));
        let usdc: TokenDescriptor = USDC::ethereum();
        let result = dispatcher(&wallet).try_send("99.0000001", &usdc).await;
        assert!(matches!(result, Err(DispatchError::InvalidAmount(_))));
        assert_eq!(wallet.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_native_transfer_on_ethereum() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()));
        let eth = native_token(ChainId::ethereum()).unwrap();
        let tx_hash = dispatcher(&wallet).send("0.068", eth).await;
        assert_eq!(tx_hash, Some(MockWallet::TX_HASH));

        let tx = wallet.last_native.lock().unwrap().clone().unwrap();
        assert_eq!(tx.to, FIXED_RECIPIENT);
        assert_eq!(tx.value, U256::from(68_000_000_000_000_000u64));
        assert_eq!(tx.fees, FeeHints::default());
        assert_eq!(wallet.calls.send_native(), 1);
        assert_eq!(wallet.calls.send_contract_call(), 0);
    }

    #[tokio::test]
    async fn test_native_transfer_on_bsc_carries_gas_hints() {
        let wallet = Arc::new(MockWallet::connected(ChainId::bsc()));
        let bnb = native_token(ChainId::bsc()).unwrap();
        dispatcher(&wallet).send("0.18", bnb).await.unwrap();

        let tx = wallet.last_native.lock().unwrap().clone().unwrap();
        assert_eq!(tx.fees.gas_price, Some(GWEI / 10));
        assert_eq!(tx.fees.gas_limit, Some(21_000));
    }

    #[tokio::test]
    async fn test_token_transfer_encodes_erc20_call() {
        let wallet = Arc::new(MockWallet::connected(ChainId::polygon()));
        let usdt = token_by_symbol(ChainId::polygon(), "USDT").unwrap();
        dispatcher(&wallet).send("99", usdt).await.unwrap();

        let tx = wallet.last_contract_call.lock().unwrap().clone().unwrap();
        assert_eq!(Some(tx.to), usdt.contract_address);
        let call = IERC20::transferCall::abi_decode(&tx.calldata).unwrap();
        assert_eq!(call.to, FIXED_RECIPIENT);
        assert_eq!(call.value, U256::from(99_000_000u64));
        assert_eq!(tx.fees.max_fee_per_gas, Some(100 * GWEI));
        assert_eq!(tx.fees.max_priority_fee_per_gas, Some(2 * GWEI));
        assert_eq!(wallet.calls.send_native(), 0);
    }

    #[tokio::test]
    async fn test_token_transfer_on_bsc_drops_native_gas_limit() {
        let wallet = Arc::new(MockWallet::connected(ChainId::bsc()));
        let usdc = token_by_symbol(ChainId::bsc(), "USDC").unwrap();
        dispatcher(&wallet).send("99", usdc).await.unwrap();

        let tx = wallet.last_contract_call.lock().unwrap().clone().unwrap();
        assert_eq!(tx.fees.gas_price, Some(GWEI / 10));
        assert_eq!(tx.fees.gas_limit, None);
        let call = IERC20::transferCall::abi_decode(&tx.calldata).unwrap();
        assert_eq!(call.value, U256::from(99u64) * U256::from(10u64).pow(U256::from(18u64)));
    }

    #[tokio::test]
    async fn test_wallet_rejection_collapses_to_none() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()).rejecting());
        let eth = native_token(ChainId::ethereum()).unwrap();
        assert_eq!(dispatcher(&wallet).send("0.068", eth).await, None);
        assert_eq!(wallet.calls.send_native(), 1);
        assert_eq!(
            dispatcher(&wallet).try_send("0.068", eth).await,
            Err(DispatchError::Wallet(WalletError::UserRejected))
        );
        assert_eq!(wallet.calls.send_native(), 2);
    }
}
