use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, TxHash};
use alloy_provider::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
    SimpleNonceManager, WalletFiller,
};
use alloy_provider::{Identity, Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use kitpay_types::chain::ChainId;
use kitpay_types::config::RpcConfig;
use kitpay_types::fees::FeeHints;
use kitpay_types::wallet::{
    ContractCall, NativeTransfer, WalletAccount, WalletError, WalletProvider,
};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tower::ServiceBuilder;

use crate::config::EvmWalletConfig;

/// Combined filler type for gas, blob gas, nonce, and chain ID.
pub type InnerFiller = JoinFill<
    GasFiller,
    JoinFill<BlobGasFiller, JoinFill<NonceFiller<SimpleNonceManager>, ChainIdFiller>>,
>;

/// Per-chain provider: fillers, then the signing wallet, over a JSON-RPC root provider.
pub type InnerProvider = FillProvider<
    JoinFill<JoinFill<Identity, InnerFiller>, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

/// Errors building an [`EvmWallet`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum EvmWalletError {
    #[error("Invalid signer key: {0}")]
    InvalidSigner(String),
    #[error("No chains configured for the wallet")]
    NoChains,
    #[error("No HTTP RPC endpoint configured for chain {0}")]
    NoRpc(ChainId),
}

#[derive(Debug, Clone, Copy)]
struct LocalSession {
    connected: bool,
    chain_id: ChainId,
}

/// A wallet backed by a local private key and one JSON-RPC provider per chain.
///
/// Connecting never prompts: the key is already at hand, so `connect` simply
/// exposes the signer's account on the initial chain. Switching chains is a
/// local pointer move and succeeds for every configured chain. Transactions are
/// signed by alloy's wallet filler and broadcast without waiting for a receipt.
#[derive(Debug)]
pub struct EvmWallet {
    address: Address,
    providers: HashMap<ChainId, InnerProvider>,
    session: Mutex<LocalSession>,
}

impl EvmWallet {
    /// Builds an RPC client that rotates over the HTTP endpoints of one chain,
    /// each throttled to its configured rate limit.
    pub fn rpc_client(chain_id: ChainId, rpc: &[RpcConfig]) -> Result<RpcClient, EvmWalletError> {
        let transports = rpc
            .iter()
            .filter_map(|rpc_config| {
                let rpc_url = rpc_config.http.inner().clone();
                if !matches!(rpc_url.scheme(), "http" | "https") {
                    return None;
                }
                #[cfg(feature = "telemetry")]
                tracing::info!(chain=%chain_id, rpc_url=%rpc_url, rate_limit=?rpc_config.rate_limit, "Using HTTP transport");
                let rate_limit = rpc_config.rate_limit.unwrap_or(u32::MAX);
                let service = ServiceBuilder::new()
                    .layer(ThrottleLayer::new(rate_limit))
                    .service(Http::new(rpc_url));
                Some(service)
            })
            .collect::<Vec<_>>();
        let active = NonZeroUsize::new(transports.len()).ok_or(EvmWalletError::NoRpc(chain_id))?;
        let fallback = ServiceBuilder::new()
            .layer(FallbackLayer::default().with_active_transport_count(active))
            .service(transports);
        Ok(RpcClient::new(fallback, false))
    }

    /// Creates the wallet: parses the signer and builds a provider per configured chain.
    ///
    /// No network request is made here.
    pub fn from_config(config: &EvmWalletConfig) -> Result<Self, EvmWalletError> {
        let signer = PrivateKeySigner::from_bytes(config.signer.inner().as_b256())
            .map_err(|e| EvmWalletError::InvalidSigner(e.to_string()))?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);
        let initial_chain = config.initial_chain().ok_or(EvmWalletError::NoChains)?;

        let mut providers = HashMap::with_capacity(config.chains.len());
        for (chain_id, chain_config) in &config.chains {
            let client = Self::rpc_client(*chain_id, &chain_config.rpc)?;
            let filler: InnerFiller = JoinFill::new(
                GasFiller,
                JoinFill::new(
                    BlobGasFiller::default(),
                    JoinFill::new(
                        NonceFiller::new(SimpleNonceManager::default()),
                        ChainIdFiller::default(),
                    ),
                ),
            );
            let provider: InnerProvider = ProviderBuilder::default()
                .filler(filler)
                .wallet(wallet.clone())
                .connect_client(client);
            providers.insert(*chain_id, provider);
        }

        #[cfg(feature = "telemetry")]
        tracing::info!(address=%address, chains=?providers.keys().collect::<Vec<_>>(), initial_chain=%initial_chain, "Using local EVM wallet");

        Ok(Self {
            address,
            providers,
            session: Mutex::new(LocalSession {
                connected: false,
                chain_id: initial_chain,
            }),
        })
    }

    /// Address of the signing account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Chains this wallet has a provider for.
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.providers.keys().copied()
    }

    fn session(&self) -> MutexGuard<'_, LocalSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn active_provider(&self) -> Result<(ChainId, &InnerProvider), WalletError> {
        let session = *self.session();
        if !session.connected {
            return Err(WalletError::NotConnected);
        }
        self.providers
            .get(&session.chain_id)
            .map(|provider| (session.chain_id, provider))
            .ok_or(WalletError::UnsupportedChain(session.chain_id))
    }

    async fn broadcast(&self, txr: TransactionRequest) -> Result<TxHash, WalletError> {
        let (chain_id, provider) = self.active_provider()?;
        let txr = txr.with_from(self.address);
        let pending = provider.send_transaction(txr).await.map_err(|e| {
            #[cfg(feature = "telemetry")]
            tracing::warn!(chain=%chain_id, error=%e, "Failed to broadcast transaction");
            WalletError::Transport(e.to_string())
        })?;
        let tx_hash = *pending.tx_hash();
        #[cfg(feature = "telemetry")]
        tracing::info!(chain=%chain_id, tx=%tx_hash, "Transaction broadcast");
        #[cfg(not(feature = "telemetry"))]
        let _ = chain_id;
        Ok(tx_hash)
    }
}

/// Copies every set fee hint onto the transaction request.
pub fn apply_fee_hints(txr: &mut TransactionRequest, fees: &FeeHints) {
    if let Some(gas_price) = fees.gas_price {
        txr.set_gas_price(gas_price);
    }
    if let Some(gas_limit) = fees.gas_limit {
        txr.set_gas_limit(gas_limit);
    }
    if let Some(max_fee_per_gas) = fees.max_fee_per_gas {
        txr.set_max_fee_per_gas(max_fee_per_gas);
    }
    if let Some(max_priority_fee_per_gas) = fees.max_priority_fee_per_gas {
        txr.set_max_priority_fee_per_gas(max_priority_fee_per_gas);
    }
}

#[async_trait::async_trait]
impl WalletProvider for EvmWallet {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        let mut session = self.session();
        session.connected = true;
        Ok(WalletAccount {
            address: self.address,
            chain_id: session.chain_id,
        })
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.session().connected = false;
        Ok(())
    }

    fn account(&self) -> Option<WalletAccount> {
        let session = *self.session();
        session.connected.then_some(WalletAccount {
            address: self.address,
            chain_id: session.chain_id,
        })
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        if !self.providers.contains_key(&chain_id) {
            return Err(WalletError::UnsupportedChain(chain_id));
        }
        let mut session = self.session();
        if !session.connected {
            return Err(WalletError::NotConnected);
        }
        session.chain_id = chain_id;
        Ok(())
    }

    async fn send_native(&self, tx: NativeTransfer) -> Result<TxHash, WalletError> {
        let mut txr = TransactionRequest::default()
            .with_to(tx.to)
            .with_value(tx.value);
        apply_fee_hints(&mut txr, &tx.fees);
        self.broadcast(txr).await
    }

    async fn send_contract_call(&self, tx: ContractCall) -> Result<TxHash, WalletError> {
        let mut txr = TransactionRequest::default()
            .with_to(tx.to)
            .with_input(tx.calldata);
        apply_fee_hints(&mut txr, &tx.fees);
        self.broadcast(txr).await
    }
}
