//! Wallet session adapter.
//!
//! [`WalletSessionAdapter`] wraps a [`WalletProvider`] and publishes what the
//! checkout needs to know about it: the connected address, whether a wallet is
//! connected at all, and which chain it is pointed at. The adapter is a cheap
//! handle; clones share the same provider and session.
//!
//! The session only changes in response to wallet events: a connection being
//! granted, a disconnect, or a chain switch the wallet accepted.

use alloy_primitives::Address;
use kitpay_types::chain::ChainId;
use kitpay_types::wallet::{WalletAccount, WalletError, WalletProvider};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;

/// Snapshot of the buyer's wallet connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub address: Option<Address>,
    pub is_connected: bool,
    pub active_chain_id: Option<ChainId>,
}

impl WalletSession {
    fn from_account(account: Option<WalletAccount>) -> Self {
        match account {
            Some(account) => Self {
                address: Some(account.address),
                is_connected: true,
                active_chain_id: Some(account.chain_id),
            },
            None => Self::default(),
        }
    }

    /// The connected account, when the session has both an address and a chain.
    pub fn account(&self) -> Option<WalletAccount> {
        if !self.is_connected {
            return None;
        }
        Some(WalletAccount {
            address: self.address?,
            chain_id: self.active_chain_id?,
        })
    }
}

struct Inner {
    provider: Arc<dyn WalletProvider>,
    session: watch::Sender<WalletSession>,
}

/// Shared handle over a wallet provider and the session it reports.
#[derive(Clone)]
pub struct WalletSessionAdapter {
    inner: Arc<Inner>,
}

impl fmt::Debug for WalletSessionAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSessionAdapter")
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl WalletSessionAdapter {
    pub fn new<P: WalletProvider + 'static>(provider: P) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Wraps an already shared provider. The initial session is whatever the
    /// provider reports right now.
    pub fn from_shared(provider: Arc<dyn WalletProvider>) -> Self {
        let initial = WalletSession::from_account(provider.account());
        let (session, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner { provider, session }),
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> WalletSession {
        *self.inner.session.borrow()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.inner.session.subscribe()
    }

    pub(crate) fn provider(&self) -> &dyn WalletProvider {
        self.inner.provider.as_ref()
    }

    fn publish(&self, session: WalletSession) {
        self.inner.session.send_if_modified(|current| {
            let changed = *current != session;
            *current = session;
            changed
        });
    }

    /// Asks the wallet for a connection and waits for the answer.
    #[instrument(skip_all, err)]
    pub async fn connect(&self) -> Result<WalletSession, WalletError> {
        let account = self.inner.provider.connect().await?;
        let session = WalletSession::from_account(Some(account));
        tracing::info!(address = %account.address, chain = %account.chain_id, "Wallet connected");
        self.publish(session);
        Ok(session)
    }

    /// Opens the wallet's connection prompt without waiting for it.
    ///
    /// The session is updated once the wallet answers. A refusal is logged and
    /// leaves the session untouched.
    pub fn open_connection_modal(&self) {
        let adapter = self.clone();
        tokio::spawn(async move {
            if let Err(error) = adapter.connect().await {
                tracing::warn!(%error, "Wallet connection was not established");
            }
        });
    }

    /// Asks the wallet to move to `chain_id` and waits for its answer.
    ///
    /// Failures are logged and swallowed; the session keeps its previous chain.
    /// Does nothing when no wallet is connected.
    #[instrument(skip(self), fields(chain = %chain_id))]
    pub async fn request_chain_switch(&self, chain_id: ChainId) {
        if !self.session().is_connected {
            tracing::debug!("No wallet connected, chain switch skipped");
            return;
        }
        match self.inner.provider.switch_chain(chain_id).await {
            Ok(()) => {
                self.inner.session.send_if_modified(|session| {
                    let changed = session.active_chain_id != Some(chain_id);
                    session.active_chain_id = Some(chain_id);
                    changed
                });
                tracing::info!("Wallet switched chain");
            }
            Err(error) => tracing::warn!(%error, "Failed to switch chain"),
        }
    }

    #[instrument(skip_all, err)]
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        self.inner.provider.disconnect().await?;
        self.publish(WalletSession::default());
        tracing::info!("Wallet disconnected");
        Ok(())
    }

    /// Re-reads the account from the provider, for wallet events that happen
    /// outside the adapter (account change in the extension, network change
    /// made by the user in the wallet itself).
    pub fn refresh(&self) -> WalletSession {
        let session = WalletSession::from_account(self.inner.provider.account());
        self.publish(session);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockWallet;
    use kitpay_types::networks::KnownNetwork;

    #[tokio::test]
    async fn test_connect_publishes_session() {
        let wallet = Arc::new(MockWallet::disconnected());
        let adapter = WalletSessionAdapter::from_shared(wallet.clone());
        assert_eq!(adapter.session(), WalletSession::default());

        let mut rx = adapter.subscribe();
        let session = adapter.connect().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), session);
        assert!(session.is_connected);
        assert_eq!(session.address, Some(MockWallet::ADDRESS));
        assert_eq!(session.active_chain_id, Some(ChainId::ethereum()));
        assert_eq!(wallet.calls.connect(), 1);
    }

    #[tokio::test]
    async fn test_open_connection_modal_is_fire_and_forget() {
        let adapter = WalletSessionAdapter::new(MockWallet::disconnected());
        let mut rx = adapter.subscribe();
        adapter.open_connection_modal();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_connected);
    }

    #[tokio::test]
    async fn test_chain_switch_updates_session() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()));
        let adapter = WalletSessionAdapter::from_shared(wallet.clone());
        adapter.request_chain_switch(ChainId::bsc()).await;
        assert_eq!(adapter.session().active_chain_id, Some(ChainId::bsc()));
        assert_eq!(wallet.calls.switch_chain(), 1);
    }

    #[tokio::test]
    async fn test_chain_switch_failure_is_swallowed() {
        let wallet = Arc::new(MockWallet::connected(ChainId::ethereum()).failing_switch());
        let adapter = WalletSessionAdapter::from_shared(wallet.clone());
        adapter.request_chain_switch(ChainId::polygon()).await;
        assert_eq!(adapter.session().active_chain_id, Some(ChainId::ethereum()));
        assert_eq!(wallet.calls.switch_chain(), 1);
    }

    #[tokio::test]
    async fn test_chain_switch_skipped_when_disconnected() {
        let wallet = Arc::new(MockWallet::disconnected());
        let adapter = WalletSessionAdapter::from_shared(wallet.clone());
        adapter.request_chain_switch(ChainId::bsc()).await;
        assert_eq!(wallet.calls.total(), 0);
        assert_eq!(adapter.session().active_chain_id, None);
    }

    #[tokio::test]
    async fn test_disconnect_and_refresh() {
        let wallet = Arc::new(MockWallet::connected(ChainId::polygon()));
        let adapter = WalletSessionAdapter::from_shared(wallet.clone());
        assert!(adapter.session().is_connected);

        adapter.disconnect().await.unwrap();
        assert_eq!(adapter.session(), WalletSession::default());
        assert!(adapter.session().account().is_none());

        wallet.set_account(Some(ChainId::bsc()));
        let session = adapter.refresh();
        assert_eq!(session.active_chain_id, Some(ChainId::bsc()));
        assert_eq!(adapter.session(), session);
    }
}
