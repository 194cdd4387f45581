//! In-memory wallet used by the tests.

use alloy_primitives::{Address, TxHash, address, b256};
use kitpay_types::chain::ChainId;
use kitpay_types::networks::KnownNetwork;
use kitpay_types::wallet::{
    ContractCall, NativeTransfer, WalletAccount, WalletError, WalletProvider,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct Calls {
    connect: AtomicUsize,
    disconnect: AtomicUsize,
    switch_chain: AtomicUsize,
    send_native: AtomicUsize,
    send_contract_call: AtomicUsize,
}

impl Calls {
    fn hit(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn connect(&self) -> usize {
        self.connect.load(Ordering::SeqCst)
    }

    pub fn switch_chain(&self) -> usize {
        self.switch_chain.load(Ordering::SeqCst)
    }

    pub fn send_native(&self) -> usize {
        self.send_native.load(Ordering::SeqCst)
    }

    pub fn send_contract_call(&self) -> usize {
        self.send_contract_call.load(Ordering::SeqCst)
    }

    /// Calls to any asynchronous wallet method.
    pub fn total(&self) -> usize {
        self.connect()
            + self.disconnect.load(Ordering::SeqCst)
            + self.switch_chain()
            + self.send_native()
            + self.send_contract_call()
    }
}

#[derive(Debug)]
pub struct MockWallet {
    pub calls: Calls,
    account: Mutex<Option<WalletAccount>>,
    send_result: Result<TxHash, WalletError>,
    switch_result: Result<(), WalletError>,
    gate: Option<Arc<Notify>>,
    pub last_native: Mutex<Option<NativeTransfer>>,
    pub last_contract_call: Mutex<Option<ContractCall>>,
}

impl MockWallet {
    pub const ADDRESS: Address = address!("0x1111111111111111111111111111111111111111");
    pub const TX_HASH: TxHash =
        b256!("0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060");

    pub fn disconnected() -> Self {
        Self {
            calls: Calls::default(),
            account: Mutex::new(None),
            send_result: Ok(Self::TX_HASH),
            switch_result: Ok(()),
            gate: None,
            last_native: Mutex::new(None),
            last_contract_call: Mutex::new(None),
        }
    }

    pub fn connected(chain_id: ChainId) -> Self {
        let wallet = Self::disconnected();
        wallet.set_account(Some(chain_id));
        wallet
    }

    /// Every send fails as if the holder declined it.
    pub fn rejecting(mut self) -> Self {
        self.send_result = Err(WalletError::UserRejected);
        self
    }

    pub fn failing_switch(mut self) -> Self {
        self.switch_result = Err(WalletError::UserRejected);
        self
    }

    /// Sends block until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_account(&self, chain_id: Option<ChainId>) {
        *self.account.lock().unwrap() = chain_id.map(|chain_id| WalletAccount {
            address: Self::ADDRESS,
            chain_id,
        });
    }

    async fn send(&self) -> Result<TxHash, WalletError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.send_result.clone()
    }
}

#[async_trait::async_trait]
impl WalletProvider for MockWallet {
    async fn connect(&self) -> Result<WalletAccount, WalletError> {
        Calls::hit(&self.calls.connect);
        let mut account = self.account.lock().unwrap();
        let connected = account.unwrap_or(WalletAccount {
            address: Self::ADDRESS,
            chain_id: ChainId::ethereum(),
        });
        *account = Some(connected);
        Ok(connected)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Calls::hit(&self.calls.disconnect);
        *self.account.lock().unwrap() = None;
        Ok(())
    }

    fn account(&self) -> Option<WalletAccount> {
        *self.account.lock().unwrap()
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        Calls::hit(&self.calls.switch_chain);
        self.switch_result.clone()?;
        if let Some(account) = self.account.lock().unwrap().as_mut() {
            account.chain_id = chain_id;
        }
        Ok(())
    }

    async fn send_native(&self, tx: NativeTransfer) -> Result<TxHash, WalletError> {
        Calls::hit(&self.calls.send_native);
        *self.last_native.lock().unwrap() = Some(tx);
        self.send().await
    }

    async fn send_contract_call(&self, tx: ContractCall) -> Result<TxHash, WalletError> {
        Calls::hit(&self.calls.send_contract_call);
        *self.last_contract_call.lock().unwrap() = Some(tx);
        self.send().await
    }
}
