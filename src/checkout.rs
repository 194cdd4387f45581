//! The checkout form: chain and token selection, submission, and the outcome.
//!
//! ```text
//! Disconnected --session connected--> Idle --submit--> Submitting --hash--> Succeeded
//!                                       ^                  |
//!                                       |             any failure
//!                                       |                  v
//!                                       +--dismiss_error-- Failed
//! ```
//!
//! `Failed` and `Succeeded` both accept a new `submit`. While a submission is
//! outstanding the form rejects another submit and any selection change.

use alloy_primitives::{Address, TxHash};
use kitpay_types::FIXED_RECIPIENT;
use kitpay_types::chain::ChainId;
use kitpay_types::networks::{KnownNetwork, chain_by_id, tokens_for};
use kitpay_types::pricing::fixed_amount_for;
use kitpay_types::token::TokenDescriptor;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::dispatcher::{DispatchError, TransactionDispatcher};
use crate::session::{WalletSession, WalletSessionAdapter};
use crate::storefront::DOWNLOAD_LINK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutPhase {
    Disconnected,
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Why the form did not (or could not) complete a payment.
///
/// The `Display` text is what the buyer sees in the form's error banner.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please select a token")]
    NoTokenSelected,
    #[error("A payment is already being submitted")]
    SubmissionInProgress,
    #[error("Token {symbol} is not available on chain {chain_id}")]
    UnknownToken { chain_id: ChainId, symbol: String },
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Token address is missing")]
    MissingContractAddress,
    #[error("Invalid payment amount")]
    InvalidAmount,
    #[error("Transaction failed")]
    TransactionFailed,
}

impl From<DispatchError> for CheckoutError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::NotConnected => CheckoutError::NotConnected,
            DispatchError::MissingContractAddress(_) => CheckoutError::MissingContractAddress,
            DispatchError::InvalidAmount(_) => CheckoutError::InvalidAmount,
            DispatchError::Wallet(_) => CheckoutError::TransactionFailed,
        }
    }
}

/// A submitted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub hash: TxHash,
    pub chain_id: ChainId,
}

impl TransactionResult {
    /// Block explorer link for the transaction, when the chain has an explorer.
    pub fn explorer_url(&self) -> Option<String> {
        chain_by_id(self.chain_id)?.explorer_tx_url(self.hash)
    }
}

/// What the buyer is about to pay: token, fixed amount and recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub chain_id: ChainId,
    pub token: &'static TokenDescriptor,
    pub amount: &'static str,
    pub recipient: Address,
}

impl Quote {
    pub fn new(chain_id: ChainId, token: &'static TokenDescriptor) -> Self {
        Self {
            chain_id,
            token,
            amount: fixed_amount_for(Some(token)),
            recipient: FIXED_RECIPIENT,
        }
    }
}

#[derive(Debug)]
struct FormState {
    phase: CheckoutPhase,
    chain_id: ChainId,
    tokens: &'static [TokenDescriptor],
    selected: Option<&'static TokenDescriptor>,
    error: Option<CheckoutError>,
    last_result: Option<TransactionResult>,
    download_visible: bool,
    /// Wallet chain the selection was last aligned with.
    observed_chain: Option<ChainId>,
}

impl FormState {
    fn new(session: &WalletSession) -> Self {
        let chain_id = session.active_chain_id.unwrap_or_else(ChainId::ethereum);
        let mut state = Self {
            phase: CheckoutPhase::Disconnected,
            chain_id,
            tokens: &[],
            selected: None,
            error: None,
            last_result: None,
            download_visible: false,
            observed_chain: session.active_chain_id,
        };
        state.load_chain(chain_id);
        state.sync(session);
        state
    }

    fn load_chain(&mut self, chain_id: ChainId) {
        self.chain_id = chain_id;
        self.tokens = tokens_for(chain_id);
        self.selected = self.tokens.first();
    }

    fn sync(&mut self, session: &WalletSession) {
        if self.phase == CheckoutPhase::Submitting {
            return;
        }
        if session.is_connected {
            if self.phase == CheckoutPhase::Disconnected {
                self.phase = CheckoutPhase::Idle;
            }
        } else {
            self.phase = CheckoutPhase::Disconnected;
        }
        if session.active_chain_id != self.observed_chain {
            self.observed_chain = session.active_chain_id;
            if let Some(chain_id) = session.active_chain_id {
                self.load_chain(chain_id);
            }
        }
    }

    fn ensure_not_submitting(&self) -> Result<(), CheckoutError> {
        match self.phase {
            CheckoutPhase::Submitting => Err(CheckoutError::SubmissionInProgress),
            _ => Ok(()),
        }
    }
}

/// Chain/token selection and payment submission for one buyer.
#[derive(Debug)]
pub struct CheckoutForm {
    session: WalletSessionAdapter,
    dispatcher: TransactionDispatcher,
    state: Mutex<FormState>,
}

impl CheckoutForm {
    pub fn new(session: WalletSessionAdapter, dispatcher: TransactionDispatcher) -> Self {
        let state = FormState::new(&session.session());
        Self {
            session,
            dispatcher,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Aligns the form with the wallet session: leaves `Disconnected` once a
    /// wallet is connected and follows the wallet to a new chain.
    pub fn sync_session(&self) -> CheckoutPhase {
        let session = self.session.session();
        let mut state = self.state();
        state.sync(&session);
        state.phase
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.state().phase
    }

    /// True while a submission is outstanding; selectors are disabled.
    pub fn is_loading(&self) -> bool {
        self.phase() == CheckoutPhase::Submitting
    }

    pub fn selected_chain(&self) -> ChainId {
        self.state().chain_id
    }

    /// Tokens offered for the selected chain, native first.
    pub fn tokens(&self) -> &'static [TokenDescriptor] {
        self.state().tokens
    }

    pub fn selected_token(&self) -> Option<&'static TokenDescriptor> {
        self.state().selected
    }

    /// The error currently shown, if any.
    pub fn error(&self) -> Option<CheckoutError> {
        self.state().error.clone()
    }

    pub fn last_result(&self) -> Option<TransactionResult> {
        self.state().last_result
    }

    /// The download link, once a payment went through and until dismissed.
    pub fn download_link(&self) -> Option<&'static str> {
        self.state().download_visible.then_some(DOWNLOAD_LINK)
    }

    pub fn explorer_url(&self) -> Option<String> {
        self.last_result()?.explorer_url()
    }

    /// Token and amount the next submit would pay.
    pub fn quote(&self) -> Option<Quote> {
        let state = self.state();
        state.selected.map(|token| Quote::new(state.chain_id, token))
    }

    /// Selects a chain, asking the wallet to follow when it is elsewhere.
    ///
    /// The token list is reloaded and the first token (the native one) is
    /// selected. A refused chain switch still changes the selection.
    pub async fn select_chain(&self, chain_id: ChainId) -> Result<(), CheckoutError> {
        self.state().ensure_not_submitting()?;
        let session = self.session.session();
        if session.is_connected && session.active_chain_id != Some(chain_id) {
            self.session.request_chain_switch(chain_id).await;
        }
        let session = self.session.session();
        let mut state = self.state();
        state.ensure_not_submitting()?;
        state.observed_chain = session.active_chain_id;
        state.load_chain(chain_id);
        tracing::debug!(chain = %chain_id, token = ?state.selected.map(|t| t.symbol), "Chain selected");
        Ok(())
    }

    pub fn select_token(&self, symbol: &str) -> Result<(), CheckoutError> {
        let mut state = self.state();
        state.ensure_not_submitting()?;
        let token = state
            .tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| CheckoutError::UnknownToken {
                chain_id: state.chain_id,
                symbol: symbol.to_string(),
            })?;
        state.selected = Some(token);
        Ok(())
    }

    /// Pays the fixed amount of the selected token.
    ///
    /// On success the download link is revealed. On failure the message is
    /// kept for display and the form can be submitted again.
    pub async fn submit(&self) -> Result<TransactionResult, CheckoutError> {
        let session = self.session.session();
        let token = {
            let mut state = self.state();
            state.sync(&session);
            state.ensure_not_submitting()?;
            if state.phase == CheckoutPhase::Disconnected {
                return Err(CheckoutError::NotConnected);
            }
            let Some(token) = state.selected else {
                state.error = Some(CheckoutError::NoTokenSelected);
                return Err(CheckoutError::NoTokenSelected);
            };
            state.phase = CheckoutPhase::Submitting;
            state.error = None;
            state.download_visible = false;
            token
        };

        let amount = fixed_amount_for(Some(token));
        let outcome = self.dispatcher.try_send(amount, token).await;
        let chain_id = self
            .session
            .session()
            .active_chain_id
            .or(session.active_chain_id)
            .unwrap_or_else(|| self.selected_chain());

        let mut state = self.state();
        match outcome {
            Ok(hash) => {
                let result = TransactionResult { hash, chain_id };
                state.phase = CheckoutPhase::Succeeded;
                state.last_result = Some(result);
                state.download_visible = true;
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(%error, token = token.symbol, "Checkout payment failed");
                let error = CheckoutError::from(error);
                state.phase = CheckoutPhase::Failed;
                state.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Hides the error banner; a failed form goes back to `Idle`.
    pub fn dismiss_error(&self) {
        let mut state = self.state();
        state.error = None;
        if state.phase == CheckoutPhase::Failed {
            state.phase = CheckoutPhase::Idle;
        }
    }

    /// Closes the download dialog. The last result stays available.
    pub fn dismiss_download(&self) {
        let mut state = self.state();
        state.download_visible = false;
        if state.phase == CheckoutPhase::Succeeded {
            state.phase = CheckoutPhase::Idle;
        }
    }
}
