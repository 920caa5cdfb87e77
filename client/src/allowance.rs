//! Allowance/approval manager
//!
//! Tracks whether the connected account has allowed the staking contract to
//! spend enough tokens, and submits the approval when it has not. Public
//! operations never fail: errors are logged and mapped to `false` or `"0"`.

use crate::address::Address;
use crate::config::Config;
use crate::contracts::TokenContract;
use crate::error::{ClientError, Result};
use crate::inflight::InFlight;
use crate::session::{require_session, ChainSession};
use crate::units::{format_units, parse_units};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct ApprovalState {
    is_approved: bool,
    balance: String,
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self {
            is_approved: false,
            balance: "0".to_string(),
        }
    }
}

pub struct ApprovalManager<S: ChainSession + ?Sized> {
    session: Arc<S>,
    token: Address,
    spender: Address,
    in_flight: InFlight,
    state: Mutex<ApprovalState>,
}

impl<S: ChainSession + ?Sized> ApprovalManager<S> {
    pub fn new(session: Arc<S>, config: &Config, in_flight: InFlight) -> Self {
        Self {
            session,
            token: config.token_address,
            spender: config.staking_address,
            in_flight,
            state: Mutex::new(ApprovalState::default()),
        }
    }

    /// Last approval result from `check_allowance` or `approve`
    pub fn is_approved(&self) -> bool {
        self.state().is_approved
    }

    /// Last balance read by `get_balance`
    pub fn balance(&self) -> String {
        self.state().balance.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Connected account's token balance in display units, "0" on failure
    pub async fn get_balance(&self) -> String {
        match self.read_balance().await {
            Ok(balance) => {
                self.state().balance = balance.clone();
                balance
            }
            Err(e) => {
                log_failure("getting balance", &e);
                "0".to_string()
            }
        }
    }

    /// Whether the current allowance covers `amount`; updates approval state
    pub async fn check_allowance(&self, amount: &str) -> bool {
        match self.read_allowance_covers(amount).await {
            Ok(is_allowed) => {
                self.state().is_approved = is_allowed;
                is_allowed
            }
            Err(e) => {
                log_failure("checking allowance", &e);
                false
            }
        }
    }

    /// Approve the staking contract for exactly `amount` and wait for confirmation
    pub async fn approve(&self, amount: &str) -> bool {
        let Some(_guard) = self.in_flight.try_begin() else {
            log::warn!("Approval ignored: another operation is in flight");
            return false;
        };
        self.approve_in_flight(amount).await
    }

    /// Approval body; the caller holds the in-flight guard
    pub(crate) async fn approve_in_flight(&self, amount: &str) -> bool {
        match self.send_approval(amount).await {
            Ok(()) => {
                self.state().is_approved = true;
                true
            }
            Err(e) => {
                log_failure("approving tokens", &e);
                false
            }
        }
    }

    async fn read_balance(&self) -> Result<String> {
        require_session(self.session.as_ref())?;
        let account = self.session.account().await?;

        let token = TokenContract::new(self.session.as_ref(), self.token);
        let decimals = token.decimals().await?;
        let raw = token.balance_of(account).await?;
        Ok(format_units(raw, decimals)?)
    }

    async fn read_allowance_covers(&self, amount: &str) -> Result<bool> {
        require_session(self.session.as_ref())?;
        let owner = self.session.account().await?;

        let token = TokenContract::new(self.session.as_ref(), self.token);
        let decimals = token.decimals().await?;
        let requested = parse_units(amount, decimals)?;
        let allowance = token.allowance(owner, self.spender).await?;
        Ok(allowance >= requested)
    }

    async fn send_approval(&self, amount: &str) -> Result<()> {
        require_session(self.session.as_ref())?;

        let token = TokenContract::new(self.session.as_ref(), self.token);
        let decimals = token.decimals().await?;
        let requested = parse_units(amount, decimals)?;
        token.approve(self.spender, requested).await?;
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, ApprovalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Log an operation failure; a missing wallet is expected and only noted
pub(crate) fn log_failure(action: &str, err: &ClientError) {
    match err {
        ClientError::NoSession => log::debug!("Skipped {}: wallet not connected", action),
        _ => log::error!("Error {}: {}", action, err),
    }
}
