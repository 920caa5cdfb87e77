//! Dashboard facade: the stake form and the unstake table
//!
//! Wires the approval manager and the stake controller to one session and a
//! single in-flight flag, and exposes the two page flows:
//!
//! - **Stake form**: live reward preview, allowance check as the amount is
//!   edited, approve-if-needed then stake, then balance refresh.
//! - **Unstake table**: positions split into locked and unlocked groups, with
//!   unlock timestamps for the locked ones.

use crate::allowance::ApprovalManager;
use crate::config::Config;
use crate::inflight::InFlight;
use crate::lifecycle::StakeController;
use crate::pool::PoolId;
use crate::rewards::preview_reward;
use crate::allowance::log_failure;
use crate::session::{require_session, ChainSession};
use crate::stake::UserStake;
use crate::units::is_positive;
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of the stake button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeOutcome {
    Staked,
    /// Amount empty, malformed or zero; nothing was sent
    InvalidAmount,
    /// No wallet connected; the connection prompt was opened
    NotConnected,
    /// Another transaction is pending
    Busy,
    ApprovalFailed,
    StakeFailed,
}

/// A locked position and when it opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedStake {
    pub stake: UserStake,
    pub unlocks_at: u64,
}

/// Positions grouped for the unstake table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StakeBoard {
    pub locked: Vec<LockedStake>,
    pub unlocked: Vec<UserStake>,
}

impl StakeBoard {
    /// Split positions by lock status at `now`
    pub fn partition(stakes: Vec<UserStake>, now: u64) -> Self {
        let mut board = StakeBoard::default();
        for stake in stakes {
            if stake.is_locked(now) {
                let unlocks_at = stake.unlock_time();
                board.locked.push(LockedStake { stake, unlocks_at });
            } else {
                board.unlocked.push(stake);
            }
        }
        board
    }

    pub fn is_empty(&self) -> bool {
        self.locked.is_empty() && self.unlocked.is_empty()
    }
}

pub struct StakingDashboard<S: ChainSession + ?Sized> {
    session: Arc<S>,
    approvals: ApprovalManager<S>,
    stakes: StakeController<S>,
    in_flight: InFlight,
}

impl<S: ChainSession + ?Sized> StakingDashboard<S> {
    pub fn new(session: Arc<S>, config: &Config) -> Self {
        log::debug!(
            "Dashboard for token {} staking {} on chain {} ({})",
            config.token_address,
            config.staking_address,
            config.chain_id,
            config.rpc_url
        );

        let in_flight = InFlight::new();
        Self {
            approvals: ApprovalManager::new(Arc::clone(&session), config, in_flight.clone()),
            stakes: StakeController::new(Arc::clone(&session), config, in_flight.clone()),
            session,
            in_flight,
        }
    }

    pub fn approvals(&self) -> &ApprovalManager<S> {
        &self.approvals
    }

    pub fn stakes(&self) -> &StakeController<S> {
        &self.stakes
    }

    /// Whether the stake and unstake buttons should show "Processing..."
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Estimated reward for the amount being typed
    pub fn preview(&self, amount: &str, pool: PoolId) -> String {
        preview_reward(amount, pool)
    }

    /// Called on every amount edit; returns whether "Stake Now" can skip approval
    pub async fn on_amount_changed(&self, amount: &str) -> bool {
        if amount.trim().is_empty() {
            return self.approvals.is_approved();
        }
        self.approvals.check_allowance(amount).await
    }

    /// Approve if the allowance falls short, stake, then refresh the balance
    pub async fn stake(&self, amount: &str, pool: PoolId) -> StakeOutcome {
        if !is_positive(amount) {
            return StakeOutcome::InvalidAmount;
        }
        if let Err(e) = require_session(self.session.as_ref()) {
            log_failure("staking", &e);
            return StakeOutcome::NotConnected;
        }

        let Some(guard) = self.in_flight.try_begin() else {
            log::warn!("Stake ignored: another operation is in flight");
            return StakeOutcome::Busy;
        };

        // Allowance may have been spent since the last amount edit
        if !self.approvals.check_allowance(amount).await
            && !self.approvals.approve_in_flight(amount).await
        {
            return StakeOutcome::ApprovalFailed;
        }

        if !self.stakes.stake_in_flight(amount, pool).await {
            return StakeOutcome::StakeFailed;
        }
        drop(guard);

        log::info!("Staked {} into pool {}", amount, pool);
        self.approvals.get_balance().await;
        StakeOutcome::Staked
    }

    /// Resynchronize positions and group them at `now`
    pub async fn refresh_board_at(&self, now: u64) -> StakeBoard {
        StakeBoard::partition(self.stakes.get_user_stakes().await, now)
    }

    /// Resynchronize positions and group them by wall-clock time
    pub async fn refresh_board(&self) -> StakeBoard {
        self.refresh_board_at(unix_now()).await
    }

    /// Withdraw one position from the table
    pub async fn unstake(&self, stake: &UserStake) -> bool {
        self.stakes.withdraw(stake.pool_id, stake.stake_index).await
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
