//! Stake lifecycle controller
//!
//! Deposits into a pool, enumerates the account's positions across every
//! pool, and withdraws a single position. Enumeration is a full
//! resynchronization from the chain each time; nothing is tracked
//! incrementally.

use crate::address::Address;
use crate::allowance::log_failure;
use crate::config::Config;
use crate::contracts::{StakingContract, TokenContract};
use crate::error::Result;
use crate::inflight::InFlight;
use crate::pool::{PoolDetails, PoolId};
use crate::session::{require_session, ChainSession};
use crate::stake::UserStake;
use crate::units::{format_units, parse_units};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct StakeController<S: ChainSession + ?Sized> {
    session: Arc<S>,
    token: Address,
    staking: Address,
    in_flight: InFlight,
    stakes: Mutex<Vec<UserStake>>,
}

impl<S: ChainSession + ?Sized> StakeController<S> {
    pub fn new(session: Arc<S>, config: &Config, in_flight: InFlight) -> Self {
        Self {
            session,
            token: config.token_address,
            staking: config.staking_address,
            in_flight,
            stakes: Mutex::new(Vec::new()),
        }
    }

    /// Positions from the last successful synchronization
    pub fn stakes(&self) -> Vec<UserStake> {
        self.cache().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Deposit `amount` into `pool`
    ///
    /// Allowance must already cover the amount; it is not re-checked here.
    pub async fn stake(&self, amount: &str, pool: PoolId) -> bool {
        let Some(_guard) = self.in_flight.try_begin() else {
            log::warn!("Stake ignored: another operation is in flight");
            return false;
        };
        self.stake_in_flight(amount, pool).await
    }

    /// Deposit body; the caller holds the in-flight guard
    pub(crate) async fn stake_in_flight(&self, amount: &str, pool: PoolId) -> bool {
        match self.send_stake(amount, pool).await {
            Ok(()) => true,
            Err(e) => {
                log_failure("staking tokens", &e);
                false
            }
        }
    }

    /// Re-read every pool and return the account's active positions
    ///
    /// Positions are ordered by pool id, then by index within the pool.
    /// Withdrawn positions are dropped. On failure the cached list is left
    /// as it was and an empty list is returned.
    pub async fn get_user_stakes(&self) -> Vec<UserStake> {
        match self.sync_stakes().await {
            Ok(active) => {
                *self.cache() = active.clone();
                active
            }
            Err(e) => {
                log_failure("getting user stakes", &e);
                Vec::new()
            }
        }
    }

    /// Withdraw one position, then resynchronize
    pub async fn withdraw(&self, pool: PoolId, stake_index: usize) -> bool {
        let Some(_guard) = self.in_flight.try_begin() else {
            log::warn!("Withdraw ignored: another operation is in flight");
            return false;
        };

        if let Err(e) = self.send_withdraw(pool, stake_index).await {
            log_failure("withdrawing stake", &e);
            return false;
        }

        self.get_user_stakes().await;
        true
    }

    /// Lock period from the contract with the published APY
    ///
    /// Falls back to the static table when the contract cannot be read.
    pub async fn get_pool_details(&self, pool: PoolId) -> PoolDetails {
        match self.read_pool_details(pool).await {
            Ok(details) => details,
            Err(e) => {
                log_failure("getting pool details", &e);
                PoolDetails::fallback(pool)
            }
        }
    }

    /// Contract-computed accrued reward for one position, "0" on failure
    pub async fn calculate_reward(&self, pool: PoolId, stake_index: usize) -> String {
        match self.read_reward(pool, stake_index).await {
            Ok(reward) => reward,
            Err(e) => {
                log_failure("calculating reward", &e);
                "0".to_string()
            }
        }
    }

    async fn send_stake(&self, amount: &str, pool: PoolId) -> Result<()> {
        require_session(self.session.as_ref())?;

        let token = TokenContract::new(self.session.as_ref(), self.token);
        let decimals = token.decimals().await?;
        let raw = parse_units(amount, decimals)?;

        StakingContract::new(self.session.as_ref(), self.staking)
            .stake(pool, raw)
            .await?;
        Ok(())
    }

    async fn send_withdraw(&self, pool: PoolId, stake_index: usize) -> Result<()> {
        require_session(self.session.as_ref())?;

        StakingContract::new(self.session.as_ref(), self.staking)
            .withdraw(pool, stake_index as u64)
            .await?;
        Ok(())
    }

    async fn sync_stakes(&self) -> Result<Vec<UserStake>> {
        require_session(self.session.as_ref())?;
        let account = self.session.account().await?;

        let decimals = TokenContract::new(self.session.as_ref(), self.token)
            .decimals()
            .await?;
        let staking = StakingContract::new(self.session.as_ref(), self.staking);

        let mut active = Vec::new();
        for pool in PoolId::all() {
            let (positions, details) = futures::join!(
                staking.get_user_pool_stakes(account, pool),
                self.get_pool_details(pool)
            );

            for (index, raw) in positions?.iter().enumerate() {
                if raw.withdrawn {
                    continue;
                }
                active.push(UserStake::from_raw(raw, pool, index, details, decimals)?);
            }
        }

        log::debug!("Synchronized {} active stakes for {}", active.len(), account);
        Ok(active)
    }

    async fn read_pool_details(&self, pool: PoolId) -> Result<PoolDetails> {
        require_session(self.session.as_ref())?;

        let (lock_days, apy_bps) = StakingContract::new(self.session.as_ref(), self.staking)
            .get_pool_details(pool)
            .await?;
        Ok(PoolDetails::reconcile(pool, lock_days, apy_bps))
    }

    async fn read_reward(&self, pool: PoolId, stake_index: usize) -> Result<String> {
        require_session(self.session.as_ref())?;
        let account = self.session.account().await?;

        let decimals = TokenContract::new(self.session.as_ref(), self.token)
            .decimals()
            .await?;
        let raw = StakingContract::new(self.session.as_ref(), self.staking)
            .calculate_reward(account, pool, stake_index as u64)
            .await?;
        Ok(format_units(raw, decimals)?)
    }

    fn cache(&self) -> MutexGuard<'_, Vec<UserStake>> {
        self.stakes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
