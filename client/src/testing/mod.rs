//! In-memory chain session for tests and demos
//!
//! `MockChain` plays the wallet, the ERC20 token and the staking contract at
//! once. It keeps balances, allowances and positions, enforces the lock
//! period on withdrawal the way the real contract does, and can be told to
//! fail reads, reject signatures or delay confirmations.

use crate::address::Address;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::pool::{PoolId, SECONDS_PER_DAY, POOL_TABLE};
use crate::session::{CallOutput, ChainSession, ContractCall, RawStake, TxReceipt};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Default chain clock (mid 2025)
pub const GENESIS_TIME: u64 = 1_750_000_000;

const BASIS_POINTS: u128 = 10_000;
const SECONDS_PER_YEAR: u128 = 365 * SECONDS_PER_DAY as u128;

#[derive(Debug)]
struct ChainState {
    connected: bool,
    connection_prompts: usize,
    decimals: u8,
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    positions: HashMap<(Address, PoolId), Vec<RawStake>>,
    /// (lock days, APY basis points) per pool as the contract reports them
    contract_pools: [(u64, u64); 3],
    now: u64,
    block_number: u64,
    failing_reads: HashSet<&'static str>,
    reject_submissions: bool,
    confirmation_delay: Option<Duration>,
    submitted: Vec<ContractCall>,
}

pub struct MockChain {
    user: Address,
    token: Address,
    staking: Address,
    state: Mutex<ChainState>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    /// Connected wallet, 9-decimal token, contract reporting the published rates
    pub fn new() -> Self {
        let mut contract_pools = [(0, 0); 3];
        for (slot, terms) in contract_pools.iter_mut().zip(POOL_TABLE.iter()) {
            *slot = (terms.lock_duration_days, terms.apy_percent * 100);
        }

        Self {
            user: Address::repeat_byte(0x11),
            token: Address::repeat_byte(0xaa),
            staking: Address::repeat_byte(0xbb),
            state: Mutex::new(ChainState {
                connected: true,
                connection_prompts: 0,
                decimals: 9,
                balances: HashMap::new(),
                allowances: HashMap::new(),
                positions: HashMap::new(),
                contract_pools,
                now: GENESIS_TIME,
                block_number: 1,
                failing_reads: HashSet::new(),
                reject_submissions: false,
                confirmation_delay: None,
                submitted: Vec::new(),
            }),
        }
    }

    pub fn with_balance(self, raw: u128) -> Self {
        let user = self.user;
        self.state().balances.insert(user, raw);
        self
    }

    pub fn with_decimals(self, decimals: u8) -> Self {
        self.state().decimals = decimals;
        self
    }

    /// Config pointing at this chain's contracts
    pub fn config(&self) -> Config {
        Config {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31_337,
            token_address: self.token,
            staking_address: self.staking,
        }
    }

    pub fn user(&self) -> Address {
        self.user
    }

    pub fn token_address(&self) -> Address {
        self.token
    }

    pub fn staking_address(&self) -> Address {
        self.staking
    }

    pub fn set_connected(&self, connected: bool) {
        self.state().connected = connected;
    }

    /// Times the wallet-connection prompt was opened
    pub fn connection_prompts(&self) -> usize {
        self.state().connection_prompts
    }

    /// Make every read of `signature` fail with an RPC error
    pub fn fail_reads(&self, signature: &'static str) {
        self.state().failing_reads.insert(signature);
    }

    /// Make the wallet reject every signature request
    pub fn reject_submissions(&self, reject: bool) {
        self.state().reject_submissions = reject;
    }

    /// Hold each transaction this long before it is mined
    pub fn set_confirmation_delay(&self, delay: Duration) {
        self.state().confirmation_delay = Some(delay);
    }

    /// Overwrite what `getPoolDetails` reports for a pool
    pub fn set_contract_pool(&self, pool: PoolId, lock_days: u64, apy_bps: u64) {
        self.state().contract_pools[pool.index() as usize] = (lock_days, apy_bps);
    }

    pub fn set_allowance(&self, raw: u128) {
        let key = (self.user, self.staking);
        self.state().allowances.insert(key, raw);
    }

    pub fn allowance(&self) -> u128 {
        let key = (self.user, self.staking);
        self.state().allowances.get(&key).copied().unwrap_or(0)
    }

    pub fn balance(&self) -> u128 {
        self.state().balances.get(&self.user).copied().unwrap_or(0)
    }

    /// Append a position for the user directly, bypassing token transfers
    pub fn insert_stake(&self, pool: PoolId, stake: RawStake) {
        let user = self.user;
        self.state()
            .positions
            .entry((user, pool))
            .or_default()
            .push(stake);
    }

    pub fn now(&self) -> u64 {
        self.state().now
    }

    pub fn advance(&self, seconds: u64) {
        self.state().now += seconds;
    }

    /// Every transaction the wallet was asked to sign, in order
    pub fn submitted(&self) -> Vec<ContractCall> {
        self.state().submitted.clone()
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_token(&self, state: &ChainState, call: &ContractCall) -> Result<CallOutput> {
        match call {
            ContractCall::Decimals => Ok(CallOutput::Uint(state.decimals as u128)),
            ContractCall::BalanceOf { account } => Ok(CallOutput::Uint(
                state.balances.get(account).copied().unwrap_or(0),
            )),
            ContractCall::Allowance { owner, spender } => Ok(CallOutput::Uint(
                state
                    .allowances
                    .get(&(*owner, *spender))
                    .copied()
                    .unwrap_or(0),
            )),
            _ => Err(unknown_function(call)),
        }
    }

    fn read_staking(&self, state: &ChainState, call: &ContractCall) -> Result<CallOutput> {
        match call {
            ContractCall::GetUserPoolStakes { account, pool } => {
                let apy_bps = state.contract_pools[pool.index() as usize].1;
                let stakes: Vec<RawStake> = state
                    .positions
                    .get(&(*account, *pool))
                    .map(|list| {
                        list.iter()
                            .map(|s| revalue(s, apy_bps, state.now))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(CallOutput::Stakes(stakes))
            }
            ContractCall::GetPoolDetails { pool } => {
                let (lock_period, apy) = state.contract_pools[pool.index() as usize];
                Ok(CallOutput::PoolDetails { lock_period, apy })
            }
            ContractCall::CalculateReward {
                account,
                pool,
                stake_index,
            } => {
                let apy_bps = state.contract_pools[pool.index() as usize].1;
                let stake = state
                    .positions
                    .get(&(*account, *pool))
                    .and_then(|list| list.get(*stake_index as usize))
                    .ok_or_else(|| ClientError::Rpc("execution reverted: invalid stake index".into()))?;
                Ok(CallOutput::Uint(revalue(stake, apy_bps, state.now).rewards))
            }
            _ => Err(unknown_function(call)),
        }
    }

    /// Apply a transaction; false means it was mined but reverted
    fn execute(&self, state: &mut ChainState, contract: Address, call: &ContractCall) -> bool {
        let user = self.user;
        match call {
            ContractCall::Approve { spender, amount } if contract == self.token => {
                state.allowances.insert((user, *spender), *amount);
                true
            }
            ContractCall::Stake { pool, amount } if contract == self.staking => {
                let allowance = state
                    .allowances
                    .get(&(user, self.staking))
                    .copied()
                    .unwrap_or(0);
                let balance = state.balances.get(&user).copied().unwrap_or(0);
                if *amount == 0 || allowance < *amount || balance < *amount {
                    return false;
                }

                state.allowances.insert((user, self.staking), allowance - amount);
                state.balances.insert(user, balance - amount);
                let now = state.now;
                state.positions.entry((user, *pool)).or_default().push(RawStake {
                    amount: *amount,
                    start_time: now,
                    pool_id: pool.index(),
                    rewards: 0,
                    withdrawn: false,
                });
                true
            }
            ContractCall::Withdraw { pool, stake_index } if contract == self.staking => {
                let (lock_days, apy_bps) = state.contract_pools[pool.index() as usize];
                let now = state.now;
                let Some(stake) = state
                    .positions
                    .get_mut(&(user, *pool))
                    .and_then(|list| list.get_mut(*stake_index as usize))
                else {
                    return false;
                };
                if stake.withdrawn || now < stake.start_time + lock_days * SECONDS_PER_DAY {
                    return false;
                }

                let settled = revalue(stake, apy_bps, now);
                stake.withdrawn = true;
                stake.rewards = settled.rewards;
                let payout = settled.amount + settled.rewards;
                *state.balances.entry(user).or_insert(0) += payout;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl ChainSession for MockChain {
    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn request_connection(&self) {
        self.state().connection_prompts += 1;
    }

    async fn account(&self) -> Result<Address> {
        if self.state().connected {
            Ok(self.user)
        } else {
            Err(ClientError::NoSession)
        }
    }

    async fn read(&self, contract: Address, call: ContractCall) -> Result<CallOutput> {
        let state = self.state();
        if state.failing_reads.contains(call.signature()) {
            return Err(ClientError::Rpc(format!("{} timed out", call.signature())));
        }

        if contract == self.token {
            self.read_token(&state, &call)
        } else if contract == self.staking {
            self.read_staking(&state, &call)
        } else {
            Err(ClientError::Rpc(format!("no contract at {}", contract)))
        }
    }

    async fn submit(&self, contract: Address, call: ContractCall) -> Result<TxReceipt> {
        let (connected, delay) = {
            let state = self.state();
            (state.connected, state.confirmation_delay)
        };
        if !connected {
            return Err(ClientError::NoSession);
        }

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        state.submitted.push(call.clone());
        if state.reject_submissions {
            return Err(ClientError::Rejected);
        }

        let success = self.execute(&mut state, contract, &call);
        state.block_number += 1;
        Ok(TxReceipt {
            tx_hash: format!("0x{:064x}", state.block_number),
            block_number: state.block_number,
            success,
        })
    }
}

/// Position with rewards accrued linearly up to `now`
fn revalue(stake: &RawStake, apy_bps: u64, now: u64) -> RawStake {
    if stake.withdrawn {
        return stake.clone();
    }

    let elapsed = now.saturating_sub(stake.start_time) as u128;
    let rewards = stake.amount * apy_bps as u128 * elapsed / (BASIS_POINTS * SECONDS_PER_YEAR);
    RawStake {
        rewards,
        ..stake.clone()
    }
}

fn unknown_function(call: &ContractCall) -> ClientError {
    ClientError::Rpc(format!("execution reverted: {} not found", call.signature()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_enforces_lock() {
        let chain = MockChain::new().with_balance(1_000);
        chain.set_allowance(1_000);
        let staking = chain.staking_address();

        let stake = ContractCall::Stake {
            pool: PoolId::FIFTEEN_DAY,
            amount: 1_000,
        };
        assert!(chain.submit(staking, stake).await.unwrap().success);
        assert_eq!(chain.balance(), 0);

        let withdraw = ContractCall::Withdraw {
            pool: PoolId::FIFTEEN_DAY,
            stake_index: 0,
        };
        assert!(!chain.submit(staking, withdraw.clone()).await.unwrap().success);

        chain.advance(15 * SECONDS_PER_DAY);
        assert!(chain.submit(staking, withdraw).await.unwrap().success);
        assert!(chain.balance() > 1_000);
    }

    #[test]
    fn test_revalue_accrues_linearly() {
        let stake = RawStake {
            amount: 1_000_000,
            start_time: 0,
            pool_id: 1,
            rewards: 0,
            withdrawn: false,
        };
        // 150% for a full year
        let year = 365 * SECONDS_PER_DAY;
        assert_eq!(revalue(&stake, 15_000, year).rewards, 1_500_000);
    }
}
