//! Wallet/chain session seam
//!
//! The client never discovers wallets or speaks JSON-RPC itself. A front end
//! injects a [`ChainSession`] that knows whether a wallet is connected, can
//! prompt for a connection, reads contract state and submits transactions.

use crate::address::Address;
use crate::error::{ClientError, Result};
use crate::pool::PoolId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A contract function invocation with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    // ERC20
    Decimals,
    BalanceOf { account: Address },
    Allowance { owner: Address, spender: Address },
    Approve { spender: Address, amount: u128 },

    // Staking contract
    Stake { pool: PoolId, amount: u128 },
    Withdraw { pool: PoolId, stake_index: u64 },
    GetUserPoolStakes { account: Address, pool: PoolId },
    GetPoolDetails { pool: PoolId },
    CalculateReward {
        account: Address,
        pool: PoolId,
        stake_index: u64,
    },
}

impl ContractCall {
    /// Solidity signature of the invoked function
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::Decimals => "decimals()",
            ContractCall::BalanceOf { .. } => "balanceOf(address)",
            ContractCall::Allowance { .. } => "allowance(address,address)",
            ContractCall::Approve { .. } => "approve(address,uint256)",
            ContractCall::Stake { .. } => "stake(uint256,uint256)",
            ContractCall::Withdraw { .. } => "withdraw(uint256,uint256)",
            ContractCall::GetUserPoolStakes { .. } => "getUserPoolStakes(address,uint256)",
            ContractCall::GetPoolDetails { .. } => "getPoolDetails(uint256)",
            ContractCall::CalculateReward { .. } => "calculateReward(address,uint256,uint256)",
        }
    }

    /// True for state-changing calls that need a signed transaction
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            ContractCall::Approve { .. } | ContractCall::Stake { .. } | ContractCall::Withdraw { .. }
        )
    }
}

/// One position as returned by `getUserPoolStakes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStake {
    pub amount: u128,
    pub start_time: u64,
    pub pool_id: u8,
    pub rewards: u128,
    pub withdrawn: bool,
}

/// Decoded return value of a read call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutput {
    Uint(u128),
    Stakes(Vec<RawStake>),
    PoolDetails { lock_period: u64, apy: u64 },
}

/// Receipt of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    /// False when the transaction was mined but reverted
    pub success: bool,
}

/// Connection to a wallet and the chain behind it
#[async_trait]
pub trait ChainSession: Send + Sync {
    /// Whether a wallet is currently connected
    fn is_connected(&self) -> bool;

    /// Open the wallet-connection prompt
    fn request_connection(&self);

    /// Address of the current signer
    async fn account(&self) -> Result<Address>;

    /// Execute a read-only call against `contract`
    async fn read(&self, contract: Address, call: ContractCall) -> Result<CallOutput>;

    /// Sign and submit a transaction, then wait until it is mined
    async fn submit(&self, contract: Address, call: ContractCall) -> Result<TxReceipt>;
}

/// Require a connected wallet, prompting for one otherwise
pub fn require_session<S: ChainSession + ?Sized>(session: &S) -> Result<()> {
    if session.is_connected() {
        Ok(())
    } else {
        log::info!("No wallet connected, requesting connection");
        session.request_connection();
        Err(ClientError::NoSession)
    }
}
