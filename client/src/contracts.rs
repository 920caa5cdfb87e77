//! Typed wrappers for the token and staking contracts
//!
//! These build [`ContractCall`]s, route them through the session and decode
//! the outputs. Errors propagate; catching them is the caller's job.

use crate::address::Address;
use crate::error::{ClientError, Result};
use crate::pool::PoolId;
use crate::session::{CallOutput, ChainSession, ContractCall, RawStake, TxReceipt};

/// ERC20 token bound to a session
pub struct TokenContract<'a, S: ChainSession + ?Sized> {
    session: &'a S,
    address: Address,
}

impl<'a, S: ChainSession + ?Sized> TokenContract<'a, S> {
    pub fn new(session: &'a S, address: Address) -> Self {
        Self { session, address }
    }

    pub async fn decimals(&self) -> Result<u8> {
        let call = ContractCall::Decimals;
        let value = expect_uint(call.signature(), self.session.read(self.address, call).await?)?;
        u8::try_from(value).map_err(|_| ClientError::UnexpectedOutput {
            call: "decimals()",
            expected: "uint8",
        })
    }

    pub async fn balance_of(&self, account: Address) -> Result<u128> {
        let call = ContractCall::BalanceOf { account };
        expect_uint(call.signature(), self.session.read(self.address, call).await?)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<u128> {
        let call = ContractCall::Allowance { owner, spender };
        expect_uint(call.signature(), self.session.read(self.address, call).await?)
    }

    pub async fn approve(&self, spender: Address, amount: u128) -> Result<TxReceipt> {
        send_and_confirm(
            self.session,
            self.address,
            ContractCall::Approve { spender, amount },
        )
        .await
    }
}

/// Staking contract bound to a session
pub struct StakingContract<'a, S: ChainSession + ?Sized> {
    session: &'a S,
    address: Address,
}

impl<'a, S: ChainSession + ?Sized> StakingContract<'a, S> {
    pub fn new(session: &'a S, address: Address) -> Self {
        Self { session, address }
    }

    pub async fn stake(&self, pool: PoolId, amount: u128) -> Result<TxReceipt> {
        send_and_confirm(self.session, self.address, ContractCall::Stake { pool, amount }).await
    }

    pub async fn withdraw(&self, pool: PoolId, stake_index: u64) -> Result<TxReceipt> {
        send_and_confirm(
            self.session,
            self.address,
            ContractCall::Withdraw { pool, stake_index },
        )
        .await
    }

    pub async fn get_user_pool_stakes(&self, account: Address, pool: PoolId) -> Result<Vec<RawStake>> {
        let call = ContractCall::GetUserPoolStakes { account, pool };
        match self.session.read(self.address, call).await? {
            CallOutput::Stakes(stakes) => Ok(stakes),
            _ => Err(ClientError::UnexpectedOutput {
                call: "getUserPoolStakes(address,uint256)",
                expected: "Stake[]",
            }),
        }
    }

    /// Returns (lock period in days, APY in basis points)
    pub async fn get_pool_details(&self, pool: PoolId) -> Result<(u64, u64)> {
        let call = ContractCall::GetPoolDetails { pool };
        match self.session.read(self.address, call).await? {
            CallOutput::PoolDetails { lock_period, apy } => Ok((lock_period, apy)),
            _ => Err(ClientError::UnexpectedOutput {
                call: "getPoolDetails(uint256)",
                expected: "(uint256,uint256)",
            }),
        }
    }

    pub async fn calculate_reward(&self, account: Address, pool: PoolId, stake_index: u64) -> Result<u128> {
        let call = ContractCall::CalculateReward {
            account,
            pool,
            stake_index,
        };
        expect_uint(call.signature(), self.session.read(self.address, call).await?)
    }
}

/// Submit a transaction and turn a reverted receipt into an error
async fn send_and_confirm<S: ChainSession + ?Sized>(
    session: &S,
    contract: Address,
    call: ContractCall,
) -> Result<TxReceipt> {
    let signature = call.signature();
    log::info!("Submitting {} to {}", signature, contract);

    let receipt = session.submit(contract, call).await?;
    if !receipt.success {
        return Err(ClientError::Reverted {
            tx_hash: receipt.tx_hash,
        });
    }

    log::info!(
        "{} confirmed in block {} ({})",
        signature,
        receipt.block_number,
        receipt.tx_hash
    );
    Ok(receipt)
}

fn expect_uint(call: &'static str, output: CallOutput) -> Result<u128> {
    match output {
        CallOutput::Uint(value) => Ok(value),
        _ => Err(ClientError::UnexpectedOutput {
            call,
            expected: "uint256",
        }),
    }
}
