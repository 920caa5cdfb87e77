//! SFT Staking Client
//!
//! Interaction layer for the SFT staking dashboard. Talks to the ERC20 token
//! and the staking contract through an injected wallet session, tracks
//! approval state, enumerates positions across the three reward pools and
//! submits stake, approve and withdraw transactions.
//!
//! Every public operation on [`ApprovalManager`], [`StakeController`] and
//! [`StakingDashboard`] returns a definite result (`bool`, a display string
//! or a list) instead of an error. Failures are logged and mapped to a safe
//! default; a missing wallet additionally opens the connection prompt.
//!
//! # Example
//!
//! ```ignore
//! use sft_staking_client::{Config, PoolId, StakingDashboard, StakeOutcome};
//!
//! let dashboard = StakingDashboard::new(session, &Config::load_or_default());
//! let balance = dashboard.approvals().get_balance().await;
//! let preview = dashboard.preview("1000", PoolId::THIRTY_DAY); // "123.29"
//!
//! if dashboard.stake("1000", PoolId::THIRTY_DAY).await == StakeOutcome::Staked {
//!     let board = dashboard.refresh_board().await;
//! }
//! ```

pub mod address;
pub mod allowance;
pub mod config;
pub mod contracts;
pub mod dashboard;
pub mod error;
pub mod inflight;
pub mod lifecycle;
pub mod pool;
pub mod rewards;
pub mod session;
pub mod stake;
pub mod units;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use address::Address;
pub use allowance::ApprovalManager;
pub use config::Config;
pub use dashboard::{LockedStake, StakeBoard, StakeOutcome, StakingDashboard};
pub use error::{ClientError, Result, UnitsError};
pub use inflight::InFlight;
pub use lifecycle::StakeController;
pub use pool::{PoolDetails, PoolId};
pub use session::{CallOutput, ChainSession, ContractCall, RawStake, TxReceipt};
pub use stake::{LockStatus, UserStake};

/// Initialize logging from `RUST_LOG`, defaulting to `info`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
