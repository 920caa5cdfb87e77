//! Static pool table and pool metadata reconciliation
//!
//! Three pools exist, each with a fixed lock duration and a published APY.
//! The staking contract reports its own APY, but the dashboard always shows
//! the published rate: the contract value is read, compared and replaced.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Days per year used by the reward projection
pub const DAYS_PER_YEAR: u64 = 365;

/// Basis points per whole percent, as reported by `getPoolDetails`
pub const BASIS_POINTS_PER_PERCENT: u64 = 100;

/// Published pool parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTerms {
    pub id: PoolId,
    pub lock_duration_days: u64,
    pub apy_percent: u64,
}

/// Pool id -> (lock days, expected APY %)
pub static POOL_TABLE: [PoolTerms; 3] = [
    PoolTerms {
        id: PoolId(0),
        lock_duration_days: 15,
        apy_percent: 50,
    },
    PoolTerms {
        id: PoolId(1),
        lock_duration_days: 30,
        apy_percent: 150,
    },
    PoolTerms {
        id: PoolId(2),
        lock_duration_days: 90,
        apy_percent: 500,
    },
];

/// Identifier of one of the known staking pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PoolId(u8);

impl PoolId {
    pub const FIFTEEN_DAY: PoolId = PoolId(0);
    pub const THIRTY_DAY: PoolId = PoolId(1);
    pub const NINETY_DAY: PoolId = PoolId(2);

    /// All pools in id order
    pub fn all() -> impl Iterator<Item = PoolId> {
        POOL_TABLE.iter().map(|terms| terms.id)
    }

    /// Look up the pool for a lock duration in days (15, 30 or 90)
    pub fn for_lock_days(days: u64) -> Option<PoolId> {
        POOL_TABLE
            .iter()
            .find(|terms| terms.lock_duration_days == days)
            .map(|terms| terms.id)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Published parameters for this pool
    pub fn terms(self) -> &'static PoolTerms {
        &POOL_TABLE[self.0 as usize]
    }
}

impl TryFrom<u8> for PoolId {
    type Error = ClientError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if (id as usize) < POOL_TABLE.len() {
            Ok(PoolId(id))
        } else {
            Err(ClientError::UnknownPool(id))
        }
    }
}

impl From<PoolId> for u8 {
    fn from(id: PoolId) -> u8 {
        id.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pool metadata as displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDetails {
    pub lock_duration_days: u64,
    pub apy_percent: u64,
}

impl PoolDetails {
    /// Static defaults used when the contract cannot be read
    pub fn fallback(pool: PoolId) -> Self {
        let terms = pool.terms();
        Self {
            lock_duration_days: terms.lock_duration_days,
            apy_percent: terms.apy_percent,
        }
    }

    /// Reconcile contract-reported details with the published table
    ///
    /// The lock period is reported as the contract gives it, for display
    /// only; lock status always comes from the table. The APY is always the
    /// published value.
    pub fn reconcile(pool: PoolId, contract_lock_days: u64, contract_apy_bps: u64) -> Self {
        let terms = pool.terms();
        let contract_apy = contract_apy_bps / BASIS_POINTS_PER_PERCENT;

        if contract_apy != terms.apy_percent || contract_apy_bps % BASIS_POINTS_PER_PERCENT != 0 {
            log::debug!(
                "Pool {} contract APY {} bps differs from published {}%, using published",
                pool,
                contract_apy_bps,
                terms.apy_percent
            );
        }
        if contract_lock_days != terms.lock_duration_days {
            log::debug!(
                "Pool {} contract lock period {} days differs from table {} days",
                pool,
                contract_lock_days,
                terms.lock_duration_days
            );
        }

        Self {
            lock_duration_days: contract_lock_days,
            apy_percent: terms.apy_percent,
        }
    }

    pub fn lock_seconds(&self) -> u64 {
        self.lock_duration_days.saturating_mul(SECONDS_PER_DAY)
    }
}
