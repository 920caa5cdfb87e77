//! Display model for staking positions and their lock status

use crate::error::Result;
use crate::pool::{PoolDetails, PoolId, SECONDS_PER_DAY};
use crate::session::RawStake;
use crate::units::format_units;
use serde::{Deserialize, Serialize};

/// Whether a position can be withdrawn yet
///
/// Advisory only: the contract enforces the lock, the client never refuses a
/// withdrawal on this basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LockStatus {
    Locked { unlocks_at: u64 },
    Unlocked,
}

/// Locked iff `now < start_time + lock_days * 86400`
pub fn lock_status(start_time: u64, lock_duration_days: u64, now: u64) -> LockStatus {
    let unlocks_at = unlock_time(start_time, lock_duration_days);
    if now < unlocks_at {
        LockStatus::Locked { unlocks_at }
    } else {
        LockStatus::Unlocked
    }
}

pub fn unlock_time(start_time: u64, lock_duration_days: u64) -> u64 {
    start_time.saturating_add(lock_duration_days.saturating_mul(SECONDS_PER_DAY))
}

/// An active position of the connected account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStake {
    pub pool_id: PoolId,
    /// Position within the pool's list for this account
    pub stake_index: usize,
    pub amount: String,
    pub amount_raw: u128,
    pub start_time: u64,
    pub rewards: String,
    pub rewards_raw: u128,
    pub withdrawn: bool,
    pub apy_percent: u64,
    /// Published lock of the pool; the contract-reported period is not used
    pub lock_duration_days: u64,
}

impl UserStake {
    /// Convert a contract position into display units
    pub fn from_raw(
        raw: &RawStake,
        pool_id: PoolId,
        stake_index: usize,
        details: PoolDetails,
        decimals: u8,
    ) -> Result<Self> {
        if raw.pool_id != pool_id.index() {
            log::warn!(
                "Stake {} listed under pool {} reports pool {}",
                stake_index,
                pool_id,
                raw.pool_id
            );
        }

        Ok(Self {
            pool_id,
            stake_index,
            amount: format_units(raw.amount, decimals)?,
            amount_raw: raw.amount,
            start_time: raw.start_time,
            rewards: format_units(raw.rewards, decimals)?,
            rewards_raw: raw.rewards,
            withdrawn: raw.withdrawn,
            apy_percent: details.apy_percent,
            lock_duration_days: pool_id.terms().lock_duration_days,
        })
    }

    /// Unlock timestamp from the pool table
    pub fn unlock_time(&self) -> u64 {
        unlock_time(self.start_time, self.pool_id.terms().lock_duration_days)
    }

    pub fn lock_status(&self, now: u64) -> LockStatus {
        lock_status(self.start_time, self.pool_id.terms().lock_duration_days, now)
    }

    pub fn is_locked(&self, now: u64) -> bool {
        matches!(self.lock_status(now), LockStatus::Locked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_750_000_000;

    fn raw_stake(pool_id: u8, start_time: u64) -> RawStake {
        RawStake {
            amount: 12_500_000_000,
            start_time,
            pool_id,
            rewards: 250_000_000,
            withdrawn: false,
        }
    }

    #[test]
    fn test_twenty_day_old_stake() {
        let start = NOW - 20 * SECONDS_PER_DAY;

        // 15 day pool has unlocked
        assert_eq!(lock_status(start, 15, NOW), LockStatus::Unlocked);

        // 30 day pool still locked for ten more days
        assert_eq!(
            lock_status(start, 30, NOW),
            LockStatus::Locked {
                unlocks_at: NOW + 10 * SECONDS_PER_DAY
            }
        );
    }

    #[test]
    fn test_unlocks_exactly_at_boundary() {
        let start = NOW - 15 * SECONDS_PER_DAY;
        assert_eq!(lock_status(start, 15, NOW), LockStatus::Unlocked);
        assert!(matches!(
            lock_status(start + 1, 15, NOW),
            LockStatus::Locked { .. }
        ));
    }

    #[test]
    fn test_from_raw_formats_amounts() {
        let details = PoolDetails::fallback(PoolId::THIRTY_DAY);
        let stake = UserStake::from_raw(&raw_stake(1, NOW), PoolId::THIRTY_DAY, 3, details, 9).unwrap();

        assert_eq!(stake.amount, "12.5");
        assert_eq!(stake.rewards, "0.25");
        assert_eq!(stake.stake_index, 3);
        assert_eq!(stake.apy_percent, 150);
        assert_eq!(stake.unlock_time(), NOW + 30 * SECONDS_PER_DAY);
        assert!(stake.is_locked(NOW));
    }

    #[test]
    fn test_lock_ignores_contract_period() {
        // Contract reporting the 90 day lock in seconds, then as zero
        for contract_lock in [7_776_000, 0] {
            let details = PoolDetails::reconcile(PoolId::NINETY_DAY, contract_lock, 50_000);
            let stake =
                UserStake::from_raw(&raw_stake(2, NOW), PoolId::NINETY_DAY, 0, details, 9).unwrap();

            assert_eq!(stake.lock_duration_days, 90);
            assert_eq!(stake.unlock_time(), NOW + 90 * SECONDS_PER_DAY);
            assert!(stake.is_locked(NOW));
            assert!(!stake.is_locked(NOW + 91 * SECONDS_PER_DAY));
        }
    }

    #[test]
    fn test_lock_status_json() {
        let json = serde_json::to_string(&LockStatus::Locked { unlocks_at: 5 }).unwrap();
        assert_eq!(json, r#"{"status":"locked","unlocks_at":5}"#);
    }
}
