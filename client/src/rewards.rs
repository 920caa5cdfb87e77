//! Reward projection shown before a stake exists
//!
//! Simple interest over the full lock: `principal * apy/100 * days/365`.
//! This is a preview only. The contract accrues rewards with its own formula
//! and nothing here feeds an on-chain call.

use crate::error::UnitsError;
use crate::pool::{PoolDetails, PoolId, DAYS_PER_YEAR};
use crate::units::{format_rounded, parse_units};

/// Fixed-point precision used for previews, independent of the token
pub const PREVIEW_DECIMALS: u8 = 18;

/// Decimal places shown for a preview
pub const PREVIEW_PLACES: u8 = 2;

/// Projected reward in raw preview units (18 decimals)
pub fn projected_reward_raw(principal_raw: u128, details: PoolDetails) -> Result<u128, UnitsError> {
    let numerator = principal_raw
        .checked_mul(details.apy_percent as u128)
        .and_then(|v| v.checked_mul(details.lock_duration_days as u128))
        .ok_or(UnitsError::Overflow)?;

    Ok(numerator / (100 * DAYS_PER_YEAR as u128))
}

/// Projected reward for a human amount, rounded to two places
///
/// Fractional digits past the preview precision are dropped, not rejected.
pub fn estimate_reward(amount: &str, details: PoolDetails) -> Result<String, UnitsError> {
    let principal = parse_units(truncate_fraction(amount, PREVIEW_DECIMALS), PREVIEW_DECIMALS)?;
    let reward = projected_reward_raw(principal, details)?;
    format_rounded(reward, PREVIEW_DECIMALS, PREVIEW_PLACES)
}

fn truncate_fraction(amount: &str, places: u8) -> &str {
    let amount = amount.trim();
    match amount.find('.') {
        Some(dot) => amount.get(..dot + 1 + places as usize).unwrap_or(amount),
        None => amount,
    }
}

/// Preview for the stake form: published pool rates, "0.00" on bad input
pub fn preview_reward(amount: &str, pool: PoolId) -> String {
    estimate_reward(amount, PoolDetails::fallback(pool)).unwrap_or_else(|_| "0.00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_day_pool_projection() {
        // 1000 * 1.5 * 30/365 = 123.287...
        assert_eq!(preview_reward("1000", PoolId::THIRTY_DAY), "123.29");
    }

    #[test]
    fn test_other_pools() {
        // 1000 * 0.5 * 15/365 = 20.547...
        assert_eq!(preview_reward("1000", PoolId::FIFTEEN_DAY), "20.55");
        // 100 * 5 * 90/365 = 123.287...
        assert_eq!(preview_reward("100", PoolId::NINETY_DAY), "123.29");
    }

    #[test]
    fn test_bad_input_previews_zero() {
        assert_eq!(preview_reward("", PoolId::THIRTY_DAY), "0.00");
        assert_eq!(preview_reward("abc", PoolId::THIRTY_DAY), "0.00");
        assert_eq!(preview_reward("-5", PoolId::THIRTY_DAY), "0.00");
        assert_eq!(preview_reward("0", PoolId::NINETY_DAY), "0.00");
    }

    #[test]
    fn test_extra_precision_truncated() {
        assert_eq!(preview_reward("1000.0000000000000000001", PoolId::THIRTY_DAY), "123.29");
        assert_eq!(preview_reward(" 1000.999999999999999999999 ", PoolId::THIRTY_DAY), "123.41");
        assert_eq!(preview_reward("0.0000000000000000001", PoolId::THIRTY_DAY), "0.00");
        assert_eq!(preview_reward("1000.12345678901234567x", PoolId::THIRTY_DAY), "0.00");
    }

    #[test]
    fn test_custom_details() {
        let details = PoolDetails {
            lock_duration_days: 365,
            apy_percent: 10,
        };
        assert_eq!(estimate_reward("250.5", details).unwrap(), "25.05");
    }
}
