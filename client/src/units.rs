//! Exact conversion between human decimal strings and raw token units
//!
//! All on-chain amounts are integers scaled by the token's `decimals`.
//! Conversions here never go through floating point: a human amount with at
//! most `decimals` fractional digits maps to exactly one raw value and back.

use crate::error::UnitsError;

/// Largest decimals value whose scale fits in a u128 (10^38)
pub const MAX_DECIMALS: u8 = 38;

/// 10^decimals as u128
pub fn scale(decimals: u8) -> Result<u128, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    Ok(10u128.pow(decimals as u32))
}

/// Parse a human decimal string ("12.5") into raw units
///
/// Trailing fractional zeros beyond the token resolution are accepted
/// ("1.500" with 1 decimal), any other extra precision is rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u128, UnitsError> {
    let unit = scale(decimals)?;
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Empty);
    }
    if let Some(c) = whole.chars().chain(fraction.chars()).find(|c| !c.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit(c));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            found: fraction.len(),
            decimals,
        });
    }

    let whole_units = parse_digits(whole)?
        .checked_mul(unit)
        .ok_or(UnitsError::Overflow)?;

    let fraction_units = if fraction.is_empty() {
        0
    } else {
        // Fraction length <= decimals, so the remaining scale always exists
        let pad = scale(decimals - fraction.len() as u8)?;
        parse_digits(fraction)?
            .checked_mul(pad)
            .ok_or(UnitsError::Overflow)?
    };

    whole_units
        .checked_add(fraction_units)
        .ok_or(UnitsError::Overflow)
}

/// Format raw units as a human decimal string
///
/// Trailing zeros are trimmed but at least one fractional digit is kept
/// ("100.0", "12.5"). With zero decimals the integer is returned as is.
pub fn format_units(raw: u128, decimals: u8) -> Result<String, UnitsError> {
    let unit = scale(decimals)?;
    if decimals == 0 {
        return Ok(raw.to_string());
    }

    let whole = raw / unit;
    let fraction = raw % unit;
    let digits = format!("{:0width$}", fraction, width = decimals as usize);
    let trimmed = digits.trim_end_matches('0');
    let fraction_str = if trimmed.is_empty() { "0" } else { trimmed };

    Ok(format!("{}.{}", whole, fraction_str))
}

/// Format raw units rounded half-up to a fixed number of places ("123.29")
pub fn format_rounded(raw: u128, decimals: u8, places: u8) -> Result<String, UnitsError> {
    let unit = scale(decimals)?;

    if places >= decimals {
        let whole = raw / unit;
        let mut fraction = if decimals == 0 {
            String::new()
        } else {
            format!("{:0width$}", raw % unit, width = decimals as usize)
        };
        for _ in decimals..places {
            fraction.push('0');
        }
        return Ok(if places == 0 {
            whole.to_string()
        } else {
            format!("{}.{}", whole, fraction)
        });
    }

    let dropped = scale(decimals - places)?;
    let mut rounded = raw / dropped;
    let remainder = raw % dropped;
    if remainder >= dropped - remainder {
        rounded += 1;
    }

    let place_unit = scale(places)?;
    let whole = rounded / place_unit;
    if places == 0 {
        return Ok(whole.to_string());
    }
    Ok(format!(
        "{}.{:0width$}",
        whole,
        rounded % place_unit,
        width = places as usize
    ))
}

/// Whether a human decimal string names an amount above zero
///
/// Checks the shape only ("12.5", ".5", "3."); no token scale is applied, so
/// any whole part is accepted regardless of the token's decimals.
pub fn is_positive(amount: &str) -> bool {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return false;
    }

    let mut digits = whole.bytes().chain(fraction.bytes());
    digits.clone().all(|b| b.is_ascii_digit()) && digits.any(|b| b != b'0')
}

fn parse_digits(digits: &str) -> Result<u128, UnitsError> {
    digits.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as u128))
            .ok_or(UnitsError::Overflow)
    })
}
