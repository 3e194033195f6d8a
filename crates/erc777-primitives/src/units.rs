//! Conversion between human-readable token amounts and base units.
//!
//! Token amounts on chain are integers scaled by `10^decimals`. Test
//! scenarios are written in human units ("10", "1.12"), so every value goes
//! through [`parse_units`] before it reaches a contract and through
//! [`format_units`] before it reaches a log line.

use primitive_types::U256;
use thiserror::Error;

/// Decimals used by ether and by every ERC-777 token
pub const ETHER_DECIMALS: u32 = 18;

/// Largest power of ten that fits in a U256
const MAX_DECIMALS: u32 = 77;

/// Amount conversion error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    /// Input is empty or only a decimal point
    #[error("empty amount")]
    Empty,
    /// Input contains something other than digits and one decimal point
    #[error("invalid amount: {0}")]
    InvalidDigits(String),
    /// Negative amounts cannot be represented
    #[error("negative amount: {0}")]
    Negative(String),
    /// More fractional digits than the unit supports
    #[error("too many decimal places in {value}: at most {decimals} allowed")]
    TooManyDecimals {
        /// Offending input
        value: String,
        /// Decimals of the unit
        decimals: u32,
    },
    /// Result does not fit in 256 bits
    #[error("amount overflows uint256: {0}")]
    Overflow(String),
    /// Decimals beyond what a uint256 can scale
    #[error("unsupported decimals: {0}")]
    UnsupportedDecimals(u32),
}

fn scale(decimals: u32) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    Ok(U256::from(10u64).pow(U256::from(decimals)))
}

/// Parse a decimal string such as `"1.12"` into base units.
pub fn parse_units(value: &str, decimals: u32) -> Result<U256, UnitsError> {
    let trimmed = value.trim();
    if trimmed.starts_with('-') {
        return Err(UnitsError::Negative(value.to_string()));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::Empty);
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::InvalidDigits(value.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            value: value.to_string(),
            decimals,
        });
    }

    let overflow = || UnitsError::Overflow(value.to_string());
    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| overflow())?
    };
    let fraction = if fraction.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        U256::from_dec_str(&padded).map_err(|_| overflow())?
    };

    whole
        .checked_mul(scale(decimals)?)
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or_else(overflow)
}

/// Parse an ether-denominated string into wei (18 decimals).
pub fn to_wei(value: &str) -> Result<U256, UnitsError> {
    parse_units(value, ETHER_DECIMALS)
}

/// Format base units as a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u32) -> String {
    let Ok(divisor) = scale(decimals) else {
        return value.to_string();
    };
    let whole = value / divisor;
    let remainder = value % divisor;
    if remainder.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
