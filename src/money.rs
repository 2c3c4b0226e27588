//! Money Conversion Module
//!
//! Conversion between base-unit integers and display-unit decimals. Every
//! scaling operation in the crate MUST go through this module.
//!
//! ## Design Principles
//! 1. Exact arbitrary-precision arithmetic only: `BigDecimal` / `BigInt`,
//!    never `f64` and never a fixed-width decimal
//! 2. Explicit Error Handling: No silent truncation
//! 3. Scaling only moves the exponent, so it never rounds and never overflows
//!
//! ## Representation
//! - Display units: `BigDecimal` (e.g. `0.015` BTC)
//! - Base units: `BigInt`, display value scaled by `10^decimals`
//! - The authoritative source for `decimals` is the `AssetRegistry`
//!
//! ## Usage
//! ```rust
//! use asset_amount::money::{format_decimal, parse_display_amount, scale_up, to_integer};
//! use num_bigint::BigInt;
//!
//! // Client sends "1.5" BTC
//! let amount = parse_display_amount("1.5").unwrap();
//! let units = to_integer(&scale_up(&amount, 8)).unwrap();
//! assert_eq!(units, Some(BigInt::from(150_000_000))); // 1.5 BTC = 150M satoshi
//!
//! // Display to client, truncated to 4 digits
//! assert_eq!(format_decimal(&amount, 4), "1.5000");
//! ```

use crate::core_types::{AssetCode, BaseUnits, DecimalDigits};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use thiserror::Error;

/// Largest power of ten materialised when turning a decimal into an integer.
///
/// Real assets stay far below this; the bound keeps a hostile exponent from
/// allocating gigabytes.
pub const MAX_POW10: u32 = 4096;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(AssetCode),

    #[error("Amount is absent")]
    AmountAbsent,

    #[error("Asset mismatch: {left} vs {right}")]
    AssetMismatch { left: String, right: String },
}

// ============================================================================
// Scaling: Display ↔ Base Units (exact)
// ============================================================================

/// Multiply a display amount by `10^decimals`.
///
/// The result is still a decimal: a fractional part means the amount has
/// more fractional digits than the asset allows.
pub fn scale_up(amount: &BigDecimal, decimals: DecimalDigits) -> BigDecimal {
    let (digits, scale) = amount.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - i64::from(decimals))
}

/// Divide a base-unit integer by `10^decimals`. Exact for every input.
pub fn scale_down(units: &BaseUnits, decimals: DecimalDigits) -> BigDecimal {
    BigDecimal::new(units.clone(), i64::from(decimals))
}

fn pow10(exp: i64) -> Result<BigInt, MoneyError> {
    let exp = u32::try_from(exp).map_err(|_| MoneyError::Overflow)?;
    if exp > MAX_POW10 {
        return Err(MoneyError::Overflow);
    }
    Ok(BigInt::from(10u32).pow(exp))
}

/// Split a decimal into its integer part (truncated toward zero) and the
/// remainder in units of its last digit.
fn split_integer(value: &BigDecimal) -> Result<(BigInt, BigInt), MoneyError> {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale <= 0 {
        return Ok((digits * pow10(-scale)?, BigInt::from(0u32)));
    }
    // BigInt division truncates toward zero
    Ok(digits.div_rem(&pow10(scale)?))
}

/// Integer value of `value`, or `None` when it has a fractional part.
///
/// # Errors
/// * `Overflow` - exponent beyond [`MAX_POW10`]
pub fn to_integer(value: &BigDecimal) -> Result<Option<BigInt>, MoneyError> {
    let (integer, remainder) = split_integer(value)?;
    Ok((remainder.sign() == Sign::NoSign).then_some(integer))
}

/// `value` truncated toward zero.
pub fn truncate(value: &BigDecimal) -> Result<BigDecimal, MoneyError> {
    let (integer, _) = split_integer(value)?;
    Ok(BigDecimal::from(integer))
}

/// True when truncating `value` toward zero changes it.
///
/// Never fails: a non-positive scale is always integral, and a scale too
/// large to materialise leaves a remainder for any non-zero mantissa.
pub fn has_fraction(value: &BigDecimal) -> bool {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale <= 0 || digits.sign() == Sign::NoSign {
        return false;
    }
    match truncate(value) {
        Ok(truncated) => truncated != *value,
        Err(_) => true,
    }
}

/// Number of significant fractional digits (trailing zeros ignored).
pub fn fractional_digits(value: &BigDecimal) -> u32 {
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    u32::try_from(scale.max(0)).unwrap_or(u32::MAX)
}

// ============================================================================
// Parse: Client → Display amount
// ============================================================================

/// Parse a client-typed amount string strictly.
///
/// Accepts `123`, `0.5`, `-1.25`. Rejects:
/// - empty strings, `+` prefix
/// - `.5` (must be `0.5`) and `5.` (must be `5` or `5.0`)
/// - scientific notation, separators, whitespace inside the number
///
/// The digits are kept exactly: precision is judged later against the asset.
pub fn parse_display_amount(amount_str: &str) -> Result<BigDecimal, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if amount_str.starts_with('+') {
        return Err(MoneyError::InvalidFormat("+ prefix not allowed".into()));
    }

    let (negative, unsigned) = match amount_str.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount_str),
    };

    let (whole, frac) = match unsigned.split_once('.') {
        None => (unsigned, ""),
        Some((whole, frac)) => {
            if whole.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if frac.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            (whole, frac)
        }
    };

    if whole.is_empty() {
        return Err(MoneyError::InvalidFormat("missing digits".into()));
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "only digits and one decimal point allowed: {}",
            amount_str
        )));
    }

    let sign = if negative { "-" } else { "" };
    let digits: BigInt = format!("{}{}{}", sign, whole, frac)
        .parse()
        .map_err(|_| MoneyError::InvalidFormat(amount_str.to_string()))?;
    Ok(BigDecimal::new(digits, frac.len() as i64))
}

// ============================================================================
// Format: Display amount → Client
// ============================================================================

/// Render with exactly `display_decimals` digits, truncating toward zero.
///
/// Truncation, never rounding up, so a displayed balance is never larger
/// than the real one.
pub fn format_decimal(value: &BigDecimal, display_decimals: u32) -> String {
    let shifted = scale_up(value, display_decimals);
    match truncate(&shifted) {
        Ok(truncated) => {
            let (digits, _) = truncated.as_bigint_and_exponent();
            BigDecimal::new(digits, i64::from(display_decimals)).to_plain_string()
        }
        Err(_) => value.to_plain_string(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
