//! Decimal string <-> smallest-unit conversion
//!
//! Amounts cross the API as human decimal strings ("1.5") and cross the
//! chain as integer smallest units (1.5 USDC = 1_500_000).

use alloy_primitives::U256;

use crate::error::QuoteError;

/// Check that `amount` is a positive decimal number, independent of token
/// precision. Used to reject bad input before any chain call is made.
pub fn check_amount(amount: &str) -> Result<(), QuoteError> {
    let (whole, frac) = split_decimal(amount)?;
    if whole.bytes().chain(frac.bytes()).all(|b| b == b'0') {
        return Err(QuoteError::invalid_amount(amount, "amount must be greater than zero"));
    }
    Ok(())
}

/// Parse a non-negative decimal string into smallest units at `decimals`.
///
/// Rejects signs, exponents, separators and more fractional digits than the
/// token supports. Zero is accepted here; callers decide whether it is a
/// valid quote amount.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, QuoteError> {
    let (whole, frac) = split_decimal(amount)?;

    if frac.len() > decimals as usize {
        return Err(QuoteError::invalid_amount(
            amount,
            format!("too many decimal places (token has {})", decimals),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(frac);
    digits.extend(std::iter::repeat('0').take(decimals as usize - frac.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|_| QuoteError::invalid_amount(amount, "amount overflows uint256"))
}

/// Split into whole and fractional digit runs, rejecting anything that is
/// not a plain unsigned decimal
fn split_decimal(amount: &str) -> Result<(&str, &str), QuoteError> {
    let trimmed = amount.trim();

    if trimmed.is_empty() {
        return Err(QuoteError::invalid_amount(amount, "amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(QuoteError::invalid_amount(amount, "amount must not be negative"));
    }

    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(QuoteError::invalid_amount(amount, "amount has no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuoteError::invalid_amount(amount, "amount is not a decimal number"));
    }

    Ok((whole, frac))
}

/// Format smallest units as a decimal string at `decimals`.
///
/// Trailing zeros are trimmed but one fractional digit is always kept:
/// `1_000_000` at 6 decimals is `"1.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = decimals as usize;

    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };

    let split = padded.len() - decimals;
    let (whole, frac) = padded.split_at(split);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, frac)
    }
}
