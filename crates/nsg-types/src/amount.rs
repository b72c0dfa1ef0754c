//! # Fixed-Point Amounts
//!
//! The node reports every amount as an integer in the smallest unit. Wallet
//! records carry decimal strings: the integer shifted right by the currency's
//! decimal exponent, trailing zeros trimmed.
//!
//! | Raw | Decimals | Rendered |
//! |-----|----------|----------|
//! | `500000` | 8 | `0.005` |
//! | `100000000` | 8 | `1` |
//! | `1234` | 2 | `12.34` |
//! | `0` | 8 | `0` |

use crate::errors::AmountError;

/// Render an integer amount with `decimals` fractional digits.
pub fn format_units(value: u128, decimals: u32) -> String {
    shift_digits(&value.to_string(), decimals)
}

/// Render an integer amount given as a string (asset amounts and balances
/// arrive this way) with `decimals` fractional digits.
pub fn scale_raw_amount(raw: &str, decimals: u32) -> Result<String, AmountError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AmountError::Empty);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotAnInteger(raw.to_string()));
    }

    let digits = raw.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    Ok(shift_digits(digits, decimals))
}

fn shift_digits(digits: &str, decimals: u32) -> String {
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits.to_string();
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits.to_string()
    };

    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}
