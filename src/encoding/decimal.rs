//! # Exact Decimal Arithmetic Helpers
//!
//! RowBinary decimals are scaled integers: the wire value is
//! `value * 10^scale` stored in a fixed width selected from the declared
//! precision. Everything here stays in integer space; no conversion path
//! touches floating point, so `decimal(19,15)` round-trips
//! `1234567890.123456789012345` without drift.
//!
//! ## Width Selection
//!
//! | Precision | Width | Wire bytes |
//! |-----------|-------|------------|
//! | 1..=9 | 32-bit | 4 |
//! | 10..=18 | 64-bit | 8 |
//! | 19..=38 | 128-bit | 16 |
//! | 39..=76 | 256-bit | 32 |

use crate::error::{Error, Result};
use num_bigint::BigInt;

/// Wire width of a decimal column, selected from declared precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalWidth {
    W32,
    W64,
    W128,
    W256,
}

impl DecimalWidth {
    /// Threshold rule for the generic `Decimal(P, S)` tag.
    pub fn from_precision(precision: u32) -> DecimalWidth {
        match precision {
            0..=9 => DecimalWidth::W32,
            10..=18 => DecimalWidth::W64,
            19..=38 => DecimalWidth::W128,
            _ => DecimalWidth::W256,
        }
    }
}

/// Renders a scaled integer as a decimal string, exactly.
pub fn format_decimal(digits: i128, scale: u32) -> String {
    if scale == 0 {
        return digits.to_string();
    }
    let divisor = 10i128.pow(scale);
    let sign = if digits < 0 { "-" } else { "" };
    let magnitude = digits.unsigned_abs();
    let int_part = magnitude / divisor.unsigned_abs();
    let frac_part = magnitude % divisor.unsigned_abs();
    format!("{sign}{int_part}.{frac_part:0>width$}", width = scale as usize)
}

/// Renders a 256-bit scaled integer as a decimal string, exactly.
pub fn format_big_decimal(digits: &BigInt, scale: u32) -> String {
    if scale == 0 {
        return digits.to_string();
    }
    let divisor = BigInt::from(10).pow(scale);
    let sign = if digits.sign() == num_bigint::Sign::Minus {
        "-"
    } else {
        ""
    };
    let magnitude = digits.magnitude();
    let (int_part, frac_part) = (
        BigInt::from(magnitude.clone()) / &divisor,
        BigInt::from(magnitude.clone()) % &divisor,
    );
    format!(
        "{sign}{int_part}.{frac_part:0>width$}",
        width = scale as usize
    )
}

/// Parses a decimal string into a scaled integer at exactly `scale`.
///
/// More fractional digits than the scale allows is a conversion error,
/// not a silent rounding; fewer digits are zero-padded.
pub fn parse_decimal(text: &str, scale: u32) -> Result<BigInt> {
    let text = text.trim();
    let err = || Error::Conversion {
        from: "string",
        to: format!("decimal with scale {scale}"),
    };

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_text, frac_text) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if int_text.is_empty() && frac_text.is_empty() {
        return Err(err());
    }
    if !int_text.bytes().all(|b| b.is_ascii_digit())
        || !frac_text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(err());
    }
    if frac_text.len() > scale as usize {
        // Trailing zeros beyond the scale are harmless; real digits are not.
        let (keep, excess) = frac_text.split_at(scale as usize);
        if excess.bytes().any(|b| b != b'0') {
            return Err(err());
        }
        return assemble(negative, int_text, keep, scale);
    }
    assemble(negative, int_text, frac_text, scale)
}

fn assemble(negative: bool, int_text: &str, frac_text: &str, scale: u32) -> Result<BigInt> {
    let mut digits: BigInt = if int_text.is_empty() {
        BigInt::from(0)
    } else {
        int_text.parse().map_err(|_| Error::Conversion {
            from: "string",
            to: "decimal".to_string(),
        })?
    };
    digits *= BigInt::from(10).pow(scale);
    if !frac_text.is_empty() {
        let frac: BigInt = frac_text.parse().map_err(|_| Error::Conversion {
            from: "string",
            to: "decimal".to_string(),
        })?;
        digits += frac * BigInt::from(10).pow(scale - frac_text.len() as u32);
    }
    if negative {
        digits = -digits;
    }
    Ok(digits)
}

/// Rescales a scaled integer from one scale to another. Scaling up
/// multiplies; scaling down must be exact or the conversion fails.
pub fn rescale(digits: &BigInt, from_scale: u32, to_scale: u32) -> Result<BigInt> {
    use std::cmp::Ordering;
    match from_scale.cmp(&to_scale) {
        Ordering::Equal => Ok(digits.clone()),
        Ordering::Less => Ok(digits * BigInt::from(10).pow(to_scale - from_scale)),
        Ordering::Greater => {
            let divisor = BigInt::from(10).pow(from_scale - to_scale);
            if (digits % &divisor) != BigInt::from(0) {
                return Err(Error::Conversion {
                    from: "decimal",
                    to: format!("decimal with scale {to_scale}"),
                });
            }
            Ok(digits / divisor)
        }
    }
}

/// Narrows a scaled `BigInt` to `i128`, failing on overflow.
pub fn to_i128(digits: &BigInt, target: &'static str) -> Result<i128> {
    i128::try_from(digits.clone()).map_err(|_| Error::Overflow {
        value: digits.to_string(),
        target,
    })
}
