//! Numeric-answer normalization.
//!
//! Numeric answers are compared by value, not by text: "3", "3.0", "03" and
//! "+3" are the same answer. Parsing is exact decimal parsing into a
//! canonical (sign, significant digits, power-of-ten) triple, so no
//! floating-point rounding is involved in equality.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseDecimalError;

/// A normalized numeric entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericValue {
    /// Empty or whitespace-only text.
    Blank,
    /// Non-empty text that is not a decimal number.
    Invalid,
    /// A parsed number in canonical form.
    Numeric(Decimal),
}

impl NumericValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericValue::Blank)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, NumericValue::Invalid)
    }
}

/// Normalize one numeric text entry.
pub fn normalize(text: &str) -> NumericValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return NumericValue::Blank;
    }
    match trimmed.parse::<Decimal>() {
        Ok(value) => NumericValue::Numeric(value),
        Err(_) => NumericValue::Invalid,
    }
}

/// An exact decimal number in canonical form.
///
/// The value is `(-1)^negative * digits * 10^exponent`, where `digits` has no
/// leading or trailing zeros. Zero is the empty digit string with exponent 0
/// and is never negative, so two `Decimal`s are equal exactly when the
/// numbers they denote are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` with at least one
    /// mantissa digit on either side of the point (".5" and "5." are valid).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError::new(s);

        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exp_text) = match rest.find(['e', 'E']) {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let mut exponent: i64 = match exp_text {
            Some(text) => {
                let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
                if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(err());
                }
                text.parse::<i64>().map_err(|_| err())?
            }
            None => 0,
        };
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| err())?;
        exponent = exponent.checked_sub(frac_len).ok_or_else(err)?;

        let all_digits = format!("{int_part}{frac_part}");
        let significant = all_digits.trim_start_matches('0');
        let trimmed = significant.trim_end_matches('0');

        if trimmed.is_empty() {
            return Ok(Decimal {
                negative: false,
                digits: String::new(),
                exponent: 0,
            });
        }

        let trailing = i64::try_from(significant.len() - trimmed.len()).map_err(|_| err())?;
        exponent = exponent.checked_add(trailing).ok_or_else(err)?;

        Ok(Decimal {
            negative,
            digits: trimmed.to_string(),
            exponent,
        })
    }
}

impl fmt::Display for Decimal {
    /// Minimal decimal text ("3", "-1.5", "0.25"). Very large or very small
    /// magnitudes switch to scientific notation ("1e+21", "1.5e-7") so the
    /// rendering stays bounded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.negative {
            write!(f, "-")?;
        }

        let len = self.digits.len() as i64;
        // Position of the decimal point relative to the start of `digits`.
        let point = len.saturating_add(self.exponent);

        if (-5..=21).contains(&point) {
            if self.exponent >= 0 {
                write!(f, "{}{}", self.digits, "0".repeat(self.exponent as usize))
            } else if point > 0 {
                let (int_part, frac_part) = self.digits.split_at(point as usize);
                write!(f, "{int_part}.{frac_part}")
            } else {
                write!(f, "0.{}{}", "0".repeat((-point) as usize), self.digits)
            }
        } else {
            let (lead, tail) = self.digits.split_at(1);
            let sci_exp = point - 1;
            let sign = if sci_exp >= 0 { "+" } else { "-" };
            if tail.is_empty() {
                write!(f, "{lead}e{sign}{}", sci_exp.unsigned_abs())
            } else {
                write!(f, "{lead}.{tail}e{sign}{}", sci_exp.unsigned_abs())
            }
        }
    }
}
