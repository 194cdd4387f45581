//! Human-readable decimal amount parsing.
//!
//! Product prices are written as short decimal strings (`"0.068"`, `"600"`,
//! `"$99"`). [`MoneyAmount`] parses such strings into an exact decimal that can
//! then be scaled to a token's smallest unit without floating point.
//!
//! ```
//! use kitpay_types::util::money_amount::MoneyAmount;
//!
//! let amount = MoneyAmount::parse("0.068").unwrap();
//! assert_eq!(amount.scale(), 3);
//! assert_eq!(amount.mantissa(), 68);
//! ```

use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A parsed non-negative decimal amount that keeps the precision it was written with.
///
/// `"10.50"` has [`scale`](MoneyAmount::scale) 2 and [`mantissa`](MoneyAmount::mantissa) 1050.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyAmount(pub Decimal);

/// Errors that can occur when parsing a decimal amount.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyAmountParseError {
    /// The input string could not be parsed as a number.
    #[error("Invalid number format")]
    InvalidFormat,
    /// The value is outside the allowed range.
    #[error("Amount must be between {} and {}", bounds::MIN_STR, bounds::MAX_STR)]
    OutOfRange,
    /// Negative values are not allowed.
    #[error("Negative value is not allowed")]
    Negative,
    /// The input has more fractional digits than the token supports.
    #[error("Too big of a precision: {money} vs {token} on token")]
    WrongPrecision {
        /// Fractional digits in the input.
        money: u32,
        /// Decimal places supported by the token.
        token: u32,
    },
}

mod bounds {
    use super::*;

    pub const MIN_STR: &str = "0.000000000000000001";
    pub const MAX_STR: &str = "999999999";

    pub static MIN: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MIN_STR).expect("valid decimal"));
    pub static MAX: LazyLock<Decimal> =
        LazyLock::new(|| Decimal::from_str(MAX_STR).expect("valid decimal"));
}

/// Everything that is not a digit, a dot or a minus sign: currency symbols,
/// thousand separators, whitespace.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d\.\-]+").expect("valid regex"));

impl MoneyAmount {
    /// Parses a human-readable amount such as `"0.18"`, `"$99"` or `"1,000"`.
    ///
    /// # Errors
    ///
    /// Fails when the cleaned input is not a number, is negative, or lies outside
    /// the supported range.
    pub fn parse(input: &str) -> Result<Self, MoneyAmountParseError> {
        let cleaned = NOISE.replace_all(input, "");
        let parsed =
            Decimal::from_str(&cleaned).map_err(|_| MoneyAmountParseError::InvalidFormat)?;
        if parsed.is_sign_negative() {
            return Err(MoneyAmountParseError::Negative);
        }
        if parsed < *bounds::MIN || parsed > *bounds::MAX {
            return Err(MoneyAmountParseError::OutOfRange);
        }
        Ok(MoneyAmount(parsed))
    }

    /// Number of fractional digits as written.
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    /// The digits of the amount with the decimal point removed.
    pub fn mantissa(&self) -> u128 {
        self.0.mantissa().unsigned_abs()
    }
}

impl FromStr for MoneyAmount {
    type Err = MoneyAmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoneyAmount::parse(s)
    }
}

impl TryFrom<&str> for MoneyAmount {
    type Error = MoneyAmountParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MoneyAmount::parse(value)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_currency_and_separators() {
        let amount = MoneyAmount::parse("$1,000.50").unwrap();
        assert_eq!(amount.mantissa(), 100050);
        assert_eq!(amount.scale(), 2);
    }

    #[test]
    fn test_parse_rejects_negative_and_zero() {
        assert_eq!(
            MoneyAmount::parse("-5"),
            Err(MoneyAmountParseError::Negative)
        );
        assert_eq!(
            MoneyAmount::parse("0"),
            Err(MoneyAmountParseError::OutOfRange)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            MoneyAmount::parse("lots"),
            Err(MoneyAmountParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_display_normalizes() {
        assert_eq!(MoneyAmount::parse("0.180").unwrap().to_string(), "0.18");
    }
}
