use std::{fmt, str::FromStr};

use crate::EngineError;

/// Largest accepted amount, in minor units.
///
/// Far above any receipt, and low enough that summing the items of a draft or
/// the records of a month cannot overflow `i64`.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

/// Non-negative money amount in the **smallest currency unit**.
///
/// Receipts are settled in whole units, so there is no fractional part and
/// no floating point anywhere in the totals.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1_234).unwrap();
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "$1,234");
/// ```
///
/// Parsing from user input (accepts a leading `$` and `,` group separators,
/// rejects fractions and negative values):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("1,250".parse::<Money>().unwrap().minor(), 1250);
/// assert_eq!("$ 80".parse::<Money>().unwrap().minor(), 80);
/// assert!("12.5".parse::<Money>().is_err());
/// assert!("-3".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount, rejecting negative values and values above
    /// [`MAX_AMOUNT_MINOR`].
    pub fn new(minor: i64) -> Result<Self, EngineError> {
        if minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be >= 0, got {minor}"
            )));
        }
        if minor > MAX_AMOUNT_MINOR {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be <= {MAX_AMOUNT_MINOR}, got {minor}"
            )));
        }
        Ok(Self(minor))
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "${grouped}")
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a whole amount, tolerating a `$` prefix and `,` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", s.trim()));

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;
        Money::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::ZERO.to_string(), "$0");
        assert_eq!(Money(999).to_string(), "$999");
        assert_eq!(Money(1000).to_string(), "$1,000");
        assert_eq!(Money(1_234_567).to_string(), "$1,234,567");
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Money::new(-1).is_err());
        assert!(Money::new(MAX_AMOUNT_MINOR + 1).is_err());
        assert!(Money::new(i64::MAX).is_err());
        assert_eq!(Money::new(0).unwrap(), Money::ZERO);
        assert_eq!(Money::new(MAX_AMOUNT_MINOR).unwrap().minor(), MAX_AMOUNT_MINOR);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("$".parse::<Money>().is_err());
        assert!("1.5".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
        assert!("9,223,372,036,854,775,807".parse::<Money>().is_err());
    }
}
