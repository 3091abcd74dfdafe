//! Calendar dates used to key drafts and settlement records.
//!
//! A [`SettlementDate`] is validated once, on the way in, and from then on it
//! is handled as an opaque `YYYY-MM-DD` string. Month membership is a prefix
//! comparison on the first seven characters; no clock or timezone is ever
//! consulted after the date has been picked.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MONTH_PREFIX_LEN: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettlementDate(String);

impl SettlementDate {
    /// Parses a `YYYY-MM-DD` string. Anything chrono cannot read back to the
    /// exact same string is rejected, so `2024-3-1` fails.
    pub fn parse(value: &str) -> ResultEngine<Self> {
        let value = value.trim();
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map_err(|_| EngineError::InvalidDate(format!("expected YYYY-MM-DD, got {value}")))?;
        let canonical = date.format(DATE_FORMAT).to_string();
        if canonical != value {
            return Err(EngineError::InvalidDate(format!(
                "expected YYYY-MM-DD, got {value}"
            )));
        }
        Ok(Self(canonical))
    }

    #[must_use]
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }

    /// Today's date on the local clock. Only used to pick the initial active
    /// date.
    #[must_use]
    pub fn today() -> Self {
        Self::from_naive(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `YYYY-MM` part of the date.
    #[must_use]
    pub fn month_prefix(&self) -> &str {
        &self.0[..MONTH_PREFIX_LEN]
    }

    /// `true` when `other` falls in the same year-month as `self`.
    #[must_use]
    pub fn same_month(&self, other: &SettlementDate) -> bool {
        other.0.starts_with(self.month_prefix())
    }

    /// First day of the month `month` (`YYYY-MM`).
    pub fn first_of_month(month: &str) -> ResultEngine<Self> {
        Self::parse(&format!("{}-01", month.trim()))
    }

    /// Moves the date by `delta` days.
    pub fn add_days(&self, delta: i64) -> ResultEngine<Self> {
        let date = self.naive()?;
        let shifted = if delta >= 0 {
            date.checked_add_days(Days::new(delta.unsigned_abs()))
        } else {
            date.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        shifted
            .map(Self::from_naive)
            .ok_or_else(|| EngineError::InvalidDate("date out of range".to_string()))
    }

    /// Moves the date by `delta` months. The day is clamped to the last day
    /// of shorter months (`2024-03-31` minus one month is `2024-02-29`).
    pub fn add_months(&self, delta: i32) -> ResultEngine<Self> {
        let date = self.naive()?;
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        };
        shifted
            .map(Self::from_naive)
            .ok_or_else(|| EngineError::InvalidDate("date out of range".to_string()))
    }

    /// Day of the month, 1-based.
    pub fn day(&self) -> ResultEngine<u32> {
        Ok(self.naive()?.day())
    }

    fn naive(&self) -> ResultEngine<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_FORMAT)
            .map_err(|_| EngineError::InvalidDate(self.0.clone()))
    }
}

impl fmt::Display for SettlementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SettlementDate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SettlementDate {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SettlementDate> for String {
    fn from(value: SettlementDate) -> Self {
        value.0
    }
}
