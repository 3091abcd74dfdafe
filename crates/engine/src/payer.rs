use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Who pays for a line item.
///
/// The set is closed: anything outside the three tags is rejected when it
/// enters the system (`FromStr`, `TryFrom<&str>` and serde all refuse it),
/// so the split policy is never applied by accident.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    #[default]
    PayerA,
    PayerB,
    Split,
}

impl Payer {
    pub const ALL: [Payer; 3] = [Payer::PayerA, Payer::PayerB, Payer::Split];

    /// Canonical tag used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PayerA => "payer_a",
            Self::PayerB => "payer_b",
            Self::Split => "split",
        }
    }
}

impl core::fmt::Display for Payer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Payer {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "payer_a" | "a" => Ok(Self::PayerA),
            "payer_b" | "b" => Ok(Self::PayerB),
            "split" => Ok(Self::Split),
            other => Err(EngineError::InvalidPayer(format!(
                "unknown payer tag: {other}"
            ))),
        }
    }
}

impl FromStr for Payer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
