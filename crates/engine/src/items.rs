//! Line items: one row of a receipt, assigned to a payer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MAX_AMOUNT_MINOR, Money, Payer, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    pub amount_minor: i64,
    pub payer: Payer,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount_minor: i64, payer: Payer) -> ResultEngine<Self> {
        validate_amount(amount_minor)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount_minor,
            payer,
        })
    }

    /// Applies a partial edit. Nothing changes if the patch is invalid.
    pub fn apply(&mut self, patch: &ItemPatch) -> ResultEngine<()> {
        if let Some(amount_minor) = patch.amount_minor {
            validate_amount(amount_minor)?;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(amount_minor) = patch.amount_minor {
            self.amount_minor = amount_minor;
        }
        if let Some(payer) = patch.payer {
            self.payer = payer;
        }
        Ok(())
    }

    /// Per-payer share of a `Split` item, `None` for items paid by one person.
    #[must_use]
    pub fn split_preview(&self) -> Option<(i64, i64)> {
        (self.payer == Payer::Split).then(|| crate::split::halves(self.amount_minor))
    }
}

/// Partial update of a draft item; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub amount_minor: Option<i64>,
    pub payer: Option<Payer>,
}

impl ItemPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn payer(mut self, payer: Payer) -> Self {
        self.payer = Some(payer);
        self
    }
}

/// A raw candidate returned by a receipt extractor.
///
/// Models answer with plain JSON numbers, so the amount is kept as `f64`
/// until it crosses into the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    pub amount: f64,
}

impl ExtractedItem {
    /// Converts the candidate into a draft item paid by `PayerA`.
    ///
    /// Amounts are rounded to the nearest unit; negative or non-finite
    /// amounts are rejected.
    pub fn into_line_item(self) -> ResultEngine<LineItem> {
        if !self.amount.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "non-numeric amount for '{}'",
                self.name
            )));
        }
        let rounded = self.amount.round();
        if rounded < 0.0 || rounded > MAX_AMOUNT_MINOR as f64 {
            return Err(EngineError::InvalidAmount(format!(
                "amount out of range for '{}': {}",
                self.name, self.amount
            )));
        }
        LineItem::new(self.name.trim(), rounded as i64, Payer::PayerA)
    }
}

pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    Money::new(amount_minor).map(|_| ())
}
