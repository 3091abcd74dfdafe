use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who pays for an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    #[default]
    PayerA,
    PayerB,
    Split,
}

/// Per-payer totals of a day or a month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub payer_a: i64,
    pub payer_b: i64,
    pub grand: i64,
}

pub mod session {
    use super::*;

    /// Active date, `YYYY-MM-DD`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Session {
        pub date: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StepUnit {
        Day,
        Month,
    }

    /// Moves the active date by `delta` days or months.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionStep {
        pub unit: StepUnit,
        pub delta: i32,
    }
}

pub mod draft {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub payer: Payer,
        /// `(payer_a, payer_b)` shares, only for `split` items.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub split: Option<(i64, i64)>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DraftView {
        pub date: String,
        pub items: Vec<ItemView>,
        pub totals: Totals,
        /// A settlement already exists for this date.
        pub settled: bool,
    }

    /// Receipt image, base64 (a `data:` URL is accepted too).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptUpload {
        pub image_base64: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptImported {
        pub items: Vec<ItemView>,
    }

    /// Partial edit of a draft item.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub name: Option<String>,
        pub amount_minor: Option<i64>,
        pub payer: Option<Payer>,
    }
}

pub mod history {
    use super::*;
    use crate::draft::ItemView;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SettlementView {
        pub id: Uuid,
        pub date: String,
        pub totals: Totals,
        pub item_count: usize,
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HistoryQuery {
        /// Reference date; the month of the active date when missing.
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        /// `YYYY-MM`.
        pub month: String,
        pub records: Vec<SettlementView>,
        pub totals: Totals,
    }
}

pub mod payers {
    use super::*;

    /// Display names of the two payers.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PayerNames {
        pub payer_a: String,
        pub payer_b: String,
    }
}
