//! Totals over a day (draft) or a month (settled records).

use crate::{LineItem, SettlementDate, SettlementRecord, Totals, split};

/// Totals of one day's draft.
#[must_use]
pub fn day_totals(items: &[LineItem]) -> Totals {
    split::calculate(items)
}

/// Records of the same year-month as `reference`, in the order given.
pub fn records_in_month<'a, 'r>(
    records: &'a [SettlementRecord],
    reference: &'r SettlementDate,
) -> impl Iterator<Item = &'a SettlementRecord> + use<'a, 'r> {
    records
        .iter()
        .filter(move |record| reference.same_month(&record.date))
}

/// Sum of the stored totals of every record in the month of `reference`.
///
/// Records are trusted as stored; their items are not re-split.
#[must_use]
pub fn month_totals(records: &[SettlementRecord], reference: &SettlementDate) -> Totals {
    records_in_month(records, reference)
        .map(|record| record.totals)
        .sum()
}
