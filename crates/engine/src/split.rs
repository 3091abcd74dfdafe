//! Bill-splitting arithmetic.
//!
//! The only rounding rule in the system lives here: a shared amount is split
//! as `(ceil(a / 2), floor(a / 2))`, the odd unit always going to payer A.
//! Because the two halves are computed from the same floor, their sum is
//! exactly `a`, so `payer_a + payer_b == grand` holds for any list of items.

use std::{iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

use crate::{LineItem, Payer};

/// Per-payer totals for a scope (one draft, one record, one month).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub payer_a: i64,
    pub payer_b: i64,
    pub grand: i64,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        payer_a: 0,
        payer_b: 0,
        grand: 0,
    };

    /// Adds one item to the running totals.
    #[must_use]
    pub fn with_item(self, item: &LineItem) -> Self {
        let (a, b) = match item.payer {
            Payer::PayerA => (item.amount_minor, 0),
            Payer::PayerB => (0, item.amount_minor),
            Payer::Split => halves(item.amount_minor),
        };
        Self {
            payer_a: self.payer_a + a,
            payer_b: self.payer_b + b,
            grand: self.grand + item.amount_minor,
        }
    }

    /// `true` when the per-payer amounts add up to the grand total.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.payer_a + self.payer_b == self.grand
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Self::Output {
        Totals {
            payer_a: self.payer_a + rhs.payer_a,
            payer_b: self.payer_b + rhs.payer_b,
            grand: self.grand + rhs.grand,
        }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::ZERO, Add::add)
    }
}

/// `(ceil(amount / 2), floor(amount / 2))` for a non-negative amount.
#[must_use]
pub fn halves(amount_minor: i64) -> (i64, i64) {
    let floor = amount_minor / 2;
    (amount_minor - floor, floor)
}

/// Computes the totals of an ordered list of items.
#[must_use]
pub fn calculate<'a, I>(items: I) -> Totals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().fold(Totals::ZERO, Totals::with_item)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn item(name: &str, amount_minor: i64, payer: Payer) -> LineItem {
        LineItem::new(name, amount_minor, payer).unwrap()
    }

    fn payer_strategy() -> impl Strategy<Value = Payer> {
        prop_oneof![Just(Payer::PayerA), Just(Payer::PayerB), Just(Payer::Split)]
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(calculate(&Vec::<LineItem>::new()), Totals::ZERO);
    }

    #[test]
    fn odd_split_goes_to_payer_a() {
        assert_eq!(halves(101), (51, 50));
        assert_eq!(halves(100), (50, 50));
        assert_eq!(halves(1), (1, 0));
        assert_eq!(halves(0), (0, 0));
    }

    #[test]
    fn coffee_and_snack_receipt() {
        let items = vec![
            item("Coffee", 150, Payer::PayerA),
            item("Snack", 101, Payer::Split),
        ];
        assert_eq!(
            calculate(&items),
            Totals {
                payer_a: 201,
                payer_b: 50,
                grand: 251,
            }
        );
    }

    #[test]
    fn payer_b_items_only_count_for_b() {
        let items = vec![item("Wine", 480, Payer::PayerB), item("Bread", 35, Payer::PayerB)];
        let totals = calculate(&items);
        assert_eq!(totals.payer_a, 0);
        assert_eq!(totals.payer_b, 515);
        assert_eq!(totals.grand, 515);
    }

    #[test]
    fn many_odd_splits_do_not_drift() {
        let items: Vec<_> = (0..7).map(|_| item("Gum", 3, Payer::Split)).collect();
        let totals = calculate(&items);
        assert_eq!(totals.payer_a, 14);
        assert_eq!(totals.payer_b, 7);
        assert!(totals.is_balanced());
    }

    #[test]
    fn largest_amounts_do_not_overflow() {
        let items: Vec<_> = (0..1_000)
            .map(|_| item("Car", crate::MAX_AMOUNT_MINOR, Payer::Split))
            .collect();
        let totals = calculate(&items);
        assert_eq!(totals.grand, 1_000 * crate::MAX_AMOUNT_MINOR);
        assert!(totals.is_balanced());
        assert_eq!([totals; 2].into_iter().sum::<Totals>().grand, 2 * totals.grand);
    }

    proptest! {
        #[test]
        fn halves_sum_to_amount(amount in 0i64..=i64::MAX) {
            let (a, b) = halves(amount);
            prop_assert_eq!(a + b, amount);
            prop_assert!(a >= 0 && b >= 0);
            prop_assert!(a - b == 0 || a - b == 1);
            prop_assert_eq!(b, amount / 2);
        }

        #[test]
        fn totals_always_balance(
            entries in prop::collection::vec((0i64..1_000_000, payer_strategy()), 0..40)
        ) {
            let items: Vec<_> = entries
                .into_iter()
                .map(|(amount, payer)| item("x", amount, payer))
                .collect();
            let totals = calculate(&items);
            prop_assert!(totals.is_balanced());
            prop_assert_eq!(totals.grand, items.iter().map(|i| i.amount_minor).sum::<i64>());
        }
    }
}
