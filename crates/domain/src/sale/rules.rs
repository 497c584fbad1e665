//! Discount and validation rules.
//!
//! Both rules look only at the item collection and are total over any sale,
//! including one with no items or with amounts that overflow.

use thiserror::Error;

use super::{DiscountRate, Sale};

/// Total quantity at which the quantity discount starts to apply.
pub const DISCOUNT_QUANTITY_THRESHOLD: u64 = 10;

/// Largest total quantity a single sale may carry.
pub const MAX_SALE_QUANTITY: u64 = 20;

/// Fewest line entries a sale may carry. Counts entries, not units.
pub const MIN_SALE_ENTRIES: usize = 4;

/// Why a sale fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The sale has no items.
    #[error("sale has no items")]
    NoItems,

    /// The summed quantity is above [`MAX_SALE_QUANTITY`].
    #[error("total quantity {total_quantity} exceeds the limit of {max}", max = MAX_SALE_QUANTITY)]
    QuantityExceeded { total_quantity: u64 },

    /// There are fewer than [`MIN_SALE_ENTRIES`] line entries.
    #[error("sale has {entries} line entries, at least {min} are required", min = MIN_SALE_ENTRIES)]
    TooFewEntries { entries: usize },

    /// A line total or the items total does not fit in the money range.
    #[error("sale amounts are out of range")]
    AmountOutOfRange,
}

impl RuleViolation {
    /// Short label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleViolation::NoItems => "no_items",
            RuleViolation::QuantityExceeded { .. } => "quantity_exceeded",
            RuleViolation::TooFewEntries { .. } => "too_few_entries",
            RuleViolation::AmountOutOfRange => "amount_out_of_range",
        }
    }
}

/// Returns the discount rate a sale qualifies for.
///
/// Ten percent once the summed quantity reaches [`DISCOUNT_QUANTITY_THRESHOLD`],
/// nothing otherwise.
pub fn calculate_discount(sale: &Sale) -> DiscountRate {
    if sale.items().is_empty() {
        return DiscountRate::NONE;
    }

    if sale.total_quantity() >= DISCOUNT_QUANTITY_THRESHOLD {
        DiscountRate::TEN_PERCENT
    } else {
        DiscountRate::NONE
    }
}

/// Checks a sale against the business rules, reporting the first violation.
///
/// Checks run in order: empty, quantity ceiling, entry count, amount range.
pub fn check_sale(sale: &Sale) -> Result<(), RuleViolation> {
    if sale.items().is_empty() {
        return Err(RuleViolation::NoItems);
    }

    let total_quantity = sale.total_quantity();
    if total_quantity > MAX_SALE_QUANTITY {
        return Err(RuleViolation::QuantityExceeded { total_quantity });
    }

    let entries = sale.item_count();
    if entries < MIN_SALE_ENTRIES {
        return Err(RuleViolation::TooFewEntries { entries });
    }

    if sale.checked_items_total().is_none() {
        return Err(RuleViolation::AmountOutOfRange);
    }

    Ok(())
}

/// Returns true if the sale passes every business rule.
pub fn validate_sale(sale: &Sale) -> bool {
    check_sale(sale).is_ok()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::sale::{Money, SaleLine};

    fn sale_with_quantities(quantities: &[u32]) -> Sale {
        let lines = quantities
            .iter()
            .map(|&q| SaleLine::new("Beer", q, Money::from_cents(500)))
            .collect();
        Sale::new("S-1", Utc::now(), "ACME", "Downtown", lines)
    }

    #[test]
    fn test_no_discount_for_empty_sale() {
        assert_eq!(calculate_discount(&sale_with_quantities(&[])), DiscountRate::NONE);
    }

    #[test]
    fn test_no_discount_below_threshold() {
        assert_eq!(
            calculate_discount(&sale_with_quantities(&[3, 3, 3])),
            DiscountRate::NONE
        );
        assert_eq!(
            calculate_discount(&sale_with_quantities(&[9])).as_fraction(),
            0.0
        );
    }

    #[test]
    fn test_discount_at_threshold() {
        let rate = calculate_discount(&sale_with_quantities(&[4, 3, 2, 1]));
        assert_eq!(rate, DiscountRate::TEN_PERCENT);
        assert_eq!(rate.as_fraction(), 0.10);
    }

    #[test]
    fn test_discount_above_threshold_stays_ten_percent() {
        assert_eq!(
            calculate_discount(&sale_with_quantities(&[50])),
            DiscountRate::TEN_PERCENT
        );
    }

    #[test]
    fn test_empty_sale_is_invalid() {
        let sale = sale_with_quantities(&[]);
        assert!(!validate_sale(&sale));
        assert_eq!(check_sale(&sale), Err(RuleViolation::NoItems));
    }

    #[test]
    fn test_quantity_over_limit_is_invalid() {
        let sale = sale_with_quantities(&[6, 5, 5, 5]);
        assert!(!validate_sale(&sale));
        assert_eq!(
            check_sale(&sale),
            Err(RuleViolation::QuantityExceeded { total_quantity: 21 })
        );
    }

    #[test]
    fn test_quantity_at_limit_is_valid() {
        assert!(validate_sale(&sale_with_quantities(&[5, 5, 5, 5])));
    }

    #[test]
    fn test_single_large_entry_fails_entry_count() {
        // Within the quantity ceiling, but only one entry.
        let sale = sale_with_quantities(&[15]);
        assert!(!validate_sale(&sale));
        assert_eq!(
            check_sale(&sale),
            Err(RuleViolation::TooFewEntries { entries: 1 })
        );
    }

    #[test]
    fn test_four_single_unit_entries_are_valid() {
        assert!(validate_sale(&sale_with_quantities(&[1, 1, 1, 1])));
    }

    #[test]
    fn test_three_entries_are_invalid() {
        assert!(!validate_sale(&sale_with_quantities(&[2, 2, 2])));
    }

    #[test]
    fn test_quantity_check_runs_before_entry_count() {
        assert_eq!(
            check_sale(&sale_with_quantities(&[25])),
            Err(RuleViolation::QuantityExceeded { total_quantity: 25 })
        );
    }

    #[test]
    fn test_overflowing_amounts_are_invalid() {
        let lines = (0..4)
            .map(|_| SaleLine::new("Yacht", 1, Money::from_cents(i64::MAX)))
            .collect();
        let sale = Sale::new("S-1", Utc::now(), "ACME", "Downtown", lines);

        assert!(!validate_sale(&sale));
        assert_eq!(check_sale(&sale), Err(RuleViolation::AmountOutOfRange));
    }

    #[test]
    fn test_large_amounts_within_range_are_valid() {
        let lines = (0..4)
            .map(|_| SaleLine::new("Yacht", 1, Money::from_cents(i64::MAX / 4)))
            .collect();
        let sale = Sale::new("S-1", Utc::now(), "ACME", "Downtown", lines);

        assert!(validate_sale(&sale));
    }

    #[test]
    fn test_violation_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(RuleViolation::AmountOutOfRange);
        assert_eq!(err.to_string(), "sale amounts are out of range");
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(RuleViolation::NoItems.to_string(), "sale has no items");
        assert_eq!(
            RuleViolation::TooFewEntries { entries: 2 }.to_string(),
            "sale has 2 line entries, at least 4 are required"
        );
        assert_eq!(
            RuleViolation::QuantityExceeded { total_quantity: 21 }.to_string(),
            "total quantity 21 exceeds the limit of 20"
        );
        assert_eq!(RuleViolation::NoItems.as_str(), "no_items");
    }
}
