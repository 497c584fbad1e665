//! Sale line items.

use common::{SaleId, SaleItemId};

use super::Money;

/// One line within a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    /// Unique item identifier.
    pub id: SaleItemId,

    /// The sale that owns this item.
    pub sale_id: SaleId,

    /// Product description.
    pub product: String,

    /// Units sold.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money,

    /// Flat amount taken off this line.
    pub discount: Money,

    /// Whether this line has been cancelled.
    pub is_cancelled: bool,
}

impl SaleItem {
    /// Returns the line total: `unit_price * quantity - discount`.
    ///
    /// Saturates on overflow. Items of a sale that passed
    /// [`check_sale`](super::check_sale) never saturate.
    pub fn total_amount(&self) -> Money {
        self.unit_price.multiply(self.quantity) - self.discount
    }

    /// Returns the line total, or `None` if it does not fit in an `i64`.
    pub fn checked_total_amount(&self) -> Option<Money> {
        self.unit_price
            .checked_multiply(self.quantity)?
            .checked_sub(self.discount)
    }
}

/// Incoming data for a line item, before it is attached to a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    /// Identity of an existing item of the same sale, kept on update.
    ///
    /// Ignored when a sale is created; new items always get fresh ids.
    pub id: Option<SaleItemId>,
    pub product: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount: Money,
    pub is_cancelled: bool,
}

impl SaleLine {
    /// Creates a new, uncancelled line without a flat discount.
    pub fn new(product: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        Self {
            id: None,
            product: product.into(),
            quantity,
            unit_price,
            discount: Money::zero(),
            is_cancelled: false,
        }
    }

    /// Sets the flat discount for this line.
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    pub(crate) fn into_item(self, id: SaleItemId, sale_id: SaleId) -> SaleItem {
        SaleItem {
            id,
            sale_id,
            product: self.product,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            is_cancelled: self.is_cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(line: SaleLine) -> SaleItem {
        line.into_item(SaleItemId::new(), SaleId::new())
    }

    #[test]
    fn test_item_total_subtracts_flat_discount() {
        let item = item(
            SaleLine::new("Beer", 3, Money::from_cents(1000)).with_discount(Money::from_cents(250)),
        );
        assert_eq!(item.total_amount().cents(), 2750);
        assert_eq!(item.checked_total_amount(), Some(Money::from_cents(2750)));
    }

    #[test]
    fn test_into_item_uses_given_ids() {
        let sale_id = SaleId::new();
        let item_id = SaleItemId::new();
        let mut line = SaleLine::new("Beer", 1, Money::from_cents(100));
        line.id = Some(SaleItemId::new());

        let item = line.into_item(item_id, sale_id);
        assert_eq!(item.id, item_id);
        assert_eq!(item.sale_id, sale_id);
    }

    #[test]
    fn test_zero_quantity_item_totals_to_negative_discount() {
        let item = item(
            SaleLine::new("Soda", 0, Money::from_cents(500)).with_discount(Money::from_cents(100)),
        );
        assert_eq!(item.total_amount().cents(), -100);
    }

    #[test]
    fn test_overflowing_line_total() {
        let too_big = item(SaleLine::new("Yacht", 2, Money::from_cents(i64::MAX)));
        assert_eq!(too_big.checked_total_amount(), None);
        assert_eq!(too_big.total_amount().cents(), i64::MAX);

        let huge_discount = item(
            SaleLine::new("Gift", 1, Money::zero()).with_discount(Money::from_cents(i64::MIN)),
        );
        assert_eq!(huge_discount.checked_total_amount(), None);
    }
}
