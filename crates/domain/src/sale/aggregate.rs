//! Sale aggregate implementation.

use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};

use std::collections::HashSet;

use super::{Money, SaleError, SaleItem, SaleLine, rules};

/// Sale aggregate root.
///
/// A sale owns its line items; items never outlive it. Totals are derived
/// from the current items on every read, so they cannot go stale.
///
/// Lifecycle:
/// ```text
/// Created ──► Modified ──► Modified ──► … ──► Cancelled
///    │                                            ▲
///    └────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    id: SaleId,
    sale_number: String,
    sale_date: DateTime<Utc>,
    customer: String,
    branch: String,
    is_cancelled: bool,
    items: Vec<SaleItem>,
}

impl Sale {
    /// Creates a new sale with a freshly generated id.
    ///
    /// Every item gets a fresh id too; ids carried by `lines` are ignored.
    pub fn new(
        sale_number: impl Into<String>,
        sale_date: DateTime<Utc>,
        customer: impl Into<String>,
        branch: impl Into<String>,
        lines: Vec<SaleLine>,
    ) -> Self {
        let id = SaleId::new();
        Self {
            id,
            sale_number: sale_number.into(),
            sale_date,
            customer: customer.into(),
            branch: branch.into(),
            is_cancelled: false,
            items: lines
                .into_iter()
                .map(|line| line.into_item(SaleItemId::new(), id))
                .collect(),
        }
    }

    /// Reassembles a sale from stored parts.
    ///
    /// Items are taken as-is; their `sale_id` must already point at `id`.
    pub fn from_parts(
        id: SaleId,
        sale_number: String,
        sale_date: DateTime<Utc>,
        customer: String,
        branch: String,
        is_cancelled: bool,
        items: Vec<SaleItem>,
    ) -> Self {
        Self {
            id,
            sale_number,
            sale_date,
            customer,
            branch,
            is_cancelled,
            items,
        }
    }

    pub fn id(&self) -> SaleId {
        self.id
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Looks up a line item by id.
    pub fn item(&self, item_id: SaleItemId) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Number of line entries, regardless of quantity.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all line entries.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of every line total.
    ///
    /// Cancelled lines are still counted.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleItem::total_amount).sum()
    }

    /// Sum of every line total, or `None` if any step overflows.
    pub fn checked_items_total(&self) -> Option<Money> {
        self.items.iter().try_fold(Money::zero(), |total, item| {
            total.checked_add(item.checked_total_amount()?)
        })
    }

    /// The amount due: the items total with the quantity discount applied.
    pub fn total_amount(&self) -> Money {
        self.items_total()
            .apply_discount(rules::calculate_discount(self))
    }

    /// Replaces customer, branch and the whole item collection.
    ///
    /// Items are not merged: anything not in `lines` is dropped. A line may
    /// keep the id of one of this sale's current items; lines without an id
    /// get a fresh one. Nothing changes if an id is repeated or belongs to
    /// no current item.
    pub fn replace_details(
        &mut self,
        customer: impl Into<String>,
        branch: impl Into<String>,
        lines: Vec<SaleLine>,
    ) -> Result<(), SaleError> {
        let mut seen = HashSet::new();
        for item_id in lines.iter().filter_map(|line| line.id) {
            if self.item(item_id).is_none() {
                return Err(SaleError::ForeignItem {
                    sale_id: self.id,
                    item_id,
                });
            }
            if !seen.insert(item_id) {
                return Err(SaleError::DuplicateItem { item_id });
            }
        }

        let sale_id = self.id;
        self.customer = customer.into();
        self.branch = branch.into();
        self.items = lines
            .into_iter()
            .map(|line| {
                let id = line.id.unwrap_or_default();
                line.into_item(id, sale_id)
            })
            .collect();
        Ok(())
    }

    /// Marks the sale as cancelled. This is a one-way transition.
    pub fn cancel(&mut self) -> Result<(), SaleError> {
        if self.is_cancelled {
            return Err(SaleError::AlreadyCancelled { sale_id: self.id });
        }
        self.is_cancelled = true;
        Ok(())
    }

    /// Marks a single line item as cancelled.
    ///
    /// The item stays in the sale and keeps counting toward the total.
    pub fn cancel_item(&mut self, item_id: SaleItemId) -> Result<(), SaleError> {
        if self.is_cancelled {
            return Err(SaleError::AlreadyCancelled { sale_id: self.id });
        }

        let sale_id = self.id;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(SaleError::ItemNotFound { sale_id, item_id })?;

        if item.is_cancelled {
            return Err(SaleError::ItemAlreadyCancelled { item_id });
        }
        item.is_cancelled = true;
        Ok(())
    }
}
