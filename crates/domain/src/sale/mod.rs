//! Sale aggregate and related types.

mod aggregate;
mod events;
mod item;
pub mod rules;
mod value_objects;

pub use aggregate::Sale;
pub use events::SaleEvent;
pub use item::{SaleItem, SaleLine};
pub use rules::{RuleViolation, calculate_discount, check_sale, validate_sale};
pub use value_objects::{DiscountRate, Money};

use common::{SaleId, SaleItemId};
use thiserror::Error;

/// Errors that can occur during sale operations.
#[derive(Debug, Error)]
pub enum SaleError {
    /// The sale breaks a business rule.
    #[error("The sale is invalid based on the business rules: {0}")]
    InvalidSale(RuleViolation),

    /// The sale was already cancelled.
    #[error("Sale {sale_id} is already cancelled")]
    AlreadyCancelled { sale_id: SaleId },

    /// The item does not belong to the sale.
    #[error("Item {item_id} not found in sale {sale_id}")]
    ItemNotFound { sale_id: SaleId, item_id: SaleItemId },

    /// The item was already cancelled.
    #[error("Item {item_id} is already cancelled")]
    ItemAlreadyCancelled { item_id: SaleItemId },

    /// An item id appears more than once in one request.
    #[error("Item {item_id} appears more than once")]
    DuplicateItem { item_id: SaleItemId },

    /// An item id names no current item of the sale.
    #[error("Item {item_id} does not belong to sale {sale_id}")]
    ForeignItem { sale_id: SaleId, item_id: SaleItemId },
}

impl From<RuleViolation> for SaleError {
    fn from(violation: RuleViolation) -> Self {
        SaleError::InvalidSale(violation)
    }
}
