//! Sale lifecycle events.

use common::{SaleId, SaleItemId};
use serde::{Deserialize, Serialize};

/// A lifecycle transition worth recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SaleEvent {
    SaleCreated { sale_id: SaleId },
    SaleModified { sale_id: SaleId },
    SaleCancelled { sale_id: SaleId },
    ItemCancelled { sale_id: SaleId, item_id: SaleItemId },
}

impl SaleEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated { .. } => "SaleCreated",
            SaleEvent::SaleModified { .. } => "SaleModified",
            SaleEvent::SaleCancelled { .. } => "SaleCancelled",
            SaleEvent::ItemCancelled { .. } => "ItemCancelled",
        }
    }

    /// The sale this event is about.
    pub fn sale_id(&self) -> SaleId {
        match self {
            SaleEvent::SaleCreated { sale_id }
            | SaleEvent::SaleModified { sale_id }
            | SaleEvent::SaleCancelled { sale_id }
            | SaleEvent::ItemCancelled { sale_id, .. } => *sale_id,
        }
    }

    /// The item this event is about, for item-level events.
    pub fn item_id(&self) -> Option<SaleItemId> {
        match self {
            SaleEvent::ItemCancelled { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        match self {
            SaleEvent::SaleCreated { sale_id } => format!("Sale created with ID: {sale_id}"),
            SaleEvent::SaleModified { sale_id } => format!("Sale modified with ID: {sale_id}"),
            SaleEvent::SaleCancelled { sale_id } => format!("Sale cancelled with ID: {sale_id}"),
            SaleEvent::ItemCancelled { sale_id, item_id } => {
                format!("Item with ID: {item_id} cancelled in sale with ID: {sale_id}")
            }
        }
    }
}
