//! Domain layer for the sales service.
//!
//! This crate provides:
//! - The `Sale` aggregate with its line items and derived totals
//! - Discount and validation rules over a sale
//! - Lifecycle events and the notifiers that record them

pub mod notifier;
pub mod sale;

pub use notifier::{
    ChannelNotifier, EventNotifier, RecordingNotifier, TracingNotifier, spawn_event_logger,
};
pub use sale::{
    DiscountRate, Money, RuleViolation, Sale, SaleError, SaleEvent, SaleItem, SaleLine,
    calculate_discount, check_sale, rules, validate_sale,
};
