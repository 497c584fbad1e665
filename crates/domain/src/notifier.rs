//! Best-effort recording of sale lifecycle events.
//!
//! Notification is fire-and-forget: [`EventNotifier::notify`] returns nothing,
//! so a failing sink has no way to reach the operation that triggered it.

use std::sync::{Arc, Mutex, PoisonError};

use common::{SaleId, SaleItemId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sale::SaleEvent;

/// Sink for sale lifecycle events.
pub trait EventNotifier: Send + Sync {
    /// Records that an event happened.
    fn notify(&self, event: SaleEvent);

    fn sale_created(&self, sale_id: SaleId) {
        self.notify(SaleEvent::SaleCreated { sale_id });
    }

    fn sale_modified(&self, sale_id: SaleId) {
        self.notify(SaleEvent::SaleModified { sale_id });
    }

    fn sale_cancelled(&self, sale_id: SaleId) {
        self.notify(SaleEvent::SaleCancelled { sale_id });
    }

    fn item_cancelled(&self, sale_id: SaleId, item_id: SaleItemId) {
        self.notify(SaleEvent::ItemCancelled { sale_id, item_id });
    }
}

impl<T: EventNotifier + ?Sized> EventNotifier for Arc<T> {
    fn notify(&self, event: SaleEvent) {
        (**self).notify(event);
    }
}

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl EventNotifier for TracingNotifier {
    fn notify(&self, event: SaleEvent) {
        metrics::counter!("sales_events_total", "event_type" => event.event_type()).increment(1);

        match event.item_id() {
            Some(item_id) => tracing::info!(
                event_type = event.event_type(),
                sale_id = %event.sale_id(),
                item_id = %item_id,
                "{}",
                event.message()
            ),
            None => tracing::info!(
                event_type = event.event_type(),
                sale_id = %event.sale_id(),
                "{}",
                event.message()
            ),
        }
    }
}

/// Sends events into an unbounded channel without waiting on the receiver.
///
/// If the receiving side has gone away the event is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<SaleEvent>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SaleEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Creates a notifier whose events are logged by a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (notifier, receiver) = Self::new();
        (notifier, spawn_event_logger(receiver))
    }
}

impl EventNotifier for ChannelNotifier {
    fn notify(&self, event: SaleEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!(
                event_type = event.event_type(),
                sale_id = %event.sale_id(),
                "event channel closed, dropping notification"
            );
        }
    }
}

/// Drains `receiver` into [`TracingNotifier`] until every sender is dropped.
pub fn spawn_event_logger(mut receiver: mpsc::UnboundedReceiver<SaleEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let sink = TracingNotifier;
        while let Some(event) = receiver.recv().await {
            sink.notify(event);
        }
        tracing::debug!("event logger stopped");
    })
}

/// Keeps every event in memory, for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<SaleEvent>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<SaleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventNotifier for RecordingNotifier {
    fn notify(&self, event: SaleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
