//! Bus facade: the IPC-shaped surface of the core.
//!
//! Pure dispatch — each request maps to exactly one history or manager
//! operation. The transport (D-Bus or otherwise) lives outside; it funnels
//! requests through the service loop and carries [`Signal`]s to its own
//! subscribers. Fan-out is best-effort: a disconnected subscriber is
//! dropped silently and never blocks the mutating call.

use ck_core::{ItemId, ItemKind};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    GetHistory { name: Option<String> },
    Add { value: String },
    AddPassword { name: String, value: String },
    Select { id: ItemId },
    Delete { id: ItemId },
    Search { query: String },
    SwitchHistory { name: String },
    EmptyHistory { name: String },
    Upload { id: ItemId },
}

/// Projection of one entry for bus replies. Secrets and image bytes never
/// travel through the bus; `display` is the masked/placeholder form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub kind: ItemKind,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Reply {
    Done,
    Id { id: ItemId },
    Items { items: Vec<ItemSummary> },
}

/// Outward change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    HistoryUpdated { name: String, len: usize },
    ItemChanged { id: ItemId },
}

/// Subscriber registry with best-effort delivery.
#[derive(Default)]
pub struct SignalHub {
    subscribers: Vec<UnboundedSender<Signal>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<Signal> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber, dropping the disconnected ones.
    pub fn publish(&mut self, signal: Signal) {
        self.subscribers
            .retain(|tx| tx.send(signal.clone()).is_ok());
        debug!(?signal, subscribers = self.subscribers.len(), "signal published");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
