//! Debounced history persistence.
//!
//! Every mutation schedules a save; a schedule cancels any save still
//! pending, so a burst of clipboard activity collapses into one write after
//! the quiescence window (last-write-wins). A failed write is logged and
//! retried on the next cycle; the in-memory history stays authoritative.

use std::sync::Arc;
use std::time::Duration;

use ck_core::ports::HistoryStorePort;
use ck_core::History;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

pub struct DebouncedPersister {
    store: Arc<dyn HistoryStorePort>,
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl DebouncedPersister {
    pub fn new(store: Arc<dyn HistoryStorePort>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: None,
        }
    }

    /// Schedule a save of `snapshot`, superseding any pending one.
    pub fn schedule(&mut self, snapshot: History) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if let Err(err) = store.save(&snapshot) {
                warn!(history = %snapshot.name(), %err, "debounced save failed, will retry on next mutation");
            }
        });
        self.pending = Some(handle.abort_handle());
        debug!(delay_ms = self.delay.as_millis() as u64, "save scheduled");
    }

    /// Cancel any pending save and write `snapshot` immediately. Used on
    /// shutdown and when switching the active history.
    pub fn flush(&mut self, snapshot: &History) -> anyhow::Result<()> {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.store.save(snapshot)
    }
}
