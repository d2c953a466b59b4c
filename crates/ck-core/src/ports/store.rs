//! History store port.
//!
//! A backend owns only its storage location. It holds no reference to a
//! live [`History`]; `save` takes a point-in-time snapshot and `load`
//! returns a fresh reconstruction.

use crate::history::History;
use crate::ids::HistoryName;
use anyhow::Result;

#[derive(Debug)]
pub struct LoadedHistory {
    pub history: History,
    /// Entries skipped as unreadable. One bad entry must not lose the rest.
    pub skipped: usize,
}

pub trait HistoryStorePort: Send + Sync {
    /// Write a complete, self-describing serialization of the snapshot,
    /// atomically with respect to process crash: readers observe either the
    /// previous durable copy or the new one, never a partial write.
    fn save(&self, snapshot: &History) -> Result<()>;

    /// Reconstruct the named history in stored order. Unreadable entries
    /// are skipped (counted in [`LoadedHistory::skipped`]) with a reported
    /// warning; a missing store yields an empty history.
    fn load(&self, name: &HistoryName, max_size: usize) -> Result<LoadedHistory>;

    /// Remove the named history's durable copy entirely.
    fn remove(&self, name: &HistoryName) -> Result<()>;
}
