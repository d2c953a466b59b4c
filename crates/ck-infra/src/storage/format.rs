//! On-disk envelope shared by the storage backends.
//!
//! Entries are kept as individual JSON values inside the envelope so a load
//! can deserialize them one at a time and skip the unreadable ones instead
//! of aborting the whole history.

use ck_core::{Entry, History, HistoryName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEnvelope {
    pub version: u32,
    pub name: String,
    pub entries: Vec<Value>,
}

impl HistoryEnvelope {
    pub fn from_snapshot(snapshot: &History) -> anyhow::Result<Self> {
        let entries = snapshot
            .entries()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            version: FORMAT_VERSION,
            name: snapshot.name().to_string(),
            entries,
        })
    }

    /// Rebuild the history, skipping entries that fail to deserialize.
    /// Returns the history and the number of skipped entries.
    pub fn into_history(self, name: &HistoryName, max_size: usize) -> (History, usize) {
        let mut skipped = 0usize;
        let mut entries = Vec::with_capacity(self.entries.len());
        for (index, value) in self.entries.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    skipped += 1;
                    warn!(history = %name, index, %err, "skipping unreadable history entry");
                }
            }
        }
        (
            History::from_entries(name.clone(), max_size, entries),
            skipped,
        )
    }
}

/// History names key files on disk; keep them to a safe character set.
pub fn file_stem(name: &HistoryName) -> String {
    name.as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
