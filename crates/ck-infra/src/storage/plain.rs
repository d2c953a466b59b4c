//! Plain-file history store: one JSON document per history name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ck_core::ports::{HistoryStorePort, LoadedHistory};
use ck_core::{History, HistoryName};
use tracing::debug;

use super::format::{file_stem, HistoryEnvelope};

pub struct PlainFileStore {
    dir: PathBuf,
}

impl PlainFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &HistoryName) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }
}

impl HistoryStorePort for PlainFileStore {
    fn save(&self, snapshot: &History) -> Result<()> {
        let envelope = HistoryEnvelope::from_snapshot(snapshot)?;
        let content =
            serde_json::to_string_pretty(&envelope).context("serialize history failed")?;
        let path = self.path_for(snapshot.name());
        atomic_write(&path, content.as_bytes())?;
        debug!(history = %snapshot.name(), entries = snapshot.len(), "history saved");
        Ok(())
    }

    fn load(&self, name: &HistoryName, max_size: usize) -> Result<LoadedHistory> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadedHistory {
                    history: History::new(name.clone(), max_size),
                    skipped: 0,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read history failed: {}", path.display()))
            }
        };

        let envelope: HistoryEnvelope = serde_json::from_str(&content)
            .with_context(|| format!("parse history envelope failed: {}", path.display()))?;
        let (history, skipped) = envelope.into_history(name, max_size);
        Ok(LoadedHistory { history, skipped })
    }

    fn remove(&self, name: &HistoryName) -> Result<()> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove history failed: {}", path.display()))
            }
        }
    }
}

/// Write to a temporary sibling and rename over the target, so readers see
/// either the previous durable copy or the new one, never a partial write.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create store dir failed: {}", dir.display()))?;
    }

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content)
        .with_context(|| format!("write temp file failed: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "rename temp file to target failed: {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}
