//! Settings file repository: JSON on disk, atomic replace, missing file
//! yields defaults.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ck_core::Settings;

use crate::storage::atomic_write;

pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read settings failed: {}", self.path.display()))
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("parse settings failed: {}", self.path.display()))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content =
            serde_json::to_string_pretty(settings).context("serialize settings failed")?;
        atomic_write(&self.path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::new(dir.path().join("settings.json"));
        assert_eq!(repo.load().unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::new(dir.path().join("settings.json"));
        let mut settings = Settings::default();
        settings.max_size = 42;
        settings.sync_clipboard_to_primary = true;

        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), settings);
    }
}
