//! Configuration snapshot consumed by the core.
//!
//! The core never watches or mutates configuration; a collaborator loads a
//! snapshot and hands it in.

use serde::{Deserialize, Serialize};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    PlainFile,
    EncryptedFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    /// Active history identifier.
    #[serde(default = "default_history_name")]
    pub history_name: String,

    /// Eviction bound per history.
    #[serde(default = "default_max_size")]
    pub max_size: usize,

    /// Whether OS selection changes are observed at all.
    #[serde(default = "default_true")]
    pub track_changes: bool,

    #[serde(default)]
    pub sync_clipboard_to_primary: bool,

    #[serde(default)]
    pub sync_primary_to_clipboard: bool,

    /// Whether the Image variant is accepted.
    #[serde(default = "default_true")]
    pub image_support: bool,

    /// Quiescence window before a mutation is flushed to storage.
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,

    #[serde(default)]
    pub storage: StorageKind,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

fn default_history_name() -> String {
    crate::ids::DEFAULT_HISTORY_NAME.to_string()
}

fn default_max_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_save_delay_ms() -> u64 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            history_name: default_history_name(),
            max_size: default_max_size(),
            track_changes: true,
            sync_clipboard_to_primary: false,
            sync_primary_to_clipboard: false,
            image_support: true,
            save_delay_ms: default_save_delay_ms(),
            storage: StorageKind::PlainFile,
        }
    }
}
