//! Stable identifiers handed out to external references.
//!
//! Entries are always addressed by [`ItemId`], never by position: positions
//! shift on promotion and eviction, identifiers do not.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl_id!(ItemId);

/// Name of one history among possibly several coexisting ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryName(String);

pub const DEFAULT_HISTORY_NAME: &str = "history";

impl HistoryName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::default()
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HistoryName {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_NAME.to_string())
    }
}

impl std::fmt::Display for HistoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HistoryName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HistoryName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
