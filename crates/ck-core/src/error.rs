//! Error taxonomy for the core.
//!
//! `NotFound` and `InvalidContent` are caller-visible failures; selection
//! and storage troubles are environmental races that the application layer
//! absorbs (logged, retried or dropped) rather than surfaces.

use crate::ids::{HistoryName, ItemId};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Stale identifier: the entry was already evicted or deleted.
    #[error("no entry for identifier {0}")]
    NotFound(ItemId),

    #[error("no history named {0}")]
    HistoryNotFound(HistoryName),

    /// Undecodable image, empty text, empty password name.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// No OS ownership to read from or write to. Recoverable.
    #[error("selection unavailable: {0}")]
    SelectionUnavailable(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
