//! Keybinder dispatch.
//!
//! Global shortcut capture happens in the host shell; what arrives here is
//! an abstract trigger. Each trigger maps to exactly one history or
//! manager operation — no business logic on this level.

use ck_core::Endpoint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::manager::ClipboardsManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTrigger {
    /// Drop the most recent entry.
    PopRecent,
    SyncClipboardToPrimary,
    SyncPrimaryToClipboard,
    /// Upload the most recent entry.
    UploadRecent,
}

pub async fn dispatch(trigger: KeyTrigger, manager: &mut ClipboardsManager) {
    debug!(?trigger, "key trigger");
    match trigger {
        KeyTrigger::PopRecent => {
            if let Some(id) = manager.most_recent_id() {
                // the id was just read back, delete cannot miss
                let _ = manager.delete(&id);
            }
        }
        KeyTrigger::SyncClipboardToPrimary => {
            manager.sync_endpoints(Endpoint::Clipboard, Endpoint::Primary);
        }
        KeyTrigger::SyncPrimaryToClipboard => {
            manager.sync_endpoints(Endpoint::Primary, Endpoint::Clipboard);
        }
        KeyTrigger::UploadRecent => {
            if let Some(id) = manager.most_recent_id() {
                if let Err(err) = manager.upload(&id).await {
                    tracing::warn!(%id, %err, "upload failed");
                }
            }
        }
    }
}
