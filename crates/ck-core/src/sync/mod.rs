//! Selection-endpoint synchronization state machine.
//!
//! Pure types only: state definitions and transition logic. Reading and
//! writing the actual OS selections is the application layer's job.
//!
//! Assigning selection ownership ourselves triggers a change notification
//! indistinguishable at the OS API level from an external change. The
//! tracker remembers what was last written so that notification can be
//! classified as an echo instead of looping back into the history.

mod state;

pub use state::{EndpointState, EndpointTracker, ObservedDisposition};

use serde::{Deserialize, Serialize};

/// One of the two independent OS selection buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Clipboard,
    Primary,
}

impl Endpoint {
    pub fn other(self) -> Self {
        match self {
            Endpoint::Clipboard => Endpoint::Primary,
            Endpoint::Primary => Endpoint::Clipboard,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Clipboard => write!(f, "clipboard"),
            Endpoint::Primary => write!(f, "primary"),
        }
    }
}
