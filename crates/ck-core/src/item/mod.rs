//! Clipboard item model.
//!
//! One [`Item`] is one clipboard payload, immutable once inserted into a
//! history. The variants share a small set of operations: a canonical
//! content representation used for deduplication ([`Item::dedup_key`]), a
//! display/paste string ([`Item::display_value`]), the growing-image merge
//! predicate ([`Item::is_growing`]), and case-insensitive search matching.

mod checksum;
mod mime;

pub use checksum::{ChecksumAlgorithm, ImageChecksum, BAND_ROWS};
pub use mime::MimeType;

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Longest display string handed out in summaries. Histories are listed
/// constantly; previews must stay one short line.
const DISPLAY_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Text,
    Password,
    Uris,
    Image,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Text => write!(f, "Text"),
            ItemKind::Password => write!(f, "Password"),
            ItemKind::Uris => write!(f, "Uris"),
            ItemKind::Image => write!(f, "Image"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Text {
        text: String,
        /// The dedicated MIME this payload was fetched with. Pushing the
        /// item back re-offers the same typed representation so HTML/XML
        /// structure survives the round trip. Not part of content identity.
        mime: MimeType,
    },
    Password {
        name: String,
        /// Unmasked value. Excluded from search and from display strings.
        secret: String,
    },
    Uris {
        uris: Vec<String>,
    },
    Image {
        checksum: ImageChecksum,
        width: u32,
        height: u32,
        /// Encoded bytes as captured (PNG unless the source offered
        /// something else we kept verbatim).
        bytes: Vec<u8>,
        /// Capture time, used to break ties between growing captures.
        captured_at_ms: i64,
    },
}

impl Item {
    pub fn text(text: impl Into<String>) -> Result<Self, CoreError> {
        Self::special_text(text, MimeType::text_plain())
    }

    /// Text fetched under a dedicated MIME (`text/html`, `application/xml`).
    pub fn special_text(text: impl Into<String>, mime: MimeType) -> Result<Self, CoreError> {
        let text = text.into();
        if text.is_empty() {
            return Err(CoreError::InvalidContent("empty text".into()));
        }
        Ok(Item::Text { text, mime })
    }

    /// Parse a `text/uri-list` payload: one URI per line, `#` lines are
    /// comments, blank lines ignored.
    pub fn uris(uri_list: &str) -> Result<Self, CoreError> {
        let uris: Vec<String> = uri_list
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        if uris.is_empty() {
            return Err(CoreError::InvalidContent("empty uri list".into()));
        }
        Ok(Item::Uris { uris })
    }

    pub fn password(name: impl Into<String>, secret: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidContent("empty password name".into()));
        }
        Ok(Item::Password {
            name,
            secret: secret.into(),
        })
    }

    /// Image from an already-decoded capture. Decoding (and rejection of
    /// undecodable bytes) happens in the capture adapter; the checksum is
    /// computed over the decoded pixels there as well.
    pub fn image(
        checksum: ImageChecksum,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
        captured_at_ms: i64,
    ) -> Result<Self, CoreError> {
        if bytes.is_empty() || checksum.bands.is_empty() {
            return Err(CoreError::InvalidContent("empty image".into()));
        }
        Ok(Item::Image {
            checksum,
            width,
            height,
            bytes,
            captured_at_ms,
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Text { .. } => ItemKind::Text,
            Item::Password { .. } => ItemKind::Password,
            Item::Uris { .. } => ItemKind::Uris,
            Item::Image { .. } => ItemKind::Image,
        }
    }

    /// Canonical content representation: the dedup predicate is "same kind,
    /// same dedup key". String content for text/URIs, the visible name for
    /// passwords, the pixel checksum for images.
    pub fn dedup_key(&self) -> String {
        match self {
            Item::Text { text, .. } => text.clone(),
            Item::Password { name, .. } => name.clone(),
            Item::Uris { uris } => uris.join("\n"),
            Item::Image { checksum, .. } => checksum.digest(),
        }
    }

    pub fn same_content(&self, other: &Item) -> bool {
        self.kind() == other.kind() && self.dedup_key() == other.dedup_key()
    }

    /// Growing-image merge rule: true iff both items are images and `self`
    /// is a strict prefix capture of `other`. The history then replaces the
    /// existing entry in place instead of inserting a duplicate.
    pub fn is_growing(&self, other: &Item) -> bool {
        match (self, other) {
            (
                Item::Image {
                    checksum: a,
                    captured_at_ms: at,
                    ..
                },
                Item::Image {
                    checksum: b,
                    captured_at_ms: bt,
                    ..
                },
            ) => a.is_strict_prefix_of(b) && at <= bt,
            _ => false,
        }
    }

    /// Display/paste string: generated placeholder for images, masked form
    /// for passwords. Truncated to one short line.
    pub fn display_value(&self) -> String {
        let full = match self {
            Item::Text { text, .. } => text.clone(),
            Item::Password { name, .. } => format!("[Password] {}", name),
            Item::Uris { uris } => format!("[Files] {}", uris.join(", ")),
            Item::Image {
                width,
                height,
                captured_at_ms,
                ..
            } => {
                let ts = chrono::DateTime::from_timestamp_millis(*captured_at_ms)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                format!("[Image, {} x {} ({})]", width, height, ts)
            }
        };
        truncate_display(&full)
    }

    /// Case-insensitive substring match over the searchable text. Password
    /// secrets never participate.
    pub fn matches(&self, lowercase_query: &str) -> bool {
        let haystack = match self {
            Item::Text { text, .. } => text.clone(),
            Item::Password { name, .. } => name.clone(),
            Item::Uris { uris } => uris.join("\n"),
            Item::Image { .. } => self.display_value(),
        };
        haystack.to_lowercase().contains(lowercase_query)
    }
}

fn truncate_display(s: &str) -> String {
    let one_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() <= DISPLAY_MAX_CHARS {
        return one_line;
    }
    let cut: String = one_line.chars().take(DISPLAY_MAX_CHARS).collect();
    format!("{}…", cut)
}
