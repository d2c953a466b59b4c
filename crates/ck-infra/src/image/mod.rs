//! Image capture decoding.
//!
//! Selection image payloads arrive as encoded bytes (PNG in practice, but
//! the decoder sniffs the container). The decoded pixels feed the banded
//! checksum the history dedups and growth-merges on; the encoded bytes are
//! kept verbatim for re-offering the image on a selection.

use ck_core::{CoreError, ImageChecksum, Item};
use tracing::debug;

/// Decode `bytes` and build an image item. Undecodable bytes are rejected
/// as [`CoreError::InvalidContent`].
pub fn capture_image(bytes: Vec<u8>, captured_at_ms: i64) -> Result<Item, CoreError> {
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| CoreError::InvalidContent(format!("undecodable image: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let checksum = ImageChecksum::of_rgba(width, height, rgba.as_raw());
    debug!(width, height, bands = checksum.bands.len(), "image capture decoded");
    Item::image(checksum, width, height, bytes, captured_at_ms)
}
