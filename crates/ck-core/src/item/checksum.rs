//! Content-addressed image checksums.
//!
//! The decoded pixel buffer is split into fixed-height row bands and each
//! band is hashed independently. A capture that strictly extends another
//! (an incremental screenshot of a growing selection) appends bands without
//! disturbing the existing ones, so "B grows A" is exactly "A's band
//! digests are a strict prefix of B's".

use serde::{Deserialize, Serialize};

/// Rows per band. Appending fewer rows than this still changes the final
/// (partial) band, which keeps the prefix test strict.
pub const BAND_ROWS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumAlgorithm {
    Blake3BandedV1,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageChecksum {
    pub alg: ChecksumAlgorithm,
    /// Hex digest per row band, top to bottom.
    pub bands: Vec<String>,
}

impl ImageChecksum {
    /// Checksum of a decoded RGBA buffer, `width * height * 4` bytes.
    pub fn of_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let row_len = width as usize * 4;
        let band_len = row_len * BAND_ROWS as usize;
        let pixel_len = (row_len * height as usize).min(rgba.len());
        let bands = if row_len == 0 {
            Vec::new()
        } else {
            rgba[..pixel_len]
                .chunks(band_len)
                .map(|band| hex::encode(blake3::hash(band).as_bytes()))
                .collect()
        };
        Self {
            alg: ChecksumAlgorithm::Blake3BandedV1,
            bands,
        }
    }

    /// True iff `self` is a proper prefix capture of `other`: every band of
    /// `self` reappears unchanged at the start of `other`, and `other` has
    /// at least one more band.
    pub fn is_strict_prefix_of(&self, other: &Self) -> bool {
        self.alg == other.alg
            && !self.bands.is_empty()
            && self.bands.len() < other.bands.len()
            && other.bands[..self.bands.len()] == self.bands[..]
    }

    /// Compact rendering used for dedup keys and logging.
    pub fn digest(&self) -> String {
        self.bands.join("")
    }
}
