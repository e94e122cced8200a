//! Decode options.

use serde::{Deserialize, Serialize};

/// Default cap on a single decompressed segment (1 GiB).
pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 1024 * 1024 * 1024;

/// Options controlling segment decompression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Decompress segments on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Largest decompressed size accepted for any one segment.
    pub max_segment_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
        }
    }
}

impl DecodeOptions {
    /// Options for sequential decompression.
    pub fn sequential() -> Self {
        Self { parallel: false, ..Self::default() }
    }
}
