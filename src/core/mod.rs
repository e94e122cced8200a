//! Core decode stages between the container and the scene records.
//!
//! This module provides:
//! - [`decompress`] / [`decompress_segment`] - zlib inflation per segment
//! - [`reinterpret`] - checked typed views over decompressed bytes
//! - [`DecompressedSegments`] / [`SceneArrays`] - a whole container, decoded
//! - [`DecodeOptions`] - parallelism and size limits

mod compression;
mod options;
mod segments;
mod typed;

pub use compression::{compress, decompress, decompress_segment, SegmentPayload};
pub use options::{DecodeOptions, DEFAULT_MAX_SEGMENT_BYTES};
pub use segments::{DecompressedSegments, EntityArrays, MeshArrays, SceneArrays};
pub use typed::{parse_string_array, reinterpret};
