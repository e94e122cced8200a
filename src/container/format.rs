//! Container format constants.

use super::SegmentRole;

/// Size of the segment count field at the start of the buffer.
pub const COUNT_SIZE: usize = 4;

/// Size of one entry in the segment length table.
pub const LENGTH_ENTRY_SIZE: usize = 4;

/// Segment count of the supported layout.
pub const SEGMENT_COUNT: u32 = SegmentRole::COUNT as u32;

/// Number of elements in a mesh transform.
pub const MATRIX_ELEMENTS: usize = 16;

/// Number of elements in a mesh bounding box (min xyz, max xyz).
pub const AABB_ELEMENTS: usize = 6;

/// Suffix appended to the model id to name its tile.
pub const TILE_SUFFIX: &str = "_tile";

/// Offset at which segment payloads begin for `count` segments.
#[inline]
pub const fn data_offset(count: usize) -> usize {
    COUNT_SIZE + count * LENGTH_ENTRY_SIZE
}
