//! Offset-table slicing shared by the mesh and entity assemblers.

use std::ops::Range;

/// Range owned by ordinal `i` in a start-offset table.
///
/// Runs from `offsets[i]` to `offsets[i + 1]`, or to `end` for the last
/// ordinal. `None` when the range is decreasing or passes `end`.
#[inline]
pub(crate) fn span(offsets: &[u32], i: usize, end: usize) -> Option<Range<usize>> {
    let start = *offsets.get(i)? as usize;
    let stop = if i + 1 == offsets.len() {
        end
    } else {
        *offsets.get(i + 1)? as usize
    };
    (start <= stop && stop <= end).then_some(start..stop)
}

/// Fixed-width range `[offsets[i], offsets[i] + width)`, `None` past `len`.
#[inline]
pub(crate) fn fixed(offsets: &[u32], i: usize, width: usize, len: usize) -> Option<Range<usize>> {
    let start = *offsets.get(i)? as usize;
    let stop = start.checked_add(width)?;
    (stop <= len).then_some(start..stop)
}
