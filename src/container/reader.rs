//! Container reader - slices a raw buffer into its compressed segments.

use byteorder::{ByteOrder, LittleEndian};

use super::format::*;
use super::SegmentRole;
use crate::util::{Error, Result};

/// One still-compressed segment, borrowed from the container buffer.
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    pub role: SegmentRole,
    pub data: &'a [u8],
}

impl Segment<'_> {
    /// Compressed size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A parsed container: the table of contents resolved into segment slices.
///
/// Segments are contiguous, non-overlapping views into the original buffer,
/// stored in role order.
#[derive(Debug)]
pub struct Container<'a> {
    segments: Vec<Segment<'a>>,
    size: usize,
}

impl<'a> Container<'a> {
    /// Parse the header and length table of `buf`.
    ///
    /// The buffer must hold exactly [`SEGMENT_COUNT`] segments and nothing
    /// past the last one.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let count = read_u32_at(buf, 0)?;
        if count != SEGMENT_COUNT {
            return Err(Error::malformed(format!(
                "segment count {count}, expected {SEGMENT_COUNT}"
            )));
        }
        let count = count as usize;

        let start = data_offset(count);
        if buf.len() < start {
            return Err(Error::malformed(format!(
                "length table needs {start} bytes, buffer has {}",
                buf.len()
            )));
        }

        let mut segments = Vec::with_capacity(count);
        let mut pos = start;
        for (i, role) in SegmentRole::ALL.iter().enumerate() {
            let len = read_u32_at(buf, COUNT_SIZE + i * LENGTH_ENTRY_SIZE)? as usize;
            let end = pos
                .checked_add(len)
                .filter(|&end| end <= buf.len())
                .ok_or_else(|| {
                    Error::malformed(format!(
                        "segment '{role}' declares {len} bytes at offset {pos}, only {} remain",
                        buf.len() - pos
                    ))
                })?;
            segments.push(Segment { role: *role, data: &buf[pos..end] });
            pos = end;
        }

        if pos != buf.len() {
            return Err(Error::malformed(format!(
                "{} trailing bytes after last segment",
                buf.len() - pos
            )));
        }

        tracing::trace!(segments = count, bytes = buf.len(), "parsed container header");
        Ok(Self { segments, size: buf.len() })
    }

    /// All segments in role order.
    #[inline]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// The segment holding the given role.
    #[inline]
    pub fn segment(&self, role: SegmentRole) -> Segment<'a> {
        self.segments[role.index()]
    }

    /// Total size of the container buffer in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total compressed payload bytes across all segments.
    pub fn payload_size(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// Read a little-endian u32 at `pos`, failing on a short buffer.
fn read_u32_at(buf: &[u8], pos: usize) -> Result<u32> {
    if buf.len() < pos + 4 {
        return Err(Error::malformed(format!(
            "buffer of {} bytes truncated inside header at offset {pos}",
            buf.len()
        )));
    }
    Ok(LittleEndian::read_u32(&buf[pos..pos + 4]))
}
