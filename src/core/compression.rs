//! Segment compression.
//!
//! Every segment payload is an independent zlib stream (deflate with the
//! zlib wrapper).

use std::io::{Read, Write};

use flate2::bufread::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::container::SegmentRole;
use crate::util::{Error, Result};

/// Decompressed payload of one segment.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentPayload {
    /// Raw bytes, reinterpreted later by the typed view builder.
    Binary(Vec<u8>),
    /// UTF-8 text (the entity id list).
    Text(String),
}

impl SegmentPayload {
    /// Size of the decompressed payload in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Binary(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload as bytes, regardless of mode.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }
}

/// Compress data with zlib.
///
/// # Arguments
/// * `data` - Data to compress
/// * `level` - Compression level (0-9, where 0 stores without compression)
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate one segment's zlib stream.
///
/// Output larger than `limit` bytes is rejected without being fully
/// materialized. The stream must consume the whole segment.
pub fn decompress(role: SegmentRole, data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data).take(limit.saturating_add(1) as u64);
    let mut decompressed = Vec::with_capacity(data.len().saturating_mul(4).min(limit));

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::decompression(role, e.to_string()))?;

    if decompressed.len() > limit {
        return Err(Error::decompression(
            role,
            format!("decompressed size exceeds limit of {limit} bytes"),
        ));
    }

    let rest = decoder.into_inner().into_inner();
    if !rest.is_empty() {
        return Err(Error::decompression(
            role,
            format!("{} bytes after end of zlib stream", rest.len()),
        ));
    }
    Ok(decompressed)
}

/// Inflate one segment in the mode its role declares.
pub fn decompress_segment(role: SegmentRole, data: &[u8], limit: usize) -> Result<SegmentPayload> {
    let bytes = decompress(role, data, limit)?;
    if role.is_text() {
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::decompression(role, format!("invalid UTF-8 text: {e}")))?;
        Ok(SegmentPayload::Text(text))
    } else {
        Ok(SegmentPayload::Binary(bytes))
    }
}
