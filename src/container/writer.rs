//! Container writer - assembles role payloads into a container buffer.

use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::format::*;
use super::SegmentRole;
use crate::core::compress;
use crate::util::{encode_elements, Element, Error, Result};

/// Builds a container from per-role payloads.
///
/// Payloads are compressed as they are set. Roles never set are written as
/// an empty compressed payload.
pub struct ContainerWriter {
    level: u32,
    payloads: Vec<Option<Vec<u8>>>,
}

impl ContainerWriter {
    /// Create a writer compressing at the given zlib level (0-9).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
            payloads: vec![None; SegmentRole::COUNT],
        }
    }

    /// Set an already-compressed payload verbatim.
    pub fn set_raw(&mut self, role: SegmentRole, compressed: Vec<u8>) -> &mut Self {
        self.payloads[role.index()] = Some(compressed);
        self
    }

    /// Compress and set an arbitrary byte payload.
    pub fn set_bytes(&mut self, role: SegmentRole, bytes: &[u8]) -> Result<&mut Self> {
        let compressed = compress(bytes, self.level)?;
        Ok(self.set_raw(role, compressed))
    }

    /// Encode typed elements little-endian, compress and set them.
    ///
    /// The element type must match the role's encoding.
    pub fn set_elements<T: Element>(&mut self, role: SegmentRole, values: &[T]) -> Result<&mut Self> {
        if role.encoding() != T::ENCODING {
            return Err(Error::reinterpret(
                role,
                format!("role stores {}, got {}", role.encoding(), T::ENCODING),
            ));
        }
        self.set_bytes(role, &encode_elements(values))
    }

    /// Serialize strings as a JSON array and set them on a text role.
    pub fn set_strings(&mut self, role: SegmentRole, values: &[String]) -> Result<&mut Self> {
        if !role.is_text() {
            return Err(Error::reinterpret(role, "role does not hold text"));
        }
        let json = serde_json::to_string(values)
            .map_err(|e| Error::reinterpret(role, e.to_string()))?;
        self.set_bytes(role, json.as_bytes())
    }

    /// Produce the container bytes.
    pub fn finish(&self) -> Result<Vec<u8>> {
        let empty = compress(&[], self.level)?;
        let payloads: Vec<&[u8]> = self
            .payloads
            .iter()
            .map(|p| p.as_deref().unwrap_or(empty.as_slice()))
            .collect();

        let total: usize = payloads.iter().map(|p| p.len()).sum();
        let mut out = Vec::with_capacity(data_offset(payloads.len()) + total);
        out.write_u32::<LittleEndian>(SEGMENT_COUNT)?;
        for payload in &payloads {
            let len = u32::try_from(payload.len())
                .map_err(|_| Error::malformed("segment larger than 4 GiB"))?;
            out.write_u32::<LittleEndian>(len)?;
        }
        for payload in &payloads {
            out.extend_from_slice(payload);
        }
        Ok(out)
    }

    /// Write the container to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.finish()?)?;
        Ok(())
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new(6)
    }
}
