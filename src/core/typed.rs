//! Typed view builder - reinterprets decompressed bytes as numeric arrays.

use std::borrow::Cow;

use crate::container::SegmentRole;
use crate::util::{Element, Error, Result};

/// Reinterpret `bytes` as little-endian elements of type `T`.
///
/// Borrows the buffer when the host is little-endian and the bytes happen to
/// be aligned for `T`; otherwise decodes into an owned vector. `T` must be the
/// role's declared encoding and the byte length a multiple of its width.
pub fn reinterpret<T: Element>(role: SegmentRole, bytes: &[u8]) -> Result<Cow<'_, [T]>> {
    if role.encoding() != T::ENCODING {
        return Err(Error::reinterpret(
            role,
            format!("role stores {}, requested {}", role.encoding(), T::ENCODING),
        ));
    }

    let width = T::ENCODING.num_bytes();
    if bytes.len() % width != 0 {
        return Err(Error::reinterpret(
            role,
            format!("{} bytes is not a multiple of the {width}-byte {} width", bytes.len(), T::ENCODING),
        ));
    }

    if cfg!(target_endian = "little") {
        if let Ok(view) = bytemuck::try_cast_slice::<u8, T>(bytes) {
            return Ok(Cow::Borrowed(view));
        }
    }

    Ok(Cow::Owned(bytes.chunks_exact(width).map(T::read_le).collect()))
}

/// Parse the entity id text as a JSON array of strings.
pub fn parse_string_array(role: SegmentRole, text: &str) -> Result<Vec<String>> {
    // An empty payload carries no entities.
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| Error::reinterpret(role, format!("expected JSON string array: {e}")))
}
