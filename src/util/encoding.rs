//! Element encodings - the numeric types segments are stored as.

use bytemuck::Pod;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// Element encoding of a decompressed segment.
///
/// Every segment role has exactly one encoding. Numeric encodings are
/// little-endian with a fixed element width; `Json` marks the single
/// text segment that is parsed as a JSON array of strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementEncoding {
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Unsigned 32-bit integer
    Uint32 = 5,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 10,
    /// UTF-8 text holding a JSON array of strings
    Json = 12,
}

impl ElementEncoding {
    /// Size in bytes of a single element. Text has no fixed width.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 | Self::Json => 1,
            Self::Uint16 => 2,
            Self::Uint32 | Self::Float32 => 4,
        }
    }

    /// Name of the encoding as used in diagnostics.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
            Self::Json => "json",
        }
    }

    /// True for the text encoding.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for ElementEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric element that can be read from and written to little-endian bytes.
pub trait Element: Pod + Copy + fmt::Debug + PartialEq + Send + Sync {
    /// Encoding tag matching this type.
    const ENCODING: ElementEncoding;

    /// Read one element from the start of `buf` (which holds at least `num_bytes`).
    fn read_le(buf: &[u8]) -> Self;

    /// Append the little-endian bytes of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);
}

impl Element for u8 {
    const ENCODING: ElementEncoding = ElementEncoding::Uint8;

    #[inline]
    fn read_le(buf: &[u8]) -> Self {
        buf[0]
    }

    #[inline]
    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl Element for i8 {
    const ENCODING: ElementEncoding = ElementEncoding::Int8;

    #[inline]
    fn read_le(buf: &[u8]) -> Self {
        buf[0] as i8
    }

    #[inline]
    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }
}

macro_rules! le_element {
    ($ty:ty, $enc:expr, $read:ident, $write:ident, $width:expr) => {
        impl Element for $ty {
            const ENCODING: ElementEncoding = $enc;

            #[inline]
            fn read_le(buf: &[u8]) -> Self {
                LittleEndian::$read(buf)
            }

            #[inline]
            fn write_le(self, out: &mut Vec<u8>) {
                let mut bytes = [0u8; $width];
                LittleEndian::$write(&mut bytes, self);
                out.extend_from_slice(&bytes);
            }
        }
    };
}

le_element!(u16, ElementEncoding::Uint16, read_u16, write_u16, 2);
le_element!(u32, ElementEncoding::Uint32, read_u32, write_u32, 4);
le_element!(f32, ElementEncoding::Float32, read_f32, write_f32, 4);

/// Encode a slice of elements as little-endian bytes.
pub fn encode_elements<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::ENCODING.num_bytes());
    for &v in values {
        v.write_le(&mut out);
    }
    out
}
