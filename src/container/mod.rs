//! Low-level container format.
//!
//! A container is a length-prefixed table of independently compressed
//! segments. All integers are little-endian.
//!
//! ## Layout
//!
//! ```text
//! +----------------------+
//! | K: segment count     |  u32 (21)
//! +----------------------+
//! | length[0..K]         |  K x u32
//! +----------------------+
//! | segment 0 payload    |  length[0] bytes, zlib
//! | ...                  |
//! | segment K-1 payload  |
//! +----------------------+
//! ```
//!
//! The meaning of each segment is fixed by its position, see [`SegmentRole`].

mod format;
mod reader;
mod role;
mod writer;

pub use format::*;
pub use reader::*;
pub use role::*;
pub use writer::*;
