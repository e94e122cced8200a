//! Utility types shared by every stage of the decoder.
//!
//! - [`ElementEncoding`] / [`Element`] - Numeric segment encodings
//! - [`Error`] / [`Result`] / [`LoadError`] - Error handling

mod encoding;
mod error;

pub use encoding::*;
pub use error::*;
