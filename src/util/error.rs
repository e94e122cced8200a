//! Error types for the batchmesh library.

use thiserror::Error;

use crate::container::SegmentRole;

/// Main error type for container decoding and loading.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte source could not deliver the container
    #[error("Failed to fetch '{src}': {message}")]
    Fetch { src: String, message: String },

    /// Header or length table is inconsistent with the buffer
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// A segment's compressed stream could not be inflated
    #[error("Failed to decompress segment '{role}': {message}")]
    Decompression { role: SegmentRole, message: String },

    /// A segment's bytes do not fit its declared element encoding
    #[error("Cannot reinterpret segment '{role}': {message}")]
    TypeReinterpretation { role: SegmentRole, message: String },

    /// Mesh offset arrays disagree with each other or with their flat arrays
    #[error("Inconsistent mesh segments: {0}")]
    InconsistentMeshSegments(String),

    /// Entity arrays disagree with each other or with the mesh count
    #[error("Inconsistent entity segments: {0}")]
    InconsistentEntitySegments(String),

    /// Requested model id is already taken and the policy rejects collisions
    #[error("Model id already exists: {0}")]
    DuplicateModelId(String),

    /// Loader configuration could not be read
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed container error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }

    /// Create a fetch error for the given source.
    pub fn fetch(src: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch { src: src.into(), message: msg.into() }
    }

    /// Create a decompression error for a segment role.
    pub fn decompression(role: SegmentRole, msg: impl Into<String>) -> Self {
        Self::Decompression { role, message: msg.into() }
    }

    /// Create a type reinterpretation error for a segment role.
    pub fn reinterpret(role: SegmentRole, msg: impl Into<String>) -> Self {
        Self::TypeReinterpretation { role, message: msg.into() }
    }

    /// Create an inconsistent mesh segments error.
    pub fn mesh_segments(msg: impl Into<String>) -> Self {
        Self::InconsistentMeshSegments(msg.into())
    }

    /// Create an inconsistent entity segments error.
    pub fn entity_segments(msg: impl Into<String>) -> Self {
        Self::InconsistentEntitySegments(msg.into())
    }
}

/// Result type alias for batchmesh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed load, tagged with the model it was loading.
#[derive(Error, Debug)]
#[error("Failed to load model '{model_id}': {source}")]
pub struct LoadError {
    pub model_id: String,
    #[source]
    pub source: Error,
}

impl LoadError {
    pub fn new(model_id: impl Into<String>, source: Error) -> Self {
        Self { model_id: model_id.into(), source }
    }
}
