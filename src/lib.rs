//! # batchmesh
//!
//! Decoder for batch-compressed, pre-quantized 3D scene containers.
//!
//! A container packs a whole scene into 21 zlib-compressed segments: flat
//! attribute arrays shared by every mesh, per-mesh offset tables into them,
//! and per-entity metadata. This crate parses the container, inflates and
//! reinterprets each segment, and reassembles the flattened arrays into one
//! record per mesh and per entity for a scene-graph sink.
//!
//! ## Modules
//!
//! - [`util`] - Element encodings and errors
//! - [`container`] - Low-level container layout (reader and writer)
//! - [`core`] - Decompression and typed views
//! - [`scene`] - Mesh and entity reconstruction
//! - [`loader`] - Sources, sinks, the load orchestrator and worker
//!
//! ## Example
//!
//! ```ignore
//! use batchmesh::prelude::*;
//!
//! let loader = Loader::default();
//! let mut sink = RecordingSink::new();
//! let outcome = loader.load(&LoadParams::new("site.bin"), &FileSource::new(), &mut sink)?;
//!
//! println!("{}: {} meshes", outcome.model_id, outcome.num_meshes);
//! ```

pub mod util;
pub mod container;
pub mod core;
pub mod scene;
pub mod loader;

// Re-export commonly used types
pub use util::{Error, LoadError, Result};
pub use scene::{reconstruct, DecodedEntity, DecodedMesh, DecodedScene};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, LoadError, Result};
    pub use crate::container::{Container, ContainerWriter, SegmentRole};
    pub use crate::core::DecodeOptions;
    pub use crate::scene::{reconstruct, DecodedEntity, DecodedMesh, DecodedScene, MeshData, SceneBuilder};
    pub use crate::loader::{
        ByteSource, FileSource, LoadOutcome, LoadParams, LoadWorker, Loader, LoaderConfig, MemorySource,
        RecordingSink, SceneSink,
    };
}
