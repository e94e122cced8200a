//! Scene reconstruction - from container bytes to mesh and entity records.
//!
//! This module contains:
//! - [`assemble_meshes`] / [`DecodedMesh`] - per-mesh slices of the flat arrays
//! - [`assemble_entities`] / [`DecodedEntity`] - mesh id groups
//! - [`reconstruct`] - the whole decode pipeline for one buffer
//! - [`SceneBuilder`] - the inverse, for producing containers

mod builder;
mod entity;
mod mesh;
mod ranges;

pub use builder::{EntityData, MeshData, SceneBuilder, SceneDescription};
pub use entity::{assemble_entities, DecodedEntity};
pub use mesh::{assemble_meshes, mesh_id, DecodedMesh, Primitive};

use crate::container::{Container, TILE_SUFFIX};
use crate::core::{DecodeOptions, DecompressedSegments};
use crate::util::Result;

/// Everything one container decodes to, ready for delivery to a sink.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedScene {
    pub model_id: String,
    pub tile_id: String,
    /// In ordinal order.
    pub meshes: Vec<DecodedMesh>,
    pub entities: Vec<DecodedEntity>,
}

impl DecodedScene {
    #[inline]
    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }
}

/// Tile id for a model.
#[inline]
pub fn tile_id(model_id: &str) -> String {
    format!("{model_id}{TILE_SUFFIX}")
}

/// Decode a container buffer into meshes and entities.
///
/// Runs parse, decompression, typed reinterpretation and both assemblers.
/// Any failure aborts the whole decode.
#[tracing::instrument(skip_all, fields(model_id = %model_id, bytes = buf.len()))]
pub fn reconstruct(model_id: &str, buf: &[u8], options: &DecodeOptions) -> Result<DecodedScene> {
    let container = Container::parse(buf)?;
    let segments = DecompressedSegments::decompress(&container, options)?;
    let arrays = segments.arrays()?;

    let meshes = assemble_meshes(model_id, &arrays.meshes, arrays.positions_decode_matrix)?;
    let entities = assemble_entities(model_id, &arrays.entities, meshes.len())?;

    Ok(DecodedScene {
        model_id: model_id.to_string(),
        tile_id: tile_id(model_id),
        meshes,
        entities,
    })
}
