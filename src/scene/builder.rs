//! Scene builder - flattens per-entity meshes into a container.
//!
//! This is the inverse of the assemblers: meshes are concatenated into the
//! flat attribute arrays in entity order and each mesh records its start
//! offsets.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::container::{ContainerWriter, SegmentRole, AABB_ELEMENTS, MATRIX_ELEMENTS};
use crate::util::{Error, Result};

fn identity() -> [f32; MATRIX_ELEMENTS] {
    Mat4::IDENTITY.to_cols_array()
}

fn full_opacity() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

/// Source data for one mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    #[serde(default)]
    pub color: Vec<f32>,
    #[serde(default)]
    pub edge_indices: Vec<u16>,
    #[serde(default)]
    pub indices: Vec<u16>,
    #[serde(default = "identity")]
    pub matrix: [f32; MATRIX_ELEMENTS],
    #[serde(default)]
    pub encoded_normals: Vec<i8>,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub quantized_positions: Vec<u16>,
    #[serde(default)]
    pub aabb: [f32; AABB_ELEMENTS],
}

impl Default for MeshData {
    fn default() -> Self {
        Self {
            color: Vec::new(),
            edge_indices: Vec::new(),
            indices: Vec::new(),
            matrix: identity(),
            encoded_normals: Vec::new(),
            opacity: full_opacity(),
            quantized_positions: Vec::new(),
            aabb: [0.0; AABB_ELEMENTS],
        }
    }
}

/// Source data for one entity and the meshes it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub id: String,
    #[serde(default = "yes")]
    pub is_object: bool,
    #[serde(default)]
    pub meshes: Vec<MeshData>,
}

/// JSON description of a whole scene, as accepted by `batchmesh pack`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "identity")]
    pub positions_decode_matrix: [f32; MATRIX_ELEMENTS],
    #[serde(default)]
    pub entities: Vec<EntityData>,
}

/// Accumulates entities and writes them as a container.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    positions_decode_matrix: Mat4,
    meshes: Vec<MeshData>,
    entities: Vec<(String, bool, usize)>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            positions_decode_matrix: Mat4::IDENTITY,
            meshes: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Builder holding every entity of a description.
    pub fn from_description(desc: SceneDescription) -> Self {
        let mut builder = Self::new();
        builder.positions_decode_matrix = Mat4::from_cols_array(&desc.positions_decode_matrix);
        for entity in desc.entities {
            builder.add_entity(entity.id, entity.is_object, entity.meshes);
        }
        builder
    }

    /// Set the shared positions decode matrix.
    pub fn positions_decode_matrix(&mut self, matrix: Mat4) -> &mut Self {
        self.positions_decode_matrix = matrix;
        self
    }

    /// Append an entity; its meshes take the next mesh ordinals.
    pub fn add_entity(
        &mut self,
        id: impl Into<String>,
        is_object: bool,
        meshes: impl IntoIterator<Item = MeshData>,
    ) -> &mut Self {
        self.entities.push((id.into(), is_object, self.meshes.len()));
        self.meshes.extend(meshes);
        self
    }

    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    /// Flatten into the writer's 21 segments.
    pub fn write(&self, writer: &mut ContainerWriter) -> Result<()> {
        let mut colors = Vec::new();
        let mut edge_indices = Vec::new();
        let mut indices = Vec::new();
        let mut matrices = Vec::with_capacity(self.meshes.len() * MATRIX_ELEMENTS);
        let mut normals = Vec::new();
        let mut opacities = Vec::with_capacity(self.meshes.len());
        let mut positions = Vec::new();
        let mut aabbs = Vec::with_capacity(self.meshes.len() * AABB_ELEMENTS);

        let mut color_offsets = Vec::with_capacity(self.meshes.len());
        let mut edge_index_offsets = Vec::with_capacity(self.meshes.len());
        let mut index_offsets = Vec::with_capacity(self.meshes.len());
        let mut matrix_offsets = Vec::with_capacity(self.meshes.len());
        let mut normal_offsets = Vec::with_capacity(self.meshes.len());
        let mut opacity_offsets = Vec::with_capacity(self.meshes.len());
        let mut position_offsets = Vec::with_capacity(self.meshes.len());
        let mut aabb_offsets = Vec::with_capacity(self.meshes.len());

        for mesh in &self.meshes {
            color_offsets.push(offset(colors.len())?);
            colors.extend_from_slice(&mesh.color);
            edge_index_offsets.push(offset(edge_indices.len())?);
            edge_indices.extend_from_slice(&mesh.edge_indices);
            index_offsets.push(offset(indices.len())?);
            indices.extend_from_slice(&mesh.indices);
            matrix_offsets.push(offset(matrices.len())?);
            matrices.extend_from_slice(&mesh.matrix);
            normal_offsets.push(offset(normals.len())?);
            normals.extend_from_slice(&mesh.encoded_normals);
            opacity_offsets.push(offset(opacities.len())?);
            opacities.push(mesh.opacity);
            position_offsets.push(offset(positions.len())?);
            positions.extend_from_slice(&mesh.quantized_positions);
            aabb_offsets.push(offset(aabbs.len())?);
            aabbs.extend_from_slice(&mesh.aabb);
        }

        let mesh_ids = (0..self.meshes.len()).map(offset).collect::<Result<Vec<_>>>()?;
        let ids: Vec<String> = self.entities.iter().map(|(id, _, _)| id.clone()).collect();
        let is_object: Vec<u8> = self.entities.iter().map(|&(_, obj, _)| u8::from(obj)).collect();
        let mesh_offsets = self
            .entities
            .iter()
            .map(|&(_, _, start)| offset(start))
            .collect::<Result<Vec<_>>>()?;

        writer
            .set_elements(SegmentRole::MeshColors, &colors)?
            .set_elements(SegmentRole::MeshEdgeIndices, &edge_indices)?
            .set_elements(SegmentRole::MeshIndices, &indices)?
            .set_elements(SegmentRole::MeshMatrices, &matrices)?
            .set_elements(SegmentRole::MeshEncodedNormals, &normals)?
            .set_elements(SegmentRole::MeshOpacities, &opacities)?
            .set_elements(SegmentRole::MeshQuantizedPositions, &positions)?
            .set_elements(SegmentRole::MeshAabbs, &aabbs)?
            .set_elements(SegmentRole::MeshColorOffsets, &color_offsets)?
            .set_elements(SegmentRole::MeshEdgeIndexOffsets, &edge_index_offsets)?
            .set_elements(SegmentRole::MeshIndexOffsets, &index_offsets)?
            .set_elements(SegmentRole::MeshMatrixOffsets, &matrix_offsets)?
            .set_elements(SegmentRole::MeshNormalOffsets, &normal_offsets)?
            .set_elements(SegmentRole::MeshOpacityOffsets, &opacity_offsets)?
            .set_elements(SegmentRole::MeshPositionOffsets, &position_offsets)?
            .set_elements(SegmentRole::MeshAabbOffsets, &aabb_offsets)?
            .set_elements(SegmentRole::EntityMeshIds, &mesh_ids)?
            .set_strings(SegmentRole::EntityIds, &ids)?
            .set_elements(SegmentRole::EntityIsObject, &is_object)?
            .set_elements(SegmentRole::EntityMeshOffsets, &mesh_offsets)?
            .set_elements(
                SegmentRole::PositionsDecodeMatrix,
                &self.positions_decode_matrix.to_cols_array(),
            )?;
        Ok(())
    }

    /// Build the container bytes at the given compression level.
    pub fn build(&self, level: u32) -> Result<Vec<u8>> {
        let mut writer = ContainerWriter::new(level);
        self.write(&mut writer)?;
        writer.finish()
    }
}

fn offset(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::malformed(format!("offset {len} exceeds u32 range")))
}
