//! Decompressed segments and the typed arrays viewed over them.

use std::borrow::Cow;

use glam::Mat4;
use rayon::prelude::*;

use super::compression::{decompress_segment, SegmentPayload};
use super::options::DecodeOptions;
use super::typed::{parse_string_array, reinterpret};
use crate::container::{Container, Segment, SegmentRole, MATRIX_ELEMENTS};
use crate::util::{Element, Error, Result};

/// Every segment of one container, decompressed, in role order.
///
/// Owned per load; nothing here outlives the load that produced it.
#[derive(Debug)]
pub struct DecompressedSegments {
    payloads: Vec<SegmentPayload>,
}

impl DecompressedSegments {
    /// Decompress all segments of a parsed container.
    pub fn decompress(container: &Container<'_>, options: &DecodeOptions) -> Result<Self> {
        let limit = options.max_segment_bytes;
        let inflate = |seg: &Segment<'_>| decompress_segment(seg.role, seg.data, limit);

        let payloads = if options.parallel {
            container.segments().par_iter().map(inflate).collect::<Result<Vec<_>>>()?
        } else {
            container.segments().iter().map(inflate).collect::<Result<Vec<_>>>()?
        };

        tracing::debug!(
            compressed = container.payload_size(),
            decompressed = payloads.iter().map(SegmentPayload::len).sum::<usize>(),
            parallel = options.parallel,
            "decompressed segments"
        );
        Ok(Self { payloads })
    }

    /// Decompressed payload of a role.
    #[inline]
    pub fn payload(&self, role: SegmentRole) -> &SegmentPayload {
        &self.payloads[role.index()]
    }

    /// Payloads in role order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentRole, &SegmentPayload)> {
        SegmentRole::ALL.iter().copied().zip(self.payloads.iter())
    }

    fn typed<T: Element>(&self, role: SegmentRole) -> Result<Cow<'_, [T]>> {
        reinterpret(role, self.payload(role).as_bytes())
    }

    fn text(&self, role: SegmentRole) -> Result<&str> {
        match self.payload(role) {
            SegmentPayload::Text(text) => Ok(text),
            SegmentPayload::Binary(_) => Err(Error::reinterpret(role, "expected text payload")),
        }
    }

    /// Build typed views over every segment.
    pub fn arrays(&self) -> Result<SceneArrays<'_>> {
        use SegmentRole::*;

        let meshes = MeshArrays {
            colors: self.typed(MeshColors)?,
            edge_indices: self.typed(MeshEdgeIndices)?,
            indices: self.typed(MeshIndices)?,
            matrices: self.typed(MeshMatrices)?,
            encoded_normals: self.typed(MeshEncodedNormals)?,
            opacities: self.typed(MeshOpacities)?,
            quantized_positions: self.typed(MeshQuantizedPositions)?,
            aabbs: self.typed(MeshAabbs)?,
            color_offsets: self.typed(MeshColorOffsets)?,
            edge_index_offsets: self.typed(MeshEdgeIndexOffsets)?,
            index_offsets: self.typed(MeshIndexOffsets)?,
            matrix_offsets: self.typed(MeshMatrixOffsets)?,
            normal_offsets: self.typed(MeshNormalOffsets)?,
            opacity_offsets: self.typed(MeshOpacityOffsets)?,
            position_offsets: self.typed(MeshPositionOffsets)?,
            aabb_offsets: self.typed(MeshAabbOffsets)?,
        };

        let entities = EntityArrays {
            mesh_ids: self.typed(EntityMeshIds)?,
            ids: parse_string_array(EntityIds, self.text(EntityIds)?)?,
            is_object: self.typed(EntityIsObject)?,
            mesh_offsets: self.typed(EntityMeshOffsets)?,
        };

        let decode = self.typed::<f32>(PositionsDecodeMatrix)?;
        if decode.len() != MATRIX_ELEMENTS {
            return Err(Error::reinterpret(
                PositionsDecodeMatrix,
                format!("expected {MATRIX_ELEMENTS} elements, found {}", decode.len()),
            ));
        }

        Ok(SceneArrays {
            meshes,
            entities,
            positions_decode_matrix: Mat4::from_cols_slice(&decode),
        })
    }
}

/// Flat mesh attribute arrays and their per-mesh offset arrays.
#[derive(Debug, Clone)]
pub struct MeshArrays<'a> {
    pub colors: Cow<'a, [f32]>,
    pub edge_indices: Cow<'a, [u16]>,
    pub indices: Cow<'a, [u16]>,
    pub matrices: Cow<'a, [f32]>,
    pub encoded_normals: Cow<'a, [i8]>,
    pub opacities: Cow<'a, [f32]>,
    pub quantized_positions: Cow<'a, [u16]>,
    pub aabbs: Cow<'a, [f32]>,

    pub color_offsets: Cow<'a, [u32]>,
    pub edge_index_offsets: Cow<'a, [u32]>,
    pub index_offsets: Cow<'a, [u32]>,
    pub matrix_offsets: Cow<'a, [u32]>,
    pub normal_offsets: Cow<'a, [u32]>,
    pub opacity_offsets: Cow<'a, [u32]>,
    pub position_offsets: Cow<'a, [u32]>,
    pub aabb_offsets: Cow<'a, [u32]>,
}

impl MeshArrays<'_> {
    /// Mesh count, taken from the color offsets.
    #[inline]
    pub fn num_meshes(&self) -> usize {
        self.color_offsets.len()
    }
}

/// Per-entity arrays.
#[derive(Debug, Clone)]
pub struct EntityArrays<'a> {
    /// Mesh ordinals in entity order, as written by the producer.
    pub mesh_ids: Cow<'a, [u32]>,
    pub ids: Vec<String>,
    pub is_object: Cow<'a, [u8]>,
    pub mesh_offsets: Cow<'a, [u32]>,
}

impl EntityArrays<'_> {
    /// Entity count, taken from the id list.
    #[inline]
    pub fn num_entities(&self) -> usize {
        self.ids.len()
    }
}

/// Typed views over a whole container.
#[derive(Debug, Clone)]
pub struct SceneArrays<'a> {
    pub meshes: MeshArrays<'a>,
    pub entities: EntityArrays<'a>,
    pub positions_decode_matrix: Mat4,
}
