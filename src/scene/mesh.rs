//! Mesh assembler - cuts the flat attribute arrays into per-mesh records.

use std::ops::Range;

use glam::Mat4;

use super::ranges::{fixed, span};
use crate::container::{SegmentRole, AABB_ELEMENTS, MATRIX_ELEMENTS};
use crate::core::MeshArrays;
use crate::util::{Error, Result};

/// Primitive topology of a decoded mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Primitive {
    #[default]
    Triangles,
}

/// One reconstructed mesh, ready for the sink.
///
/// Positions stay quantized; the sink applies `positions_decode_matrix`.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMesh {
    /// `<model id>.<ordinal>`
    pub id: String,
    pub color: Vec<f32>,
    pub edge_indices: Vec<u16>,
    pub indices: Vec<u16>,
    pub matrix: Mat4,
    pub encoded_normals: Vec<i8>,
    pub opacity: f32,
    pub quantized_positions: Vec<u16>,
    /// min xyz, max xyz
    pub aabb: [f32; AABB_ELEMENTS],
    pub positions_decode_matrix: Mat4,
    pub primitive: Primitive,
    pub is_quantized: bool,
    pub is_transformed_and_encoded: bool,
}

impl DecodedMesh {
    /// Number of triangles described by the index list.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quantized vertices (three components each).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.quantized_positions.len() / 3
    }
}

/// Id of the mesh at `ordinal` within `model_id`.
#[inline]
pub fn mesh_id(model_id: &str, ordinal: usize) -> String {
    format!("{model_id}.{ordinal}")
}

/// Reassemble every mesh of a container.
///
/// The mesh count is the length of the color offsets; every other offset
/// table must agree with it.
pub fn assemble_meshes(
    model_id: &str,
    arrays: &MeshArrays<'_>,
    positions_decode_matrix: Mat4,
) -> Result<Vec<DecodedMesh>> {
    let num_meshes = arrays.num_meshes();
    check_offset_counts(arrays, num_meshes)?;

    let mut meshes = Vec::with_capacity(num_meshes);
    for i in 0..num_meshes {
        let color = slice(SegmentRole::MeshColorOffsets, &arrays.color_offsets, &arrays.colors, i)?;
        let edge_indices =
            slice(SegmentRole::MeshEdgeIndexOffsets, &arrays.edge_index_offsets, &arrays.edge_indices, i)?;
        let indices = slice(SegmentRole::MeshIndexOffsets, &arrays.index_offsets, &arrays.indices, i)?;
        let encoded_normals =
            slice(SegmentRole::MeshNormalOffsets, &arrays.normal_offsets, &arrays.encoded_normals, i)?;
        let quantized_positions = slice(
            SegmentRole::MeshPositionOffsets,
            &arrays.position_offsets,
            &arrays.quantized_positions,
            i,
        )?;

        let matrix_range = fixed_range(
            SegmentRole::MeshMatrixOffsets,
            &arrays.matrix_offsets,
            i,
            MATRIX_ELEMENTS,
            arrays.matrices.len(),
        )?;
        let aabb_range = fixed_range(
            SegmentRole::MeshAabbOffsets,
            &arrays.aabb_offsets,
            i,
            AABB_ELEMENTS,
            arrays.aabbs.len(),
        )?;
        let mut aabb = [0.0; AABB_ELEMENTS];
        aabb.copy_from_slice(&arrays.aabbs[aabb_range]);

        let opacity_at = arrays.opacity_offsets[i] as usize;
        let opacity = *arrays.opacities.get(opacity_at).ok_or_else(|| {
            Error::mesh_segments(format!(
                "mesh {i}: opacity offset {opacity_at} outside {} opacities",
                arrays.opacities.len()
            ))
        })?;

        meshes.push(DecodedMesh {
            id: mesh_id(model_id, i),
            color,
            edge_indices,
            indices,
            matrix: Mat4::from_cols_slice(&arrays.matrices[matrix_range]),
            encoded_normals,
            opacity,
            quantized_positions,
            aabb,
            positions_decode_matrix,
            primitive: Primitive::Triangles,
            is_quantized: true,
            is_transformed_and_encoded: true,
        });
    }

    tracing::debug!(model_id, meshes = meshes.len(), "assembled meshes");
    Ok(meshes)
}

fn check_offset_counts(arrays: &MeshArrays<'_>, num_meshes: usize) -> Result<()> {
    let tables: [(SegmentRole, usize); 7] = [
        (SegmentRole::MeshEdgeIndexOffsets, arrays.edge_index_offsets.len()),
        (SegmentRole::MeshIndexOffsets, arrays.index_offsets.len()),
        (SegmentRole::MeshMatrixOffsets, arrays.matrix_offsets.len()),
        (SegmentRole::MeshNormalOffsets, arrays.normal_offsets.len()),
        (SegmentRole::MeshOpacityOffsets, arrays.opacity_offsets.len()),
        (SegmentRole::MeshPositionOffsets, arrays.position_offsets.len()),
        (SegmentRole::MeshAabbOffsets, arrays.aabb_offsets.len()),
    ];
    for (role, len) in tables {
        if len != num_meshes {
            return Err(Error::mesh_segments(format!(
                "'{role}' has {len} entries, '{}' has {num_meshes}",
                SegmentRole::MeshColorOffsets
            )));
        }
    }
    Ok(())
}

fn slice<T: Copy>(role: SegmentRole, offsets: &[u32], values: &[T], i: usize) -> Result<Vec<T>> {
    span(offsets, i, values.len())
        .map(|range| values[range].to_vec())
        .ok_or_else(|| out_of_range(role, offsets, i, values.len()))
}

fn fixed_range(
    role: SegmentRole,
    offsets: &[u32],
    i: usize,
    width: usize,
    len: usize,
) -> Result<Range<usize>> {
    fixed(offsets, i, width, len).ok_or_else(|| out_of_range(role, offsets, i, len))
}

fn out_of_range(role: SegmentRole, offsets: &[u32], i: usize, len: usize) -> Error {
    Error::mesh_segments(format!(
        "mesh {i}: '{role}' entry {} does not fit {len} elements",
        offsets[i]
    ))
}
