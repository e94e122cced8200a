//! Segment roles - the fixed meaning of each positional segment.

use std::fmt;

use crate::util::ElementEncoding;

/// Role of a segment, in container order.
///
/// The discriminant is the segment's position in the length table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SegmentRole {
    MeshColors = 0,
    MeshEdgeIndices = 1,
    MeshIndices = 2,
    MeshMatrices = 3,
    MeshEncodedNormals = 4,
    MeshOpacities = 5,
    MeshQuantizedPositions = 6,
    MeshAabbs = 7,
    MeshColorOffsets = 8,
    MeshEdgeIndexOffsets = 9,
    MeshIndexOffsets = 10,
    MeshMatrixOffsets = 11,
    MeshNormalOffsets = 12,
    MeshOpacityOffsets = 13,
    MeshPositionOffsets = 14,
    MeshAabbOffsets = 15,
    EntityMeshIds = 16,
    EntityIds = 17,
    EntityIsObject = 18,
    EntityMeshOffsets = 19,
    PositionsDecodeMatrix = 20,
}

impl SegmentRole {
    /// Number of roles in the supported layout.
    pub const COUNT: usize = 21;

    /// All roles in container order.
    pub const ALL: [SegmentRole; Self::COUNT] = [
        Self::MeshColors,
        Self::MeshEdgeIndices,
        Self::MeshIndices,
        Self::MeshMatrices,
        Self::MeshEncodedNormals,
        Self::MeshOpacities,
        Self::MeshQuantizedPositions,
        Self::MeshAabbs,
        Self::MeshColorOffsets,
        Self::MeshEdgeIndexOffsets,
        Self::MeshIndexOffsets,
        Self::MeshMatrixOffsets,
        Self::MeshNormalOffsets,
        Self::MeshOpacityOffsets,
        Self::MeshPositionOffsets,
        Self::MeshAabbOffsets,
        Self::EntityMeshIds,
        Self::EntityIds,
        Self::EntityIsObject,
        Self::EntityMeshOffsets,
        Self::PositionsDecodeMatrix,
    ];

    /// Position of this role in the container.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Role at the given container position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Element encoding of the decompressed payload.
    pub const fn encoding(self) -> ElementEncoding {
        match self {
            Self::MeshColors
            | Self::MeshMatrices
            | Self::MeshOpacities
            | Self::MeshAabbs
            | Self::PositionsDecodeMatrix => ElementEncoding::Float32,
            Self::MeshEdgeIndices | Self::MeshIndices | Self::MeshQuantizedPositions => {
                ElementEncoding::Uint16
            }
            Self::MeshEncodedNormals => ElementEncoding::Int8,
            Self::EntityIsObject => ElementEncoding::Uint8,
            Self::EntityIds => ElementEncoding::Json,
            Self::MeshColorOffsets
            | Self::MeshEdgeIndexOffsets
            | Self::MeshIndexOffsets
            | Self::MeshMatrixOffsets
            | Self::MeshNormalOffsets
            | Self::MeshOpacityOffsets
            | Self::MeshPositionOffsets
            | Self::MeshAabbOffsets
            | Self::EntityMeshIds
            | Self::EntityMeshOffsets => ElementEncoding::Uint32,
        }
    }

    /// Whether the payload decompresses to text rather than binary.
    #[inline]
    pub const fn is_text(self) -> bool {
        self.encoding().is_text()
    }

    /// Human-readable name used in errors and listings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MeshColors => "mesh colors",
            Self::MeshEdgeIndices => "mesh edge indices",
            Self::MeshIndices => "mesh indices",
            Self::MeshMatrices => "mesh matrices",
            Self::MeshEncodedNormals => "mesh encoded normals",
            Self::MeshOpacities => "mesh opacities",
            Self::MeshQuantizedPositions => "mesh quantized positions",
            Self::MeshAabbs => "mesh aabbs",
            Self::MeshColorOffsets => "mesh color offsets",
            Self::MeshEdgeIndexOffsets => "mesh edge index offsets",
            Self::MeshIndexOffsets => "mesh index offsets",
            Self::MeshMatrixOffsets => "mesh matrix offsets",
            Self::MeshNormalOffsets => "mesh normal offsets",
            Self::MeshOpacityOffsets => "mesh opacity offsets",
            Self::MeshPositionOffsets => "mesh position offsets",
            Self::MeshAabbOffsets => "mesh aabb offsets",
            Self::EntityMeshIds => "entity mesh ids",
            Self::EntityIds => "entity ids",
            Self::EntityIsObject => "entity is-object flags",
            Self::EntityMeshOffsets => "entity mesh offsets",
            Self::PositionsDecodeMatrix => "positions decode matrix",
        }
    }
}

impl fmt::Display for SegmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
