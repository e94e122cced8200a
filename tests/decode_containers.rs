//! Integration tests for decoding containers built with the writer side.

use batchmesh::container::{Container, ContainerWriter, SegmentRole, SEGMENT_COUNT};
use batchmesh::core::{compress, DecodeOptions, DecompressedSegments};
use batchmesh::scene::{reconstruct, EntityData, MeshData, SceneBuilder, SceneDescription};
use batchmesh::Error;
use glam::Mat4;

fn triangle(shade: f32, opacity: f32) -> MeshData {
    MeshData {
        color: vec![shade, shade, shade],
        edge_indices: vec![0, 1, 1, 2, 2, 0],
        indices: vec![0, 1, 2],
        encoded_normals: vec![0, 0, 127, 0, 0, 127, 0, 0, 127],
        opacity,
        quantized_positions: vec![0, 0, 0, 65535, 0, 0, 0, 65535, 0],
        aabb: [0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
        ..Default::default()
    }
}

fn site() -> SceneBuilder {
    let mut builder = SceneBuilder::new();
    builder
        .positions_decode_matrix(Mat4::from_scale(glam::Vec3::splat(1.0 / 65535.0)))
        .add_entity("wall", true, vec![triangle(1.0, 1.0), triangle(0.5, 0.25)])
        .add_entity("grid", false, vec![])
        .add_entity("door", true, vec![triangle(0.0, 0.75)]);
    builder
}

/// Writer with every segment of a consistent two-mesh, one-entity scene.
fn two_mesh_writer() -> ContainerWriter {
    let mut writer = ContainerWriter::new(6);
    let mut builder = SceneBuilder::new();
    builder.add_entity("M.e", true, vec![triangle(1.0, 1.0), triangle(0.0, 1.0)]);
    builder.write(&mut writer).unwrap();
    writer
}

#[test]
fn test_roundtrip_site() {
    let bytes = site().build(6).expect("Failed to build container");
    let scene = reconstruct("site", &bytes, &DecodeOptions::default()).expect("Failed to decode");

    assert_eq!(scene.tile_id, "site_tile");
    assert_eq!(scene.num_meshes(), 3);
    assert_eq!(scene.num_entities(), 3);

    let ids: Vec<&str> = scene.meshes.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["site.0", "site.1", "site.2"]);

    let second = &scene.meshes[1];
    assert_eq!(second.color, vec![0.5, 0.5, 0.5]);
    assert_eq!(second.opacity, 0.25);
    assert_eq!(second.indices, vec![0, 1, 2]);
    assert_eq!(second.num_vertices(), 3);
    assert_eq!(second.matrix, Mat4::IDENTITY);
    assert!(second.is_quantized);
    assert!(second.is_transformed_and_encoded);
    assert_eq!(
        second.positions_decode_matrix,
        Mat4::from_scale(glam::Vec3::splat(1.0 / 65535.0))
    );

    assert_eq!(scene.entities[0].id, "wall");
    assert_eq!(scene.entities[0].mesh_ids, vec!["site.0".to_string(), "site.1".to_string()]);
    assert!(scene.entities[0].is_object);
    assert!(scene.entities[1].mesh_ids.is_empty());
    assert!(!scene.entities[1].is_object);
    assert_eq!(scene.entities[2].mesh_ids, vec!["site.2".to_string()]);
}

#[test]
fn test_sequential_matches_parallel() {
    let bytes = site().build(9).unwrap();
    let parallel = reconstruct("m", &bytes, &DecodeOptions::default()).unwrap();
    let sequential = reconstruct("m", &bytes, &DecodeOptions::sequential()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_decode_is_repeatable() {
    let bytes = site().build(1).unwrap();
    let first = reconstruct("m", &bytes, &DecodeOptions::default()).unwrap();
    let second = reconstruct("m", &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_color_offsets_split_flat_array() {
    let mut writer = two_mesh_writer();
    writer
        .set_elements(SegmentRole::MeshColors, &[1.0f32, 1.0, 1.0, 0.0, 0.0, 0.0])
        .unwrap()
        .set_elements(SegmentRole::MeshColorOffsets, &[0u32, 3])
        .unwrap();
    let bytes = writer.finish().unwrap();

    let scene = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(scene.meshes[0].color, vec![1.0, 1.0, 1.0]);
    assert_eq!(scene.meshes[1].color, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_last_mesh_runs_to_end_of_array() {
    // More trailing elements than offset entries
    let mut writer = two_mesh_writer();
    writer
        .set_elements(SegmentRole::MeshIndices, &[0u16, 1, 2, 2, 1, 0, 0, 2, 3])
        .unwrap()
        .set_elements(SegmentRole::MeshIndexOffsets, &[0u32, 3])
        .unwrap();
    let bytes = writer.finish().unwrap();

    let scene = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(scene.meshes[1].indices, vec![2, 1, 0, 0, 2, 3]);
    assert_eq!(scene.meshes[1].num_triangles(), 2);
}

#[test]
fn test_entity_mesh_ids_use_model_prefix() {
    let mut writer = ContainerWriter::new(6);
    let mut builder = SceneBuilder::new();
    builder
        .add_entity("first", true, vec![MeshData::default()])
        .add_entity("second", true, vec![MeshData::default()]);
    builder.write(&mut writer).unwrap();
    writer.set_elements(SegmentRole::EntityMeshOffsets, &[0u32, 0]).unwrap();
    let bytes = writer.finish().unwrap();

    let scene = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap();
    assert!(scene.entities[0].mesh_ids.is_empty());
    assert_eq!(scene.entities[1].mesh_ids, vec!["M.0".to_string(), "M.1".to_string()]);
}

#[test]
fn test_mismatched_offset_counts_rejected() {
    let mut writer = two_mesh_writer();
    writer.set_elements(SegmentRole::MeshOpacityOffsets, &[0u32]).unwrap();
    let bytes = writer.finish().unwrap();

    let err = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InconsistentMeshSegments(_)), "got {err:?}");
}

#[test]
fn test_offset_past_array_rejected() {
    let mut writer = two_mesh_writer();
    writer.set_elements(SegmentRole::MeshPositionOffsets, &[0u32, 1000]).unwrap();
    let bytes = writer.finish().unwrap();

    let err = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InconsistentMeshSegments(_)), "got {err:?}");
}

#[test]
fn test_entity_arrays_length_mismatch_rejected() {
    let mut writer = two_mesh_writer();
    writer.set_elements(SegmentRole::EntityIsObject, &[1u8, 0]).unwrap();
    let bytes = writer.finish().unwrap();

    let err = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InconsistentEntitySegments(_)), "got {err:?}");
}

#[test]
fn test_truncated_container() {
    let bytes = site().build(6).unwrap();
    for cut in [0, 3, 40, bytes.len() - 1] {
        let err = reconstruct("M", &bytes[..cut], &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)), "cut at {cut}: {err:?}");
    }
}

#[test]
fn test_wrong_segment_count() {
    let mut bytes = site().build(6).unwrap();
    bytes[0] = (SEGMENT_COUNT - 1) as u8;
    let err = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedContainer(_)));
}

#[test]
fn test_corrupt_segment_names_role() {
    let mut writer = two_mesh_writer();
    writer.set_raw(SegmentRole::MeshAabbs, vec![0x78, 0x9c, 0xff, 0xff, 0xff]);
    let bytes = writer.finish().unwrap();

    match reconstruct("M", &bytes, &DecodeOptions::default()) {
        Err(Error::Decompression { role, .. }) => assert_eq!(role, SegmentRole::MeshAabbs),
        other => panic!("expected decompression error, got {other:?}"),
    }
}

#[test]
fn test_odd_length_u16_segment_rejected() {
    let mut writer = two_mesh_writer();
    writer.set_raw(SegmentRole::MeshEdgeIndices, compress(&[1, 2, 3], 6).unwrap());
    let bytes = writer.finish().unwrap();

    match reconstruct("M", &bytes, &DecodeOptions::default()) {
        Err(Error::TypeReinterpretation { role, .. }) => assert_eq!(role, SegmentRole::MeshEdgeIndices),
        other => panic!("expected reinterpretation error, got {other:?}"),
    }
}

#[test]
fn test_bad_entity_id_json() {
    let mut writer = two_mesh_writer();
    writer.set_bytes(SegmentRole::EntityIds, b"[\"a\", 3").unwrap();
    let bytes = writer.finish().unwrap();

    let err = reconstruct("M", &bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TypeReinterpretation { role: SegmentRole::EntityIds, .. }));
}

#[test]
fn test_segment_size_limit() {
    let bytes = site().build(6).unwrap();
    let container = Container::parse(&bytes).unwrap();
    let options = DecodeOptions { parallel: false, max_segment_bytes: 8 };

    let err = DecompressedSegments::decompress(&container, &options).unwrap_err();
    assert!(matches!(err, Error::Decompression { .. }));
}

#[test]
fn test_empty_scene() {
    let bytes = SceneBuilder::new().build(6).unwrap();
    let scene = reconstruct("empty", &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(scene.num_meshes(), 0);
    assert_eq!(scene.num_entities(), 0);
    assert_eq!(scene.tile_id, "empty_tile");
}

#[test]
fn test_description_pack_roundtrip() {
    let desc = SceneDescription {
        positions_decode_matrix: Mat4::IDENTITY.to_cols_array(),
        entities: vec![EntityData {
            id: "pipe".into(),
            is_object: true,
            meshes: vec![triangle(0.2, 0.9)],
        }],
    };
    let json = serde_json::to_string(&desc).unwrap();
    let parsed: SceneDescription = serde_json::from_str(&json).unwrap();

    let bytes = SceneBuilder::from_description(parsed).build(6).unwrap();
    let scene = reconstruct("P", &bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(scene.entities[0].id, "pipe");
    assert_eq!(scene.meshes[0].color, vec![0.2, 0.2, 0.2]);
    assert_eq!(scene.meshes[0].opacity, 0.9);
}
