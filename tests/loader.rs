//! Integration tests for loading containers from files into a sink.

use std::sync::Arc;

use batchmesh::container::{ContainerWriter, SegmentRole};
use batchmesh::loader::{
    FileSource, IdCollisionPolicy, LoadParams, LoadWorker, Loader, LoaderConfig, RecordingSink, SinkEvent,
};
use batchmesh::scene::{MeshData, SceneBuilder};
use batchmesh::Error;

use tempfile::TempDir;

fn mesh(shade: f32) -> MeshData {
    MeshData {
        color: vec![shade; 3],
        indices: vec![0, 1, 2],
        quantized_positions: vec![0; 9],
        ..Default::default()
    }
}

fn write_site(dir: &TempDir, name: &str) -> String {
    let mut builder = SceneBuilder::new();
    builder
        .add_entity("column", true, vec![mesh(1.0)])
        .add_entity("beam", true, vec![mesh(0.5), mesh(0.25)]);
    let mut writer = ContainerWriter::default();
    builder.write(&mut writer).expect("Failed to flatten scene");
    writer.write_to(dir.path().join(name)).expect("Failed to write container");
    name.to_string()
}

#[test]
fn test_load_file_mapped_and_read() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let src = write_site(&dir, "site.bin");

    for use_mmap in [true, false] {
        let source = FileSource::new().with_root(dir.path()).with_mmap(use_mmap);
        let mut sink = RecordingSink::new();
        let outcome = Loader::default()
            .load(&LoadParams::new(&src).with_id("S"), &source, &mut sink)
            .expect("Failed to load");

        assert_eq!(outcome.model_id, "S");
        assert_eq!(outcome.tile_id, "S_tile");
        assert_eq!(outcome.num_meshes, 3);
        assert_eq!(outcome.num_entities, 2);
        assert_eq!(sink.finalize_count(), 1);
        assert_eq!(sink.events.first(), Some(&SinkEvent::Tile("S_tile".into())));
        assert_eq!(sink.events.last(), Some(&SinkEvent::Loaded("S".into())));
        assert_eq!(sink.entities[1].mesh_ids, vec!["S.1".to_string(), "S.2".to_string()]);
        assert_eq!(sink.mesh("S.2").map(|m| m.color.clone()), Some(vec![0.25; 3]));
    }
}

#[test]
fn test_meshes_arrive_before_entities() {
    let dir = TempDir::new().unwrap();
    let src = write_site(&dir, "site.bin");
    let mut sink = RecordingSink::new();
    Loader::default()
        .load(&LoadParams::new(&src).with_id("S"), &FileSource::new().with_root(dir.path()), &mut sink)
        .unwrap();

    let last_mesh = sink.events.iter().rposition(|e| matches!(e, SinkEvent::Mesh(_))).unwrap();
    let first_entity = sink.events.iter().position(|e| matches!(e, SinkEvent::Entity(_))).unwrap();
    let finalize = sink.events.iter().position(|e| *e == SinkEvent::Finalize).unwrap();
    assert!(last_mesh < first_entity);
    assert!(first_entity < finalize);
}

#[test]
fn test_truncated_file_makes_no_sink_calls() {
    let dir = TempDir::new().unwrap();
    let src = write_site(&dir, "site.bin");
    let path = dir.path().join(&src);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let mut sink = RecordingSink::new();
    let err = Loader::default()
        .load(&LoadParams::new(&src).with_id("T"), &FileSource::new().with_root(dir.path()), &mut sink)
        .unwrap_err();

    assert_eq!(err.model_id, "T");
    assert!(matches!(err.source, Error::MalformedContainer(_)));
    assert_eq!(sink.create_count(), 0);
    assert_eq!(sink.finalize_count(), 0);
    assert_eq!(sink.events.len(), 1);
}

#[test]
fn test_inconsistent_segments_make_no_sink_calls() {
    let dir = TempDir::new().unwrap();
    let mut builder = SceneBuilder::new();
    builder.add_entity("e", true, vec![mesh(1.0), mesh(0.0)]);
    let mut writer = ContainerWriter::default();
    builder.write(&mut writer).unwrap();
    writer.set_elements(SegmentRole::MeshNormalOffsets, &[0u32, 0, 0]).unwrap();
    writer.write_to(dir.path().join("bad.bin")).unwrap();

    let mut sink = RecordingSink::new();
    let err = Loader::default()
        .load(&LoadParams::new("bad.bin"), &FileSource::new().with_root(dir.path()), &mut sink)
        .unwrap_err();

    assert!(matches!(err.source, Error::InconsistentMeshSegments(_)));
    assert_eq!(sink.create_count(), 0);
}

#[test]
fn test_missing_file_is_fetch_error() {
    let dir = TempDir::new().unwrap();
    let mut sink = RecordingSink::new();
    let err = Loader::default()
        .load(&LoadParams::new("nope.bin"), &FileSource::new().with_root(dir.path()), &mut sink)
        .unwrap_err();

    assert!(matches!(err.source, Error::Fetch { .. }));
    assert!(matches!(&sink.events[..], [SinkEvent::Failed { .. }]));
}

#[test]
fn test_reloading_same_id() {
    let dir = TempDir::new().unwrap();
    let src = write_site(&dir, "site.bin");
    let source = FileSource::new().with_root(dir.path());
    let mut sink = RecordingSink::new();

    let loader = Loader::default();
    loader.load(&LoadParams::new(&src).with_id("S"), &source, &mut sink).unwrap();
    let again = loader.load(&LoadParams::new(&src).with_id("S"), &source, &mut sink).unwrap();
    assert_ne!(again.model_id, "S");
    assert_eq!(sink.finalize_count(), 2);

    let strict = Loader::new(LoaderConfig { id_collision: IdCollisionPolicy::Reject, ..Default::default() });
    let err = strict.load(&LoadParams::new(&src).with_id("S"), &source, &mut sink).unwrap_err();
    assert!(matches!(err.source, Error::DuplicateModelId(_)));
    assert_eq!(sink.finalize_count(), 2);
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loader.json");
    std::fs::write(&path, r#"{ "auto_id_prefix": "site-", "decode": { "parallel": false } }"#).unwrap();

    let config = LoaderConfig::load(Some(path.as_path())).expect("Failed to read config");
    assert_eq!(config.auto_id_prefix, "site-");
    assert_eq!(config.id_collision, IdCollisionPolicy::Regenerate);
    assert!(!config.decode.parallel);

    let src = write_site(&dir, "site.bin");
    let mut sink = RecordingSink::new();
    let outcome = Loader::new(config)
        .load(&LoadParams::new(&src), &FileSource::new().with_root(dir.path()), &mut sink)
        .unwrap();
    assert_eq!(outcome.model_id, "site-0");
    assert_eq!(sink.meshes[0].id, "site-0.0");

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(LoaderConfig::load(Some(path.as_path())), Err(Error::Config(_))));
}

#[test]
fn test_worker_loads_files() {
    let dir = TempDir::new().unwrap();
    let a = write_site(&dir, "a.bin");
    let b = write_site(&dir, "b.bin");

    let loader = Arc::new(Loader::default());
    let worker = LoadWorker::spawn(loader.clone(), Arc::new(FileSource::new().with_root(dir.path())))
        .expect("Failed to spawn worker");
    let mut sink = RecordingSink::new();
    let id_a = loader.resolve_model_id(Some("A"), &sink).unwrap();
    let id_b = loader.resolve_model_id(Some("B"), &sink).unwrap();
    assert!(worker.request(id_a, a));
    assert!(worker.request(id_b, b));

    for expected in ["A", "B"] {
        let result = worker.recv().expect("worker result");
        assert_eq!(result.model_id(), expected);
        result.deliver(&loader, &mut sink).expect("Failed to deliver");
    }
    assert_eq!(sink.finalize_count(), 2);
    assert!(sink.mesh("A.0").is_some());
    assert!(sink.mesh("B.2").is_some());
}
