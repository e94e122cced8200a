//! batchmesh CLI - inspect, load and pack scene containers.

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use batchmesh::container::{Container, SegmentRole};
use batchmesh::core::{parse_string_array, DecodeOptions, DecompressedSegments, SegmentPayload};
use batchmesh::loader::{FileSource, LoadParams, LoadWorker, Loader, LoaderConfig, RecordingSink};
use batchmesh::scene::{reconstruct, SceneBuilder, SceneDescription};

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "warn";
    let mut json = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "--json" => json = true,
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_usage();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => with_file(&filtered_args, |file| cmd_info(file, json)),
        "meshes" | "m" => with_file(&filtered_args, cmd_meshes),
        "entities" | "e" => with_file(&filtered_args, cmd_entities),
        "load" | "l" => cmd_load(&filtered_args[1..]),
        "pack" | "p" => cmd_pack(&filtered_args[1..]),
        "version" | "--version" | "-V" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        other if Path::new(other).exists() => cmd_info(other, json),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("batchmesh - Inspect and decode batch-compressed scene containers");
    println!();
    println!("Usage: batchmesh [options] <command> <file>");
    println!();
    println!("Commands:");
    println!("  i, info <file>                  Show segment table and counts");
    println!("  m, meshes <file>                List decoded meshes");
    println!("  e, entities <file>              List decoded entities");
    println!("  l, load <file> [--id ID] [--config PATH]");
    println!("                                  Run a full load on the worker thread");
    println!("  p, pack <scene.json> <out> [--level N]");
    println!("                                  Build a container from a JSON scene");
    println!("  version                         Show version and build date");
    println!("  h, help                         Show this help");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Errors only");
    println!("  --json         JSON output (info)");
}

fn print_version() {
    println!(
        "batchmesh {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("BATCHMESH_BUILD_DATE"),
        env!("BATCHMESH_BUILD_TIME")
    );
}

fn with_file(args: &[&str], f: impl FnOnce(&str) -> Result<()>) -> Result<()> {
    match args.get(1) {
        Some(file) => f(file),
        None => bail!("missing file argument\nUsage: batchmesh {} <file>", args[0]),
    }
}

fn model_id_for(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_info(path: &str, json: bool) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let container = Container::parse(&bytes)?;
    let segments = DecompressedSegments::decompress(&container, &DecodeOptions::default())?;

    let mut rows = Vec::with_capacity(SegmentRole::COUNT);
    for (seg, (role, payload)) in container.segments().iter().zip(segments.iter()) {
        let elements = match payload {
            SegmentPayload::Text(text) => parse_string_array(role, text)?.len(),
            SegmentPayload::Binary(bytes) => bytes.len() / role.encoding().num_bytes(),
        };
        rows.push((role, seg.len(), payload.len(), elements));
    }

    let num_meshes = rows[SegmentRole::MeshColorOffsets.index()].3;
    let num_entities = rows[SegmentRole::EntityIds.index()].3;

    if json {
        let segments: Vec<_> = rows
            .iter()
            .map(|(role, compressed, decompressed, elements)| {
                serde_json::json!({
                    "index": role.index(),
                    "role": role.name(),
                    "encoding": role.encoding().name(),
                    "compressed": compressed,
                    "decompressed": decompressed,
                    "elements": elements,
                })
            })
            .collect();
        let doc = serde_json::json!({
            "file": path,
            "size": container.size(),
            "meshes": num_meshes,
            "entities": num_entities,
            "segments": segments,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("File: {}", path);
    println!("Size: {} bytes, {} segments", container.size(), rows.len());
    println!("Meshes: {}, Entities: {}", num_meshes, num_entities);
    println!();
    println!("{:>3}  {:<26} {:<8} {:>12} {:>14} {:>10}", "#", "Role", "Type", "Compressed", "Decompressed", "Elements");
    for (role, compressed, decompressed, elements) in &rows {
        println!(
            "{:>3}  {:<26} {:<8} {:>12} {:>14} {:>10}",
            role.index(),
            role.name(),
            role.encoding().name(),
            compressed,
            decompressed,
            elements
        );
    }
    Ok(())
}

fn cmd_meshes(path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let scene = reconstruct(&model_id_for(path), &bytes, &DecodeOptions::default())?;

    println!("{} meshes", scene.num_meshes());
    for mesh in &scene.meshes {
        let a = &mesh.aabb;
        println!(
            "  {:<20} tris={:<7} verts={:<7} edges={:<7} opacity={:.2} aabb=[{:.2},{:.2},{:.2} .. {:.2},{:.2},{:.2}]",
            mesh.id,
            mesh.num_triangles(),
            mesh.num_vertices(),
            mesh.edge_indices.len() / 2,
            mesh.opacity,
            a[0], a[1], a[2], a[3], a[4], a[5]
        );
    }
    Ok(())
}

fn cmd_entities(path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let scene = reconstruct(&model_id_for(path), &bytes, &DecodeOptions::default())?;

    println!("{} entities", scene.num_entities());
    for entity in &scene.entities {
        println!(
            "  {:<24} object={:<5} meshes={}",
            entity.id,
            entity.is_object,
            entity.mesh_ids.join(",")
        );
    }
    Ok(())
}

fn cmd_load(args: &[&str]) -> Result<()> {
    let mut file = None;
    let mut id = None;
    let mut config_path = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--id" => id = Some(iter.next().context("--id needs a value")?.to_string()),
            "--config" => config_path = Some(*iter.next().context("--config needs a value")?),
            other => file = Some(other),
        }
    }
    let Some(file) = file else {
        bail!("missing file argument\nUsage: batchmesh load <file> [--id ID] [--config PATH]");
    };

    let config = LoaderConfig::load(config_path.map(Path::new))?;
    let loader = Arc::new(Loader::new(config));
    let mut sink = RecordingSink::new();

    let params = LoadParams { id: id.or_else(|| Some(model_id_for(file))), src: file.to_string() };
    let model_id = loader.resolve_model_id(params.id.as_deref(), &sink)?;

    let worker = LoadWorker::spawn(loader.clone(), Arc::new(FileSource::new()))
        .context("starting load worker")?;
    if !worker.request(model_id, params.src) {
        bail!("load worker is not running");
    }
    let result = worker.recv().context("load worker exited without a result")?;
    let outcome = result.deliver(&loader, &mut sink)?;

    println!("Loaded '{}' (tile '{}')", outcome.model_id, outcome.tile_id);
    println!("  meshes:    {}", outcome.num_meshes);
    println!("  entities:  {}", outcome.num_entities);
    println!("  objects:   {}", sink.entities.iter().filter(|e| e.is_object).count());
    println!("  triangles: {}", sink.meshes.iter().map(|m| m.num_triangles()).sum::<usize>());
    println!("  sink calls: {} creates, {} finalize", sink.create_count(), sink.finalize_count());
    Ok(())
}

fn cmd_pack(args: &[&str]) -> Result<()> {
    let mut level = 6;
    let mut paths = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--level" => {
                level = iter
                    .next()
                    .context("--level needs a value")?
                    .parse()
                    .context("--level must be 0-9")?;
            }
            other => paths.push(other),
        }
    }
    let [input, output] = paths[..] else {
        bail!("Usage: batchmesh pack <scene.json> <out> [--level N]");
    };

    let json = std::fs::read_to_string(input).with_context(|| format!("reading {}", input))?;
    let desc: SceneDescription = serde_json::from_str(&json).with_context(|| format!("parsing {}", input))?;
    let builder = SceneBuilder::from_description(desc);
    let bytes = builder.build(level)?;
    std::fs::write(output, &bytes).with_context(|| format!("writing {}", output))?;

    println!(
        "Packed {} entities, {} meshes into {} ({} bytes)",
        builder.num_entities(),
        builder.num_meshes(),
        output,
        bytes.len()
    );
    Ok(())
}
