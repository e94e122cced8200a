//! Reconstruction orchestrator - one load from source to sink.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::config::{IdCollisionPolicy, LoaderConfig};
use super::sink::SceneSink;
use super::source::ByteSource;
use crate::scene::{reconstruct, DecodedScene};
use crate::util::{Error, LoadError, Result};

/// Parameters of one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadParams {
    /// Requested model id; generated when absent.
    pub id: Option<String>,
    /// Source name handed to the [`ByteSource`].
    pub src: String,
}

impl LoadParams {
    pub fn new(src: impl Into<String>) -> Self {
        Self { id: None, src: src.into() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub model_id: String,
    pub tile_id: String,
    pub num_meshes: usize,
    pub num_entities: usize,
}

/// Sequences fetch, decode and delivery for container loads.
///
/// A `Loader` holds no per-load state besides the generated-id counter and
/// the ids of loads still in flight, so one instance can serve any number of
/// independent loads.
#[derive(Debug)]
pub struct Loader {
    config: LoaderConfig,
    next_id: AtomicU64,
    /// Ids handed out by `resolve_model_id` and not yet delivered or failed.
    reserved: Mutex<HashSet<String>>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
            reserved: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Pick the model id for a load according to the collision policy.
    ///
    /// An id is taken if the sink already holds it or another load resolved
    /// it and has not been delivered yet. The returned id stays reserved
    /// until [`deliver`](Self::deliver), [`fail`](Self::fail) or
    /// [`release`](Self::release).
    pub fn resolve_model_id<S: SceneSink + ?Sized>(&self, requested: Option<&str>, sink: &S) -> Result<String> {
        let mut reserved = self.reserved.lock();
        let id = match requested {
            None => self.generate_id(sink, &reserved),
            Some(id) if !is_taken(id, sink, &reserved) => id.to_string(),
            Some(id) => match self.config.id_collision {
                IdCollisionPolicy::Reject => return Err(Error::DuplicateModelId(id.to_string())),
                IdCollisionPolicy::Regenerate => {
                    let fresh = self.generate_id(sink, &reserved);
                    tracing::warn!(requested = id, model_id = %fresh, "model id already exists, generated a new one");
                    fresh
                }
            },
        };
        reserved.insert(id.clone());
        Ok(id)
    }

    /// Drop the reservation of an id that will not be loaded.
    pub fn release(&self, model_id: &str) {
        self.reserved.lock().remove(model_id);
    }

    fn generate_id<S: SceneSink + ?Sized>(&self, sink: &S, reserved: &HashSet<String>) -> String {
        loop {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            let id = format!("{}{n}", self.config.auto_id_prefix);
            if !is_taken(&id, sink, reserved) {
                return id;
            }
        }
    }

    /// Decode a buffer that is already in memory.
    pub fn decode(&self, model_id: &str, buf: &[u8]) -> Result<DecodedScene> {
        reconstruct(model_id, buf, &self.config.decode)
    }

    /// Fetch a source and decode it.
    pub fn fetch_and_decode(&self, model_id: &str, src: &str, source: &dyn ByteSource) -> Result<DecodedScene> {
        let bytes = source.fetch(src)?;
        tracing::debug!(model_id, src, bytes = bytes.len(), "fetched container");
        self.decode(model_id, &bytes)
    }

    /// Hand a decoded scene to the sink: tile, meshes, entities, finalize.
    pub fn deliver<S: SceneSink + ?Sized>(&self, scene: DecodedScene, sink: &mut S) -> LoadOutcome {
        let DecodedScene { model_id, tile_id, meshes, entities } = scene;
        let outcome = LoadOutcome {
            num_meshes: meshes.len(),
            num_entities: entities.len(),
            model_id,
            tile_id,
        };

        sink.create_tile(&outcome.tile_id);
        for mesh in meshes {
            sink.create_mesh(mesh);
        }
        for entity in entities {
            sink.create_entity(entity);
        }
        sink.finalize();
        sink.loaded(&outcome.model_id);
        self.release(&outcome.model_id);

        tracing::info!(
            model_id = %outcome.model_id,
            meshes = outcome.num_meshes,
            entities = outcome.num_entities,
            "model loaded"
        );
        outcome
    }

    /// Signal a failed load to the sink and pass the error on.
    pub fn fail<S: SceneSink + ?Sized>(&self, err: LoadError, sink: &mut S) -> LoadError {
        self.release(&err.model_id);
        self.signal_failure(err, sink)
    }

    fn signal_failure<S: SceneSink + ?Sized>(&self, err: LoadError, sink: &mut S) -> LoadError {
        tracing::error!(model_id = %err.model_id, error = %err.source, "model load failed");
        sink.load_failed(&err.model_id, &err.source.to_string());
        err
    }

    /// Run a whole load on the calling thread.
    ///
    /// Decoding completes before the first sink call, so a failed load
    /// issues no create or finalize calls.
    pub fn load<S: SceneSink + ?Sized>(
        &self,
        params: &LoadParams,
        source: &dyn ByteSource,
        sink: &mut S,
    ) -> std::result::Result<LoadOutcome, LoadError> {
        let model_id = match self.resolve_model_id(params.id.as_deref(), &*sink) {
            Ok(id) => id,
            Err(e) => {
                // Nothing was reserved; the requested id may belong to another load
                let requested = params.id.clone().unwrap_or_default();
                return Err(self.signal_failure(LoadError::new(requested, e), sink));
            }
        };

        match self.fetch_and_decode(&model_id, &params.src, source) {
            Ok(scene) => Ok(self.deliver(scene, sink)),
            Err(e) => Err(self.fail(LoadError::new(model_id, e), sink)),
        }
    }
}

fn is_taken<S: SceneSink + ?Sized>(id: &str, sink: &S, reserved: &HashSet<String>) -> bool {
    sink.contains_component(id) || reserved.contains(id)
}
