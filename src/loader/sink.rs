//! Scene sink - the consumer of reconstructed records.

use std::collections::HashSet;

use crate::scene::{DecodedEntity, DecodedMesh};

/// A scene graph that accepts one load's tile, meshes and entities.
///
/// Calls arrive in a fixed order per load: `create_tile`, every
/// `create_mesh`, every `create_entity`, then `finalize` exactly once.
/// The sink owns the records after each call.
pub trait SceneSink {
    /// Whether a component with this id already exists in the scene.
    fn contains_component(&self, _id: &str) -> bool {
        false
    }

    fn create_tile(&mut self, tile_id: &str);

    fn create_mesh(&mut self, mesh: DecodedMesh);

    fn create_entity(&mut self, entity: DecodedEntity);

    /// The batch is structurally complete.
    fn finalize(&mut self);

    /// Completion signal, fired after `finalize`.
    fn loaded(&mut self, _model_id: &str) {}

    /// Failure signal; no `finalize` was issued for this load.
    fn load_failed(&mut self, _model_id: &str, _message: &str) {}
}

/// One call received by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Tile(String),
    Mesh(String),
    Entity(String),
    Finalize,
    Loaded(String),
    Failed { model_id: String, message: String },
}

/// A sink that keeps every record and the order calls arrived in.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    pub meshes: Vec<DecodedMesh>,
    pub entities: Vec<DecodedEntity>,
    components: HashSet<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a component already exists.
    pub fn with_component(mut self, id: impl Into<String>) -> Self {
        self.components.insert(id.into());
        self
    }

    /// Number of `finalize` calls received.
    pub fn finalize_count(&self) -> usize {
        self.events.iter().filter(|e| **e == SinkEvent::Finalize).count()
    }

    /// Number of create calls (tile, mesh, entity) received.
    pub fn create_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Tile(_) | SinkEvent::Mesh(_) | SinkEvent::Entity(_)))
            .count()
    }

    /// Look up a received mesh by id.
    pub fn mesh(&self, id: &str) -> Option<&DecodedMesh> {
        self.meshes.iter().find(|m| m.id == id)
    }
}

impl SceneSink for RecordingSink {
    fn contains_component(&self, id: &str) -> bool {
        self.components.contains(id)
    }

    fn create_tile(&mut self, tile_id: &str) {
        self.components.insert(tile_id.to_string());
        self.events.push(SinkEvent::Tile(tile_id.to_string()));
    }

    fn create_mesh(&mut self, mesh: DecodedMesh) {
        self.components.insert(mesh.id.clone());
        self.events.push(SinkEvent::Mesh(mesh.id.clone()));
        self.meshes.push(mesh);
    }

    fn create_entity(&mut self, entity: DecodedEntity) {
        self.components.insert(entity.id.clone());
        self.events.push(SinkEvent::Entity(entity.id.clone()));
        self.entities.push(entity);
    }

    fn finalize(&mut self) {
        self.events.push(SinkEvent::Finalize);
    }

    fn loaded(&mut self, model_id: &str) {
        self.components.insert(model_id.to_string());
        self.events.push(SinkEvent::Loaded(model_id.to_string()));
    }

    fn load_failed(&mut self, model_id: &str, message: &str) {
        self.events.push(SinkEvent::Failed {
            model_id: model_id.to_string(),
            message: message.to_string(),
        });
    }
}
