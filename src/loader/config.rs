//! Loader configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::DecodeOptions;
use crate::util::{Error, Result};

/// What to do when a requested model id is already present in the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdCollisionPolicy {
    /// Log a warning and load under a freshly generated id.
    #[default]
    Regenerate,
    /// Fail the load with [`Error::DuplicateModelId`].
    Reject,
}

/// Loader settings, usually read from `loader.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub id_collision: IdCollisionPolicy,
    /// Prefix for generated model ids.
    pub auto_id_prefix: String,
    pub decode: DecodeOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            id_collision: IdCollisionPolicy::Regenerate,
            auto_id_prefix: "model-".to_string(),
            decode: DecodeOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("batchmesh");
            p.push("loader.json");
            p
        })
    }

    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a config from an explicit path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        match Self::default_path() {
            Some(p) if p.is_file() => Self::from_path(p),
            _ => Ok(Self::default()),
        }
    }
}
