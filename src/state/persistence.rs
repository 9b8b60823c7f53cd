use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::scene::{SceneElement, SceneGraph};
use crate::util::time;

/// Errors that can occur while saving or loading scene documents
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Invalid scene document: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Failed to access scene file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Plain-data form of a scene, for export and later re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Version of the application that wrote the file
    pub version: String,
    /// Seconds since the epoch when the file was written
    pub timestamp: u64,
    #[serde(default)]
    pub name: String,
    pub elements: Vec<SceneElement>,
}

impl SceneFile {
    pub fn new(name: impl Into<String>, scene: &SceneGraph) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            timestamp: time::timestamp_secs(),
            name: name.into(),
            elements: scene.elements().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, ValidationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let file: SceneFile = serde_json::from_str(json)?;
        if file.version != env!("CARGO_PKG_VERSION") {
            warn!(
                "Scene file version {} differs from current version {}",
                file.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        Ok(file)
    }

    /// Normalized graph: unique layers and ids.
    pub fn into_scene(self) -> SceneGraph {
        SceneGraph::from_elements(self.elements)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> PersistenceResult<()> {
        std::fs::write(path, self.to_json()?)?;
        info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> PersistenceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let file = Self::from_json(&json)?;
        info!("Loaded scene '{}' ({} elements) from {}", file.name, file.elements.len(), path.display());
        Ok(file)
    }
}
