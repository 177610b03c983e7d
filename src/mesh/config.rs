//! Mesh generation settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;

/// Options controlling how stems are tessellated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Duplicate the first vertex of every ring so the wrap-around vertex
    /// gets its own texture coordinate (u = 0 instead of u = 1).
    pub vertex_seam: bool,
    /// Offset the indices of every buffer after the first so all buffers
    /// can be concatenated into one vertex/index array.
    pub unified_indices: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            vertex_seam: true,
            unified_indices: true,
        }
    }
}

impl MeshConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
