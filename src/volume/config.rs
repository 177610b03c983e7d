//! Density volume configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;

/// Deepest subdivision supported. Finer f32 cells stop being distinct.
pub const MAX_DEPTH: u32 = 20;

/// Extent and resolution of a [`Volume`](super::Volume).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Half the edge length of the root cube, centered on the origin.
    pub size: f32,
    /// Max subdivision depth (depth 5 = 32 cells/side).
    pub max_depth: u32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            size: 8.0,
            max_depth: 5,
        }
    }
}

impl VolumeConfig {
    /// Parse from JSON. Rejects depths above [`MAX_DEPTH`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.max_depth > MAX_DEPTH {
            let message = format!("max_depth {} exceeds {}", config.max_depth, MAX_DEPTH);
            return Err(<serde_json::Error as serde::de::Error>::custom(message).into());
        }
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Half extent of a cell at max depth.
    pub fn cell_size(&self) -> f32 {
        self.size * 0.5f32.powi(self.max_depth.min(MAX_DEPTH) as i32)
    }
}
