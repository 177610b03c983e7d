//! Leaves attached along a stem

use serde::{Deserialize, Serialize};

use crate::core::types::{Quat, Vec2};

/// A flat leaf quad attached to a stem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Arc-length distance along the stem. Negative or past the end of the
    /// stem places the leaf at the tip.
    pub position: f32,
    /// Width (x) and length (y) of the quad
    pub scale: Vec2,
    /// Bend of the leaf blade about its width axis, in radians
    pub tilt: f32,
    /// Extra rotation of the quad in its own frame, before it is aligned
    /// to the stem
    pub orientation: Quat,
    pub material: u32,
}

impl Default for Leaf {
    fn default() -> Self {
        Self {
            position: -1.0,
            scale: Vec2::ONE,
            tilt: 0.0,
            orientation: Quat::IDENTITY,
            material: 0,
        }
    }
}

impl Leaf {
    /// Leaf at a distance along the stem.
    pub fn at(position: f32) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Leaf at the tip of the stem.
    pub fn terminal() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_material(mut self, material: u32) -> Self {
        self.material = material;
        self
    }
}
