//! Generation parameters carried by derivation nodes

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::geometry::{Curve, Degree};

/// How stems or leaves are distributed around their parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arrangement {
    /// One per node, alternating sides
    #[default]
    Alternate,
    /// Pairs on opposite sides
    Opposite,
    /// Rings of three or more
    Whorled,
}

/// Parameters inherited by every stem generated from a derivation node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationParams {
    pub seed: u32,
    /// Child stems per unit length
    pub stem_density: f32,
    /// Distance along the parent before the first child stem
    pub stem_start: f32,
    /// Leaves per unit length
    pub leaf_density: f32,
    /// Distance along the stem before the first leaf
    pub leaf_start: f32,
    /// Child length relative to the parent
    pub length_factor: f32,
    /// Stems thinner than this get no children
    pub radius_threshold: f32,
    pub arrangement: Arrangement,
    /// Density multiplier (y) keyed by normalized position along the parent (x)
    pub density_curve: Curve,
}

impl Default for DerivationParams {
    fn default() -> Self {
        let density_curve = Curve::with_controls(
            Degree::Linear,
            vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
        )
        .unwrap_or_default();

        Self {
            seed: 0,
            stem_density: 0.0,
            stem_start: 0.0,
            leaf_density: 0.0,
            leaf_start: 0.0,
            length_factor: 0.5,
            radius_threshold: 0.02,
            arrangement: Arrangement::Alternate,
            density_curve,
        }
    }
}

impl DerivationParams {
    /// Density multiplier at a normalized position, 1 if the curve is empty.
    pub fn density_scale(&self, t: f32) -> f32 {
        self.density_curve.point_at(t.clamp(0.0, 1.0)).map_or(1.0, |p| p.y)
    }
}
