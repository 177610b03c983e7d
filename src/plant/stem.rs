//! Stem nodes of the plant tree

use crate::core::types::Vec3;
use crate::geometry::Path;
use super::leaf::Leaf;

/// Stable handle to a stem inside a [`Plant`](super::Plant).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StemId(pub u32);

/// Which side of a stem a material applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Bark around the tube
    Outer,
    /// Cut face capping the tip
    Inner,
}

/// A single stem: centerline, tube resolution, materials and leaves.
#[derive(Clone, Debug)]
pub struct Stem {
    pub path: Path,
    /// Angular subdivisions of each cross-section ring (at least 3 are used)
    pub resolution: u32,
    /// World position of the stem origin. Path points are relative to it.
    pub location: Vec3,
    pub leaves: Vec<Leaf>,
    materials: [u32; 2],
    pub(super) parent: Option<StemId>,
    pub(super) child: Option<StemId>,
    pub(super) prev_sibling: Option<StemId>,
    pub(super) next_sibling: Option<StemId>,
}

impl Default for Stem {
    fn default() -> Self {
        Self {
            path: Path::default(),
            resolution: 8,
            location: Vec3::ZERO,
            leaves: Vec::new(),
            materials: [0, 0],
            parent: None,
            child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

impl Stem {
    pub fn material(&self, surface: Surface) -> u32 {
        match surface {
            Surface::Outer => self.materials[0],
            Surface::Inner => self.materials[1],
        }
    }

    pub fn set_material(&mut self, surface: Surface, material: u32) {
        match surface {
            Surface::Outer => self.materials[0] = material,
            Surface::Inner => self.materials[1] = material,
        }
    }

    pub fn parent(&self) -> Option<StemId> {
        self.parent
    }

    /// First child stem.
    pub fn child(&self) -> Option<StemId> {
        self.child
    }

    pub fn prev_sibling(&self) -> Option<StemId> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<StemId> {
        self.next_sibling
    }
}
