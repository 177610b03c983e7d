//! Axis-aligned bounding box

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube from its center and half of its edge length
    pub fn from_center_half_size(center: Vec3, half_size: f32) -> Self {
        let half = Vec3::splat(half_size);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if point is inside AABB (boundary inclusive)
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Octant index of a point relative to the center.
    /// Bit 0 = +x, bit 1 = +y, bit 2 = +z; points on a center plane go to the positive side.
    pub fn octant_of(&self, p: Vec3) -> u8 {
        let c = self.center();
        (if p.x >= c.x { 1 } else { 0 })
            | (if p.y >= c.y { 2 } else { 0 })
            | (if p.z >= c.z { 4 } else { 0 })
    }

    /// Get child octant AABB for octree subdivision
    /// index: 0-7 representing xyz octant (bit 0=x, bit 1=y, bit 2=z)
    pub fn child_octant(&self, index: u8) -> Aabb {
        let center = self.center();
        let half = self.size() * 0.25;

        let offset = Vec3::new(
            if index & 1 != 0 { half.x } else { -half.x },
            if index & 2 != 0 { half.y } else { -half.y },
            if index & 4 != 0 { half.z } else { -half.z },
        );

        Aabb::new(center + offset - half, center + offset + half)
    }
}
