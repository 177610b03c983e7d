//! Ray type and operations

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

/// Where a ray leaves a box: the parameter and the face crossed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceExit {
    pub t: f32,
    /// 0 = x, 1 = y, 2 = z
    pub axis: usize,
    /// +1.0 for the max face, -1.0 for the min face
    pub sign: f32,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            if self.direction[axis] == 0.0 {
                // Parallel to this slab: inside or never
                if o < aabb.min[axis] || o > aabb.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (aabb.min[axis] - o) * self.inv_direction[axis];
            let t2 = (aabb.max[axis] - o) * self.inv_direction[axis];
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Face through which a ray starting inside `aabb` leaves it.
    ///
    /// Returns `None` for a zero direction.
    pub fn exit_face(&self, aabb: &Aabb) -> Option<FaceExit> {
        let mut exit: Option<FaceExit> = None;

        for axis in 0..3 {
            let d = self.direction[axis];
            if d == 0.0 {
                continue;
            }
            let (plane, sign) = if d > 0.0 {
                (aabb.max[axis], 1.0)
            } else {
                (aabb.min[axis], -1.0)
            };
            let t = ((plane - self.origin[axis]) * self.inv_direction[axis]).max(0.0);
            if exit.is_none_or(|e| t < e.t) {
                exit = Some(FaceExit { t, axis, sign });
            }
        }

        exit
    }
}
