//! Octree nodes of the density volume

use crate::core::types::Vec3;
use crate::math::Aabb;

/// Index of a node inside a [`Volume`](super::Volume).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A cube of the volume and the data accumulated in it.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeNode {
    center: Vec3,
    /// Half edge length
    size: f32,
    depth: u32,
    /// Lookup only. Children are owned through `children`.
    pub(super) parent: Option<NodeId>,
    /// First of 8 contiguous children, indexed by octant
    pub(super) children: Option<NodeId>,

    density: f32,
    /// Averaged direction of the lines crossing the node, zero if none did
    direction: Vec3,
    quantity: u32,
}

impl VolumeNode {
    pub(super) fn new(center: Vec3, size: f32, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            center,
            size,
            depth,
            parent,
            children: None,
            density: 0.0,
            direction: Vec3::ZERO,
            quantity: 0,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half of the edge length.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_size(self.center, self.size)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child in octant `index` (bit 0 = +x, bit 1 = +y, bit 2 = +z).
    pub fn child(&self, index: u8) -> Option<NodeId> {
        debug_assert!(index < 8);
        self.children.map(|first| NodeId(first.0 + index as u32))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = density;
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    /// Number of lines that crossed the node.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Accumulate one line crossing.
    pub(super) fn record(&mut self, weight: f32, direction: Vec3) {
        self.density += weight.max(0.0);
        let total = self.direction * self.quantity as f32 + direction;
        self.quantity += 1;
        self.direction = total.try_normalize().unwrap_or(direction);
    }
}
