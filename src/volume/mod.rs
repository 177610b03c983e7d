//! Sparse density octree used to steer placement away from occupied space.
//!
//! The volume is a cube centered on the origin, subdivided on demand. Lines
//! (typically stem segments) are rasterized into the finest cells, which
//! accumulate density, a crossing count and an averaged direction. Nodes
//! live in an arena; children are allocated as a contiguous block of 8 and
//! each node keeps a lookup-only index of its parent.

pub mod config;
pub mod node;

pub use config::{MAX_DEPTH, VolumeConfig};
pub use node::{NodeId, VolumeNode};

use crate::core::types::Vec3;
use crate::math::{Aabb, FaceExit, Ray};

/// Octree density field.
#[derive(Clone, Debug)]
pub struct Volume {
    nodes: Vec<VolumeNode>,
    size: f32,
    max_depth: u32,
}

impl Volume {
    /// Create a volume of half extent `size` with a single undivided root.
    pub fn new(size: f32, max_depth: u32) -> Self {
        let mut volume = Self {
            nodes: Vec::new(),
            size,
            max_depth,
        };
        volume.clear(size, max_depth);
        volume
    }

    pub fn from_config(config: &VolumeConfig) -> Self {
        Self::new(config.size, config.max_depth)
    }

    /// Drop all nodes and start over with new dimensions. Depths above
    /// [`MAX_DEPTH`] are clamped.
    pub fn clear(&mut self, size: f32, max_depth: u32) {
        if max_depth > MAX_DEPTH {
            log::warn!("Volume max depth {} clamped to {}", max_depth, MAX_DEPTH);
        }
        let max_depth = max_depth.min(MAX_DEPTH);
        self.nodes.clear();
        self.nodes.push(VolumeNode::new(Vec3::ZERO, size, 0, None));
        self.size = size;
        self.max_depth = max_depth;
        log::debug!("Volume cleared: size {}, max depth {}", size, max_depth);
    }

    /// Half extent of the root cube.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Depth of the finest cells.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Bounds of the root cube.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_size(Vec3::ZERO, self.size)
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node. Panics on an id from another volume.
    pub fn node(&self, id: NodeId) -> &VolumeNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut VolumeNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Split a leaf into 8 equal octants. Does nothing if already divided.
    pub fn divide(&mut self, id: NodeId) {
        let node = self.node(id);
        if node.children.is_some() {
            return;
        }

        let bounds = node.bounds();
        let (half, depth) = (node.size() * 0.5, node.depth() + 1);
        let first = NodeId(self.nodes.len() as u32);
        for octant in 0..8 {
            let center = bounds.child_octant(octant).center();
            self.nodes.push(VolumeNode::new(center, half, depth, Some(id)));
        }
        self.node_mut(id).children = Some(first);
    }

    /// Max-depth cell containing `point`, subdividing as needed.
    pub fn add_node(&mut self, point: Vec3) -> Option<NodeId> {
        if !self.bounds().contains_point(point) {
            return None;
        }

        let mut id = self.root();
        while self.node(id).depth() < self.max_depth {
            self.divide(id);
            id = self.descend(id, point);
        }
        Some(id)
    }

    /// Deepest existing node containing `point`.
    pub fn get_node(&self, point: Vec3) -> Option<NodeId> {
        if !self.bounds().contains_point(point) {
            return None;
        }
        Some(self.descend_existing(self.root(), point))
    }

    /// Rasterize the segment `a..b` into max-depth cells.
    ///
    /// Every cell the clipped segment crosses gains `weight` density (negative
    /// weights count as 0), one crossing and the segment direction. Returns
    /// the number of cells visited.
    pub fn add_line(&mut self, a: Vec3, b: Vec3, weight: f32) -> usize {
        let offset = b - a;
        let Some(direction) = offset.try_normalize() else {
            return match self.add_node(a) {
                Some(id) => {
                    self.node_mut(id).record(weight, Vec3::ZERO);
                    1
                }
                None => 0,
            };
        };

        let ray = Ray::new(a, direction);
        let bounds = self.bounds();
        let Some((t_near, t_far)) = ray.intersects_aabb(&bounds) else {
            return 0;
        };
        let t_end = t_far.min(offset.length());
        if t_near > t_end {
            return 0;
        }

        // A segment crosses at most 3 cells per grid step along each axis
        let limit = 3 * (1usize << self.max_depth) + 1;
        let mut point = ray.at(t_near).clamp(bounds.min, bounds.max);
        let mut previous = None;
        let mut visited = 0;

        while let Some(id) = self.add_node(point) {
            if previous == Some(id) {
                break;
            }
            self.node_mut(id).record(weight, direction);
            visited += 1;
            previous = Some(id);

            let cell = self.node(id).bounds();
            let Some(exit) = ray.exit_face(&cell) else {
                break;
            };
            if exit.t >= t_end || visited >= limit {
                break;
            }
            point = self.step_across(&ray, &cell, exit);
        }

        log::trace!("Line {:?} -> {:?}: {} cells", a, b, visited);
        visited
    }

    /// Neighbor of a node across the face `ray` leaves it through.
    ///
    /// Ascends to the first ancestor containing the point just past that
    /// face, then descends as deep as the existing tree allows. Returns
    /// `None` when the ray leaves the volume.
    pub fn get_adjacent_node(&self, id: NodeId, ray: &Ray) -> Option<NodeId> {
        let bounds = self.node(id).bounds();
        let exit = ray.exit_face(&bounds)?;
        let point = self.step_across(ray, &bounds, exit);

        let mut ancestor = id;
        while !self.node(ancestor).bounds().contains_point(point) {
            ancestor = self.node(ancestor).parent()?;
        }
        Some(self.descend_existing(ancestor, point))
    }

    /// Neighbor on the positive side of `axis` (0 = x, 1 = y, 2 = z).
    pub fn next_node(&self, id: NodeId, axis: usize) -> Option<NodeId> {
        let ray = Ray::new(self.node(id).center(), Vec3::AXES[axis]);
        self.get_adjacent_node(id, &ray)
    }

    /// Neighbor on the negative side of `axis`.
    pub fn previous_node(&self, id: NodeId, axis: usize) -> Option<NodeId> {
        let ray = Ray::new(self.node(id).center(), -Vec3::AXES[axis]);
        self.get_adjacent_node(id, &ray)
    }

    /// Child of a divided node containing `point`, or the node itself.
    fn descend(&self, id: NodeId, point: Vec3) -> NodeId {
        let node = self.node(id);
        node.child(node.bounds().octant_of(point)).unwrap_or(id)
    }

    fn descend_existing(&self, mut id: NodeId, point: Vec3) -> NodeId {
        while !self.node(id).is_leaf() {
            id = self.descend(id, point);
        }
        id
    }

    /// Point where the ray leaves `cell`, pushed half a finest cell past
    /// the exit face.
    fn step_across(&self, ray: &Ray, cell: &Aabb, exit: FaceExit) -> Vec3 {
        let epsilon = self.size * 0.5f32.powi(self.max_depth as i32 + 1);
        let plane = if exit.sign > 0.0 {
            cell.max[exit.axis]
        } else {
            cell.min[exit.axis]
        };
        let mut point = ray.at(exit.t);
        point[exit.axis] = plane + exit.sign * epsilon;
        point
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::from_config(&VolumeConfig::default())
    }
}
