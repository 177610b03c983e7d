//! Plant tessellation.
//!
//! [`MeshGenerator`] turns a [`Plant`](crate::plant::Plant) into one
//! [`MeshBuffer`] per material. Stems become tubes of stitched rings capped
//! at the tip, leaves become single quads. Each buffer records which stem or
//! leaf produced which range so callers can pick or highlight parts of the
//! plant.

pub mod buffer;
pub mod config;
pub mod generator;
mod leaf;
pub mod vertex;

pub use buffer::{MeshBuffer, Segment};
pub use config::MeshConfig;
pub use generator::MeshGenerator;
pub use vertex::Vertex;

use crate::plant::StemId;

/// Generated geometry, one buffer per material slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlantMesh {
    buffers: Vec<MeshBuffer>,
}

impl PlantMesh {
    pub(crate) fn new(buffers: Vec<MeshBuffer>) -> Self {
        Self { buffers }
    }

    /// All vertices, concatenated in slot order.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.buffers.iter().flat_map(|b| b.vertices().iter().copied()).collect()
    }

    /// All indices, concatenated in slot order. Only valid as a single
    /// index buffer when generated with unified indices.
    pub fn indices(&self) -> Vec<u32> {
        self.buffers.iter().flat_map(|b| b.indices().iter().copied()).collect()
    }

    pub fn buffer(&self, slot: usize) -> &MeshBuffer {
        &self.buffers[slot]
    }

    pub fn buffers(&self) -> &[MeshBuffer] {
        &self.buffers
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn material_id(&self, slot: usize) -> u32 {
        self.buffers[slot].material()
    }

    pub fn vertex_count(&self) -> usize {
        self.buffers.iter().map(|b| b.vertices().len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.buffers.iter().map(|b| b.indices().len()).sum()
    }

    /// Tube segment of a stem, if it was generated.
    pub fn find_stem(&self, stem: StemId) -> Option<&Segment> {
        self.buffers
            .iter()
            .flat_map(MeshBuffer::stem_segments)
            .find(|s| s.stem == stem)
    }

    /// Quad segment of the stem's `leaf`-th leaf, if it was generated.
    pub fn find_leaf(&self, stem: StemId, leaf: usize) -> Option<&Segment> {
        self.buffers
            .iter()
            .flat_map(MeshBuffer::leaf_segments)
            .find(|s| s.stem == stem && s.leaf == Some(leaf))
    }

    pub fn stem_segments(&self, slot: usize) -> &[Segment] {
        self.buffers[slot].stem_segments()
    }

    pub fn leaf_segments(&self, slot: usize) -> &[Segment] {
        self.buffers[slot].leaf_segments()
    }
}
