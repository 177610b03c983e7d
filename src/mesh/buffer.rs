//! Per-material vertex/index buffers and the segments that map stems and
//! leaves back into them.

use std::collections::HashMap;
use std::ops::Range;

use crate::plant::StemId;
use super::vertex::Vertex;

/// Range of a buffer produced by one stem or one leaf.
///
/// Starts and counts are in elements (vertices, indices). With unified
/// indices they are offsets into the concatenation of all buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub stem: StemId,
    /// Index into the stem's leaves, for leaf segments
    pub leaf: Option<usize>,
    pub vertex_start: u32,
    pub vertex_count: u32,
    pub index_start: u32,
    pub index_count: u32,
}

impl Segment {
    /// Byte range of the segment's vertices.
    pub fn vertex_bytes(&self) -> Range<usize> {
        let size = std::mem::size_of::<Vertex>();
        let start = self.vertex_start as usize * size;
        start..start + self.vertex_count as usize * size
    }

    /// Byte range of the segment's indices.
    pub fn index_bytes(&self) -> Range<usize> {
        let size = std::mem::size_of::<u32>();
        let start = self.index_start as usize * size;
        start..start + self.index_count as usize * size
    }

    pub fn vertex_range(&self) -> Range<usize> {
        self.vertex_start as usize..(self.vertex_start + self.vertex_count) as usize
    }

    pub fn index_range(&self) -> Range<usize> {
        self.index_start as usize..(self.index_start + self.index_count) as usize
    }
}

/// Geometry for one material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    material: u32,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    stem_segments: Vec<Segment>,
    leaf_segments: Vec<Segment>,
}

impl MeshBuffer {
    pub fn new(material: u32) -> Self {
        Self {
            material,
            ..Default::default()
        }
    }

    pub fn material(&self) -> u32 {
        self.material
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn stem_segments(&self) -> &[Segment] {
        &self.stem_segments
    }

    pub fn leaf_segments(&self) -> &[Segment] {
        &self.leaf_segments
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub(crate) fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertex_count();
        self.vertices.push(vertex);
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub(crate) fn push_stem_segment(&mut self, segment: Segment) {
        self.stem_segments.push(segment);
    }

    pub(crate) fn push_leaf_segment(&mut self, segment: Segment) {
        self.leaf_segments.push(segment);
    }

    /// Shift indices and segment ranges by the totals of preceding buffers.
    pub(crate) fn offset(&mut self, vertices: u32, indices: u32) {
        for index in &mut self.indices {
            *index += vertices;
        }
        for segment in self.stem_segments.iter_mut().chain(self.leaf_segments.iter_mut()) {
            segment.vertex_start += vertices;
            segment.index_start += indices;
        }
    }
}

/// Buffers under construction, one slot per material.
///
/// Slot 0 always holds material 0. Other materials get slots in the order
/// they are first requested.
#[derive(Debug)]
pub(crate) struct MeshBuffers {
    buffers: Vec<MeshBuffer>,
    slots: HashMap<u32, usize>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self {
            buffers: vec![MeshBuffer::new(0)],
            slots: HashMap::from([(0, 0)]),
        }
    }

    /// Slot for a material, creating its buffer on first use.
    pub fn select(&mut self, material: u32) -> usize {
        *self.slots.entry(material).or_insert_with(|| {
            self.buffers.push(MeshBuffer::new(material));
            self.buffers.len() - 1
        })
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut MeshBuffer {
        &mut self.buffers[slot]
    }

    pub fn into_buffers(self) -> Vec<MeshBuffer> {
        self.buffers
    }
}
