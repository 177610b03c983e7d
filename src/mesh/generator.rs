//! Tube tessellation of a plant's stems and leaves.

use std::f32::consts::TAU;

use crate::core::types::{Quat, Vec2, Vec3};
use crate::plant::{Plant, Stem, StemId, Surface};
use super::buffer::{MeshBuffers, Segment};
use super::config::MeshConfig;
use super::leaf::{LeafQuad, place_leaf};
use super::vertex::Vertex;
use super::PlantMesh;

/// Fewest angular subdivisions that still enclose a tube.
const MIN_RESOLUTION: u32 = 3;

/// Builds [`PlantMesh`]es from plants.
#[derive(Clone, Debug, Default)]
pub struct MeshGenerator {
    config: MeshConfig,
}

impl MeshGenerator {
    pub fn new(config: MeshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Tessellate every stem and leaf reachable from the root.
    pub fn generate(&self, plant: &Plant) -> PlantMesh {
        let mut buffers = MeshBuffers::new();
        if let Some(root) = plant.root() {
            self.add_stem(plant, root, &mut buffers);
        }

        let mut buffers = buffers.into_buffers();
        if self.config.unified_indices {
            let (mut vertices, mut indices) = (0, 0);
            for buffer in &mut buffers {
                let (v, i) = (buffer.vertex_count(), buffer.index_count());
                buffer.offset(vertices, indices);
                vertices += v;
                indices += i;
            }
        }

        let mesh = PlantMesh::new(buffers);
        log::debug!(
            "Generated plant mesh: {} buffers, {} vertices, {} indices",
            mesh.buffer_count(),
            mesh.vertex_count(),
            mesh.index_count()
        );
        mesh
    }

    fn add_stem(&self, plant: &Plant, id: StemId, buffers: &mut MeshBuffers) {
        let stem = &plant[id];
        if stem.location.is_nan() {
            log::debug!("Skipping stem {:?}: location is NaN", id);
            return;
        }

        self.add_tube(id, stem, buffers);
        for (index, leaf) in stem.leaves.iter().enumerate() {
            let slot = buffers.select(leaf.material);
            let buffer = buffers.get_mut(slot);
            let (vertex_start, index_start) = (buffer.vertex_count(), buffer.index_count());

            let quad = place_leaf(stem, leaf);
            for (corner, tex) in quad.corners.iter().zip(LeafQuad::TEX_COORDS) {
                buffer.push_vertex(Vertex::new(*corner, quad.normal, tex));
            }
            for [a, b, c] in LeafQuad::TRIANGLES {
                buffer.push_triangle(vertex_start + a, vertex_start + b, vertex_start + c);
            }

            buffer.push_leaf_segment(Segment {
                stem: id,
                leaf: Some(index),
                vertex_start,
                vertex_count: buffer.vertex_count() - vertex_start,
                index_start,
                index_count: buffer.index_count() - index_start,
            });
        }

        for child in plant.children(id) {
            self.add_stem(plant, child, buffers);
        }
    }

    /// Rings along the path, stitched together and capped at the tip.
    fn add_tube(&self, id: StemId, stem: &Stem, buffers: &mut MeshBuffers) {
        let path = &stem.path;
        let resolution = stem.resolution.max(MIN_RESOLUTION);
        let ring_size = if self.config.vertex_seam { resolution + 1 } else { resolution };

        let slot = buffers.select(stem.material(Surface::Outer));
        let buffer = buffers.get_mut(slot);
        let (vertex_start, index_start) = (buffer.vertex_count(), buffer.index_count());

        let mut v_offset = 0.0;
        let mut previous: Option<u32> = None;
        for section in 0..path.len() {
            let radius = path.radius(section);
            if radius > 0.0 {
                v_offset -= path.segment_length(section) / (TAU * radius);
            }

            let rotation = Quat::from_rotation_arc(Vec3::Y, path.average_direction(section));
            let center = stem.location + path.point(section);
            let ring = buffer.vertex_count();
            for i in 0..ring_size {
                let angle = i as f32 * TAU / resolution as f32;
                let normal = rotation * Vec3::new(angle.cos(), 0.0, angle.sin());
                let u = 1.0 - i as f32 / resolution as f32;
                buffer.push_vertex(Vertex::new(center + normal * radius, normal, Vec2::new(u, v_offset)));
            }

            if let Some(previous) = previous {
                for i in 0..resolution {
                    let next = if self.config.vertex_seam { i + 1 } else { (i + 1) % resolution };
                    let (a0, a1) = (previous + i, previous + next);
                    let (b0, b1) = (ring + i, ring + next);
                    buffer.push_triangle(b0, b1, a0);
                    buffer.push_triangle(a0, b1, a1);
                }
            }
            previous = Some(ring);
        }

        let segment = Segment {
            stem: id,
            leaf: None,
            vertex_start,
            vertex_count: buffer.vertex_count() - vertex_start,
            index_start,
            index_count: buffer.index_count() - index_start,
        };
        buffer.push_stem_segment(segment);
        log::trace!(
            "Stem {:?}: {} sections, {} vertices",
            id,
            path.len(),
            segment.vertex_count
        );

        if let Some(last_ring) = previous {
            let rim: Vec<Vec3> = buffer.vertices()[last_ring as usize..][..resolution as usize]
                .iter()
                .map(Vertex::position)
                .collect();
            let end_direction = path.direction(path.len() - 1);
            add_cap(buffers, stem.material(Surface::Inner), &rim, end_direction);
        }
    }
}

/// Close the tube tip with a disc built from the last ring's positions.
fn add_cap(buffers: &mut MeshBuffers, material: u32, rim: &[Vec3], normal: Vec3) {
    let count = rim.len() as u32;
    if count < 3 {
        return;
    }

    let slot = buffers.select(material);
    let buffer = buffers.get_mut(slot);
    let v = buffer.vertex_count();
    for (i, position) in rim.iter().enumerate() {
        let angle = i as f32 * TAU / count as f32;
        let tex = Vec2::new(angle.cos() * 0.5 + 0.5, angle.sin() * 0.5 + 0.5);
        buffer.push_vertex(Vertex::new(*position, normal, tex));
    }

    // Pair rim vertex i with its mirror count-1-i and fill the strip between
    let pairs = count / 2 - 1;
    for i in 0..pairs {
        buffer.push_triangle(v + i, v + count - i - 1, v + i + 1);
        buffer.push_triangle(v + i + 1, v + count - i - 1, v + count - i - 2);
    }
    if count % 2 == 1 {
        buffer.push_triangle(v + pairs, v + pairs + 2, v + pairs + 1);
    }
}
