//! Arbor - procedural plant geometry
//!
//! Bezier stem curves, tube tessellation with leaf quads, a sparse density
//! octree for placement, and the derivation tree that names stem levels.

pub mod core;
pub mod math;
pub mod geometry;
pub mod plant;
pub mod mesh;
pub mod volume;
pub mod derivation;
