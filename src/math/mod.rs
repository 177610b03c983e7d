//! Mathematical utilities and data structures

pub mod aabb;
pub mod ray;
pub mod bezier;

pub use aabb::Aabb;
pub use ray::{Ray, FaceExit};
pub use bezier::bezier;
