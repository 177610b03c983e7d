//! Curve primitives used for stem centerlines and response profiles

pub mod curve;
pub mod path;

pub use curve::{Curve, Degree};
pub use path::Path;
