//! Leaf quad placement.

use crate::core::types::{Mat3, Quat, Vec2, Vec3};
use crate::geometry::Path;
use crate::plant::{Leaf, Stem};

/// Corners of a placed leaf in world space, with the blade normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LeafQuad {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
}

impl LeafQuad {
    pub const TEX_COORDS: [Vec2; 4] = [
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, 0.0),
    ];

    pub const TRIANGLES: [[u32; 3]; 2] = [[0, 1, 3], [1, 2, 3]];
}

/// Place a leaf on its stem.
///
/// The quad is built in a local frame where x spans the width, y is the
/// blade normal and z runs along the length. Leaves inside the stem stick
/// out sideways; leaves past either end extend the stem tip.
pub(crate) fn place_leaf(stem: &Stem, leaf: &Leaf) -> LeafQuad {
    let path = &stem.path;
    let half_width = leaf.scale.x * 0.5;
    let length = leaf.scale.y;

    // Tilt about x leaves the base corners in place
    let local = leaf.orientation * Quat::from_rotation_x(leaf.tilt);
    let frame = stem_frame(path, leaf.position);

    let corners = [
        Vec3::new(half_width, 0.0, 0.0),
        Vec3::new(half_width, 0.0, length),
        Vec3::new(-half_width, 0.0, length),
        Vec3::new(-half_width, 0.0, 0.0),
    ]
    .map(|corner| frame.anchor + frame.rotation * (local * corner) + stem.location);

    LeafQuad {
        corners,
        normal: (frame.rotation * (local * Vec3::Y)).normalize_or(Vec3::Y),
    }
}

struct Frame {
    rotation: Mat3,
    anchor: Vec3,
}

fn stem_frame(path: &Path, position: f32) -> Frame {
    let side_leaf = position >= 0.0 && position < path.length();

    let (direction, anchor) = if side_leaf {
        (path.intermediate_direction(position), path.intermediate_point(position))
    } else if path.is_empty() {
        (Vec3::Y, Vec3::ZERO)
    } else {
        let last = path.len() - 1;
        (path.direction(last), path.point(last))
    };

    let side = direction.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let normal = side.cross(direction).try_normalize().unwrap_or(Vec3::Y);
    let length_axis = if side_leaf { side } else { direction };
    let width_axis = normal.cross(length_axis);

    Frame {
        rotation: Mat3::from_cols(width_axis, normal, length_axis),
        anchor,
    }
}
