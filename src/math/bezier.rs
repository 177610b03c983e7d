//! Bezier basis evaluation

use crate::core::types::Vec3;

/// Evaluate a Bezier curve of arbitrary order at `t`.
///
/// Orders up to cubic use the closed forms; higher orders fall back to
/// de Casteljau. An empty slice yields the origin.
pub fn bezier(t: f32, points: &[Vec3]) -> Vec3 {
    match points {
        [] => Vec3::ZERO,
        [a] => *a,
        [a, b] => linear(t, *a, *b),
        [a, b, c] => quadratic(t, *a, *b, *c),
        [a, b, c, d] => cubic(t, *a, *b, *c, *d),
        _ => de_casteljau(t, points),
    }
}

pub fn linear(t: f32, a: Vec3, b: Vec3) -> Vec3 {
    a + (b - a) * t
}

pub fn quadratic(t: f32, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let s = 1.0 - t;
    a * (s * s) + b * (2.0 * s * t) + c * (t * t)
}

pub fn cubic(t: f32, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Vec3 {
    let s = 1.0 - t;
    a * (s * s * s) + b * (3.0 * s * s * t) + c * (3.0 * s * t * t) + d * (t * t * t)
}

fn de_casteljau(t: f32, points: &[Vec3]) -> Vec3 {
    let mut work = points.to_vec();
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = linear(t, work[i], work[i + 1]);
        }
    }
    work[0]
}
