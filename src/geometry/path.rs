//! Sampled stem centerlines with a radius profile.
//!
//! A [`Path`] samples its curve into discrete cross-sections. Each Bezier
//! segment contributes `resolution` evenly spaced samples in curve
//! parameter, and the final control point closes the path. All derived
//! values (positions, distances) are cached and rebuilt whenever the curve
//! or resolution changes.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use super::curve::{Curve, Degree};

/// Direction reported for paths too short to have a tangent.
const DEFAULT_DIRECTION: Vec3 = Vec3::Y;

/// A curve sampled into cross-sections, with a radius profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    curve: Curve,
    /// Cross-sections per curve segment
    resolution: u32,
    /// Radius multiplier keyed by normalized arc length (x) -> value (y)
    radius_curve: Curve,
    max_radius: f32,
    min_radius: f32,
    #[serde(skip)]
    points: Vec<Vec3>,
    #[serde(skip)]
    distances: Vec<f32>,
}

impl Default for Path {
    fn default() -> Self {
        Self::new(Curve::new(Degree::Cubic), 1)
    }
}

impl Path {
    pub fn new(curve: Curve, resolution: u32) -> Self {
        let mut path = Self {
            curve,
            resolution: resolution.max(1),
            radius_curve: Curve::new(Degree::Linear),
            max_radius: 0.1,
            min_radius: 0.0,
            points: Vec::new(),
            distances: Vec::new(),
        };
        path.resample();
        path
    }

    pub fn set_curve(&mut self, curve: Curve) {
        self.curve = curve;
        self.resample();
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Set cross-sections per curve segment (at least 1).
    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution.max(1);
        self.resample();
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn set_radius_curve(&mut self, curve: Curve) {
        self.radius_curve = curve;
    }

    pub fn radius_curve(&self) -> &Curve {
        &self.radius_curve
    }

    pub fn set_max_radius(&mut self, radius: f32) {
        self.max_radius = radius;
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn set_min_radius(&mut self, radius: f32) {
        self.min_radius = radius;
    }

    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }

    /// Rebuild cached samples. Needed after deserializing.
    pub fn resample(&mut self) {
        self.points.clear();
        self.distances.clear();

        let curves = self.curve.curve_count();
        for curve in 0..curves {
            for j in 0..self.resolution {
                let t = j as f32 / self.resolution as f32;
                self.points.push(self.curve.point_on(curve, t));
            }
        }
        if let Some(&last) = self.curve.controls().last() {
            self.points.push(last);
        }

        let mut total = 0.0;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                total += point.distance(self.points[i - 1]);
            }
            self.distances.push(total);
        }
    }

    /// Number of cross-sections.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    /// Tangent of the section: toward the next section, or from the
    /// previous one at the end.
    pub fn direction(&self, index: usize) -> Vec3 {
        let len = self.points.len();
        if len < 2 {
            return DEFAULT_DIRECTION;
        }
        let (a, b) = if index + 1 >= len {
            (self.points[index - 1], self.points[index])
        } else {
            (self.points[index], self.points[index + 1])
        };
        (b - a).try_normalize().unwrap_or(DEFAULT_DIRECTION)
    }

    /// Tangent smoothed over the two segments meeting at an interior section.
    pub fn average_direction(&self, index: usize) -> Vec3 {
        if index == 0 || index + 1 >= self.points.len() {
            return self.direction(index);
        }
        (self.direction(index - 1) + self.direction(index))
            .try_normalize()
            .unwrap_or_else(|| self.direction(index))
    }

    /// Arc length from the start of the path to the section.
    pub fn distance(&self, index: usize) -> f32 {
        self.distances[index]
    }

    /// Arc length between the previous section and this one (0 for the first).
    pub fn segment_length(&self, index: usize) -> f32 {
        if index == 0 {
            0.0
        } else {
            self.distances[index] - self.distances[index - 1]
        }
    }

    /// Total arc length.
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Radius at a section.
    pub fn radius(&self, index: usize) -> f32 {
        self.radius_at_distance(self.distances[index])
    }

    /// Radius at an arc-length distance along the path.
    pub fn intermediate_radius(&self, distance: f32) -> f32 {
        self.radius_at_distance(distance.clamp(0.0, self.length()))
    }

    fn radius_at_distance(&self, distance: f32) -> f32 {
        let length = self.length();
        let t = if length > 0.0 { distance / length } else { 0.0 };
        let scale = self.radius_curve.point_at(t).map_or(1.0, |p| p.y);
        (self.max_radius * scale).max(self.min_radius)
    }

    /// Section index starting the segment that contains `distance`, and the
    /// clamped distance itself.
    fn locate(&self, distance: f32) -> (usize, f32) {
        let distance = distance.clamp(0.0, self.length());
        let segments = self.points.len().saturating_sub(1);
        let index = self.distances[1..]
            .partition_point(|&d| d < distance)
            .min(segments.saturating_sub(1));
        (index, distance)
    }

    /// Point at an arc-length distance, interpolated between sections.
    pub fn intermediate_point(&self, distance: f32) -> Vec3 {
        if self.points.len() < 2 {
            return self.points.first().copied().unwrap_or(Vec3::ZERO);
        }
        let (index, distance) = self.locate(distance);
        let span = self.segment_length(index + 1);
        let t = if span > 0.0 {
            (distance - self.distances[index]) / span
        } else {
            0.0
        };
        self.points[index].lerp(self.points[index + 1], t)
    }

    /// Direction of the segment containing an arc-length distance.
    pub fn intermediate_direction(&self, distance: f32) -> Vec3 {
        if self.points.len() < 2 {
            return DEFAULT_DIRECTION;
        }
        let (index, _) = self.locate(distance);
        self.direction(index)
    }
}
