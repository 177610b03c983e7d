//! Piecewise Bezier curves with tangent-preserving structural edits.
//!
//! A curve is either a polyline (degree 1) or a chain of cubic segments
//! (degree 3) that share their end anchors. Cubic curves always hold `3k+1`
//! control points: anchors at indices divisible by 3, handles in between.
//!
//! The same type serves as a 3D centerline and as a 2D response curve,
//! where `x` is the increasing parameter and `y` the value.

use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec3};
use crate::core::Error;
use crate::math::bezier;

/// Fallback axis for directions that cannot be normalized.
const FALLBACK_AXIS: Vec3 = Vec3::Z;

/// Polynomial degree of every segment in a curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    /// Polyline: consecutive control points form segments.
    Linear,
    /// Cubic Bezier chain.
    #[default]
    Cubic,
}

impl Degree {
    /// Number of control points each segment advances by.
    pub const fn step(self) -> usize {
        match self {
            Degree::Linear => 1,
            Degree::Cubic => 3,
        }
    }

    /// Check whether `count` control points form a valid curve of this degree.
    pub fn is_valid_count(self, count: usize) -> bool {
        match self {
            Degree::Linear => count >= 1,
            Degree::Cubic => count >= 4 && count % 3 == 1,
        }
    }
}

/// A piecewise Bezier curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    controls: Vec<Vec3>,
    degree: Degree,
}

impl Curve {
    /// Create an empty curve of the given degree.
    pub fn new(degree: Degree) -> Self {
        Self {
            controls: Vec::new(),
            degree,
        }
    }

    /// Create a curve, validating the control count for the degree.
    pub fn with_controls(degree: Degree, controls: Vec<Vec3>) -> Result<Self> {
        if !degree.is_valid_count(controls.len()) {
            return Err(Error::InvalidControlCount {
                degree: degree.step() as u32,
                count: controls.len(),
            });
        }
        Ok(Self { controls, degree })
    }

    /// Straight cubic segment from `a` to `b` with handles at the thirds.
    pub fn segment(a: Vec3, b: Vec3) -> Self {
        let third = (b - a) / 3.0;
        Self {
            controls: vec![a, a + third, b - third, b],
            degree: Degree::Cubic,
        }
    }

    /// Replace all control points. The caller keeps the size invariant.
    pub fn set_controls(&mut self, controls: Vec<Vec3>) {
        self.controls = controls;
    }

    /// Control points in curve order.
    pub fn controls(&self) -> &[Vec3] {
        &self.controls
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// True if the curve has no control points.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Change the degree tag without touching the controls. See [`Curve::adjust`].
    pub fn set_degree(&mut self, degree: Degree) {
        self.degree = degree;
    }

    /// Get the curve degree
    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// Number of Bezier segments.
    pub fn curve_count(&self) -> usize {
        if self.controls.is_empty() {
            0
        } else {
            (self.controls.len() - 1) / self.degree.step()
        }
    }

    /// Evaluate a 2D response curve at parameter `t`.
    ///
    /// Each segment covers the `x` range between its two anchors. Returns
    /// `None` if `t` lies outside every segment.
    pub fn point_at(&self, t: f32) -> Option<Vec3> {
        let step = self.degree.step();
        if self.controls.len() <= step {
            return None;
        }

        (0..self.controls.len() - step)
            .step_by(step)
            .find(|&i| self.controls[i].x <= t && self.controls[i + step].x >= t)
            .map(|i| {
                let start = self.controls[i].x;
                let width = self.controls[i + step].x - start;
                let local = if width > 0.0 { (t - start) / width } else { 0.0 };
                bezier(local, &self.controls[i..=i + step])
            })
    }

    /// Evaluate segment `curve` at local parameter `t` in `[0, 1]`.
    pub fn point_on(&self, curve: usize, t: f32) -> Vec3 {
        let step = self.degree.step();
        let start = curve * step;
        bezier(t, &self.controls[start..=start + step])
    }

    /// Tangent at a control point: toward the next point, or from the
    /// previous one at the end of the curve. Zero for curves with fewer
    /// than two points.
    pub fn direction(&self, index: usize) -> Vec3 {
        if self.controls.len() < 2 {
            return Vec3::ZERO;
        }
        let last = self.controls.len() - 1;
        if index == last {
            (self.controls[index] - self.controls[index - 1]).normalize_or_zero()
        } else {
            (self.controls[index + 1] - self.controls[index]).normalize_or_zero()
        }
    }

    /// Insert a point after `index`, returning the index of the new point
    /// (the new anchor for cubic curves).
    pub fn insert(&mut self, index: usize, point: Vec3) -> usize {
        match self.degree {
            Degree::Linear => {
                if self.controls.is_empty() {
                    self.controls.push(point);
                    return 0;
                }
                self.controls.insert(index + 1, point);
                index + 1
            }
            Degree::Cubic => self.insert_cubic(index, point),
        }
    }

    fn insert_cubic(&mut self, index: usize, point: Vec3) -> usize {
        let c = &self.controls;
        let len = c.len();
        debug_assert!(self.degree.is_valid_count(len), "cubic insert on {len} controls");

        let (points, at, anchor) = match index % 3 {
            0 if index == len - 1 => {
                // Past the end: continue the incoming tangent out of the old anchor
                let d = c[index - 1] - c[index];
                ([c[index] - d, point + d, point], index + 1, index + 3)
            }
            0 => {
                let d = c[index + 1] - c[index];
                ([point - d, point, point + d], index + 2, index + 3)
            }
            1 if index == 1 => {
                let d = c[1] - c[0];
                ([point - d, point, point + d], 2, 3)
            }
            1 => {
                let before = c[index - 1] - c[index];
                let after = c[index - 1] - c[index - 2];
                ([point + before, point, point + after], index + 1, index + 2)
            }
            _ if index == len - 2 => {
                let d = c[index + 1] - c[index];
                ([point - d, point, point + d], index, index + 1)
            }
            _ => {
                let before = c[index] - c[index + 1];
                let after = c[index + 2] - c[index + 1];
                ([point + before, point, point + after], index, index + 1)
            }
        };

        self.controls.splice(at..at, points);
        anchor
    }

    /// Remove the point at `index`.
    ///
    /// Cubic curves lose a whole segment: the first or last segment when
    /// `index` falls on a boundary, otherwise the anchor nearest `index`
    /// together with its two handles.
    pub fn remove(&mut self, index: usize) {
        match self.degree {
            Degree::Linear => {
                self.controls.remove(index);
            }
            Degree::Cubic => {
                let len = self.controls.len();
                if len <= 4 {
                    self.controls.clear();
                } else if index < 2 {
                    self.controls.drain(0..3);
                } else if index > len - 3 {
                    self.controls.truncate(len - 3);
                } else {
                    let start = match index % 3 {
                        0 => index - 1,
                        1 => index - 2,
                        _ => index,
                    };
                    self.controls.drain(start..start + 3);
                }
            }
        }
    }

    /// Convert between polyline and cubic representations.
    ///
    /// Linear to cubic adds tangent handles at a quarter of the local chord
    /// length so the cubic follows the polyline; cubic to linear keeps only
    /// the anchors.
    pub fn adjust(&mut self, degree: Degree) {
        if degree == self.degree {
            return;
        }
        if self.controls.len() >= 2 {
            self.controls = match degree {
                Degree::Linear => self.controls.iter().step_by(3).copied().collect(),
                Degree::Cubic => Self::cubic_from_polyline(&self.controls),
            };
        }
        self.degree = degree;
    }

    fn cubic_from_polyline(anchors: &[Vec3]) -> Vec<Vec3> {
        let n = anchors.len();
        let mut controls = Vec::with_capacity(3 * (n - 1) + 1);

        controls.push(anchors[0]);
        controls.push(anchors[0] + (anchors[1] - anchors[0]) * 0.25);

        for i in 1..n - 1 {
            let incoming = anchors[i] - anchors[i - 1];
            let outgoing = anchors[i + 1] - anchors[i];
            let offset = (incoming.length() + outgoing.length()) * 0.5 * 0.25;
            let tangent = (incoming + outgoing).try_normalize().unwrap_or(FALLBACK_AXIS);

            controls.push(anchors[i] - tangent * offset);
            controls.push(anchors[i]);
            controls.push(anchors[i] + tangent * offset);
        }

        controls.push(anchors[n - 1] + (anchors[n - 2] - anchors[n - 1]) * 0.25);
        controls.push(anchors[n - 1]);
        controls
    }

    /// Move the control point at `index` to `location`.
    ///
    /// Cubic anchors carry their handles along. Handles move alone unless
    /// `parallel` is set, in which case the opposite handle is realigned.
    pub fn move_point(&mut self, index: usize, location: Vec3, parallel: bool) {
        if self.degree == Degree::Cubic && index % 3 == 0 {
            let delta = location - self.controls[index];
            if index > 0 {
                self.controls[index - 1] += delta;
            }
            if index + 1 < self.controls.len() {
                self.controls[index + 1] += delta;
            }
            self.controls[index] = location;
        } else {
            self.controls[index] = location;
            if parallel && self.degree == Degree::Cubic {
                self.parallelize(index);
            }
        }
    }

    /// Make the handle opposite `index` collinear with it through their
    /// shared anchor, keeping the opposite handle's distance to the anchor.
    pub fn parallelize(&mut self, index: usize) {
        if self.degree != Degree::Cubic {
            return;
        }

        let (anchor, opposite) = match index % 3 {
            1 if index >= 2 => (index - 1, index - 2),
            2 if index + 2 < self.controls.len() => (index + 1, index + 2),
            _ => return,
        };

        let c = &mut self.controls;
        let mut distance = (c[opposite] - c[anchor]).length();
        if distance == 0.0 {
            distance = 1.0;
        }
        let direction = (c[anchor] - c[index]).try_normalize().unwrap_or(FALLBACK_AXIS);
        c[opposite] = c[anchor] + direction * distance;
    }

    /// Remove all control points.
    pub fn clear(&mut self) {
        self.controls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z)
    }

    fn wavy_cubic() -> Curve {
        Curve::with_controls(
            Degree::Cubic,
            vec![
                v(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(2.0, 1.0, 0.0),
                v(3.0, 0.0, 0.0), v(4.0, -1.0, 0.0), v(5.0, -1.0, 0.0),
                v(6.0, 0.0, 0.0), v(7.0, 1.0, 0.0), v(8.0, 1.0, 0.0),
                v(9.0, 0.0, 0.0),
            ],
        )
        .unwrap()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn collinear_through(a: Vec3, anchor: Vec3, b: Vec3) -> bool {
        let da = (a - anchor).normalize();
        let db = (b - anchor).normalize();
        (da + db).length() < 1e-5
    }

    #[test]
    fn test_with_controls_rejects_bad_cubic_count() {
        let err = Curve::with_controls(Degree::Cubic, vec![Vec3::ZERO; 5]);
        assert!(matches!(err, Err(Error::InvalidControlCount { degree: 3, count: 5 })));
        assert!(Curve::with_controls(Degree::Linear, vec![Vec3::ZERO]).is_ok());
        assert!(Curve::with_controls(Degree::Linear, vec![]).is_err());
    }

    #[test]
    fn test_curve_count() {
        assert_eq!(wavy_cubic().curve_count(), 3);
        assert_eq!(Curve::new(Degree::Linear).curve_count(), 0);
        let line = Curve::with_controls(Degree::Linear, vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap();
        assert_eq!(line.curve_count(), 2);
    }

    #[test]
    fn test_point_at_response_curve() {
        let profile = Curve::with_controls(
            Degree::Linear,
            vec![v(0.0, 1.0, 0.0), v(0.5, 0.5, 0.0), v(1.0, 0.0, 0.0)],
        )
        .unwrap();
        assert!(approx(profile.point_at(0.25).unwrap(), v(0.25, 0.75, 0.0)));
        assert!(approx(profile.point_at(0.75).unwrap(), v(0.75, 0.25, 0.0)));
        assert!(profile.point_at(1.5).is_none());
        assert!(Curve::new(Degree::Cubic).point_at(0.0).is_none());
    }

    #[test]
    fn test_point_at_cubic_domain() {
        let curve = Curve::segment(v(0.0, 0.0, 0.0), v(1.0, 2.0, 0.0));
        assert!(approx(curve.point_at(0.5).unwrap(), v(0.5, 1.0, 0.0)));
        assert!(curve.point_at(-0.1).is_none());
    }

    #[test]
    fn test_point_on_segment() {
        let curve = wavy_cubic();
        assert!(approx(curve.point_on(1, 0.0), v(3.0, 0.0, 0.0)));
        assert!(approx(curve.point_on(1, 1.0), v(6.0, 0.0, 0.0)));
        assert!(curve.point_on(0, 0.5).y > 0.0);
    }

    #[test]
    fn test_direction() {
        let line = Curve::with_controls(Degree::Linear, vec![Vec3::ZERO, v(2.0, 0.0, 0.0), v(2.0, 3.0, 0.0)]).unwrap();
        assert!(approx(line.direction(0), Vec3::X));
        assert!(approx(line.direction(2), Vec3::Y));
    }

    #[test]
    fn test_direction_single_point() {
        let point = Curve::with_controls(Degree::Linear, vec![v(1.0, 2.0, 3.0)]).unwrap();
        assert_eq!(point.direction(0), Vec3::ZERO);
    }

    #[test]
    fn test_linear_insert_scenario() {
        let mut curve = Curve::with_controls(
            Degree::Linear,
            vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0)],
        )
        .unwrap();
        let index = curve.insert(0, v(0.5, 0.0, 0.0));
        assert_eq!(index, 1);
        assert_eq!(
            curve.controls(),
            &[v(0.0, 0.0, 0.0), v(0.5, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_linear_insert_remove_restores() {
        let original = vec![v(0.0, 0.0, 0.0), v(1.0, 2.0, 0.0), v(3.0, 1.0, 1.0)];
        let mut curve = Curve::with_controls(Degree::Linear, original.clone()).unwrap();
        let index = curve.insert(1, v(9.0, 9.0, 9.0));
        curve.remove(index);
        assert_eq!(curve.controls(), original.as_slice());
    }

    #[test]
    fn test_linear_insert_into_empty() {
        let mut curve = Curve::new(Degree::Linear);
        assert_eq!(curve.insert(0, Vec3::X), 0);
        assert_eq!(curve.controls(), &[Vec3::X]);
    }

    #[test]
    fn test_cubic_insert_keeps_invariant_every_index() {
        let base = wavy_cubic();
        for index in 0..base.len() {
            let mut curve = base.clone();
            let anchor = curve.insert(index, v(4.5, 5.0, 0.0));
            assert_eq!(curve.len(), base.len() + 3, "index {index}");
            assert_eq!(anchor % 3, 0, "index {index}");
            assert_eq!(curve.controls()[anchor], v(4.5, 5.0, 0.0), "index {index}");
        }
    }

    #[test]
    fn test_cubic_insert_at_anchor_preserves_tangent() {
        let mut curve = wavy_cubic();
        let p = v(4.5, 3.0, 0.0);
        let anchor = curve.insert(3, p);
        assert_eq!(anchor, 6);
        let c = curve.controls();
        // Handles mirror the tangent leaving anchor 3
        let tangent = v(4.0, -1.0, 0.0) - v(3.0, 0.0, 0.0);
        assert!(approx(c[anchor + 1] - p, tangent));
        assert!(approx(c[anchor - 1] - p, -tangent));
    }

    #[test]
    fn test_cubic_insert_after_last_anchor() {
        let mut curve = Curve::segment(Vec3::ZERO, v(3.0, 0.0, 0.0));
        let anchor = curve.insert(3, v(6.0, 0.0, 0.0));
        assert_eq!(anchor, 6);
        assert_eq!(curve.len(), 7);
        assert_eq!(
            curve.controls()[3..],
            [v(3.0, 0.0, 0.0), v(4.0, 0.0, 0.0), v(5.0, 0.0, 0.0), v(6.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_cubic_insert_remove_restores() {
        let base = wavy_cubic();
        let mut curve = base.clone();
        let anchor = curve.insert(3, v(4.5, 3.0, 0.0));
        curve.remove(anchor);
        assert_eq!(curve, base);
    }

    #[test]
    fn test_cubic_remove_granularity() {
        let base = wavy_cubic();

        let mut first = base.clone();
        first.remove(1);
        assert_eq!(first.controls(), &base.controls()[3..]);

        let mut last = base.clone();
        last.remove(9);
        assert_eq!(last.controls(), &base.controls()[..7]);

        let mut middle = base.clone();
        middle.remove(4); // handle after anchor 3
        assert_eq!(middle.len(), 7);
        assert!(!middle.controls().contains(&v(3.0, 0.0, 0.0)));

        let mut single = Curve::segment(Vec3::ZERO, Vec3::X);
        single.remove(2);
        assert!(single.is_empty());

        for index in 0..base.len() {
            let mut curve = base.clone();
            curve.remove(index);
            assert!(Degree::Cubic.is_valid_count(curve.len()), "index {index}");
        }
    }

    #[test]
    fn test_adjust_round_trip_counts() {
        let anchors = vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(2.0, 1.0, 0.0), v(2.0, 3.0, 0.0)];
        let mut curve = Curve::with_controls(Degree::Linear, anchors.clone()).unwrap();

        curve.adjust(Degree::Cubic);
        assert_eq!(curve.degree(), Degree::Cubic);
        assert_eq!(curve.len(), 3 * (anchors.len() - 1) + 1);
        for (i, anchor) in anchors.iter().enumerate() {
            assert_eq!(curve.controls()[i * 3], *anchor);
        }

        curve.adjust(Degree::Linear);
        assert_eq!(curve.controls(), anchors.as_slice());
    }

    #[test]
    fn test_adjust_interior_handles_follow_chords() {
        let mut curve = Curve::with_controls(
            Degree::Linear,
            vec![v(0.0, 0.0, 0.0), v(2.0, 0.0, 0.0), v(6.0, 0.0, 0.0)],
        )
        .unwrap();
        curve.adjust(Degree::Cubic);
        let c = curve.controls();
        // Average chord (2 + 4) / 2 = 3, a quarter of that is 0.75
        assert!(approx(c[2], v(1.25, 0.0, 0.0)));
        assert!(approx(c[4], v(2.75, 0.0, 0.0)));
        assert!(approx(c[1], v(0.5, 0.0, 0.0)));
        assert!(approx(c[5], v(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_move_anchor_translates_handles() {
        let mut curve = wavy_cubic();
        let before = curve.controls().to_vec();
        let delta = v(0.5, -2.0, 1.0);
        curve.move_point(3, before[3] + delta, false);
        let after = curve.controls();
        assert!(approx(after[2], before[2] + delta));
        assert!(approx(after[3], before[3] + delta));
        assert!(approx(after[4], before[4] + delta));
        assert_eq!(after[5], before[5]);
    }

    #[test]
    fn test_move_end_anchor() {
        let mut curve = wavy_cubic();
        curve.move_point(0, v(0.0, -1.0, 0.0), false);
        assert_eq!(curve.controls()[1], v(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_move_handle_parallel() {
        let mut curve = wavy_cubic();
        let distance = (curve.controls()[5] - curve.controls()[6]).length();

        curve.move_point(7, v(7.0, 3.0, 2.0), true);
        let c = curve.controls();
        assert!(collinear_through(c[7], c[6], c[5]));
        assert!(((c[5] - c[6]).length() - distance).abs() < 1e-5);

        curve.move_point(2, v(2.0, 4.0, -1.0), true);
        let c = curve.controls();
        assert!(collinear_through(c[2], c[3], c[4]));
    }

    #[test]
    fn test_move_handle_without_parallel() {
        let mut curve = wavy_cubic();
        let before = curve.controls().to_vec();
        curve.move_point(4, v(4.0, 5.0, 0.0), false);
        assert_eq!(curve.controls()[2], before[2]);
        assert_eq!(curve.controls()[4], v(4.0, 5.0, 0.0));
    }

    #[test]
    fn test_parallelize_degenerate_direction() {
        let mut curve = wavy_cubic();
        // Handle dropped onto its anchor: mirror falls back to +Z
        curve.move_point(4, v(3.0, 0.0, 0.0), true);
        let c = curve.controls();
        let mirrored = (c[2] - c[3]).normalize();
        assert!(approx(mirrored, Vec3::Z));
    }

    #[test]
    fn test_parallelize_zero_length_opposite() {
        let mut curve = Curve::with_controls(
            Degree::Cubic,
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Y, v(0.0, 2.0, 0.0), v(1.0, 2.0, 0.0), v(1.0, 3.0, 0.0)],
        )
        .unwrap();
        curve.move_point(4, v(0.0, 1.0, 1.0), true);
        let c = curve.controls();
        assert!(approx(c[2], v(0.0, 1.0, -1.0)));
    }

    #[test]
    fn test_clear() {
        let mut curve = wavy_cubic();
        curve.clear();
        assert!(curve.is_empty());
        assert_eq!(curve.curve_count(), 0);
    }
}
