//! Closed-form evaluators for the parametric edges of a boundary model.
//!
//! Every evaluator maps `t ∈ [0,1]` onto its curve and returns the stored start
//! and end points *bit-for-bit* at `t = 0` and `t = 1`. Faces sharing an edge
//! sample it independently, so any drift at the endpoints would open a crack
//! between neighbouring face batches.

use crate::float_types::Real;
use nalgebra::Point3;

pub mod arc;

pub use arc::{ArcDirection, CircularArc, GeneralArc};

/// Traversal direction of an edge inside a face loop.
///
/// `Forward` walks endpoint 0 → endpoint 1, `Reverse` walks it backwards.
/// The edge itself is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Winding {
    #[default]
    Forward,
    Reverse,
}

impl Winding {
    /// Map a `±1` winding sign onto a [`Winding`]. Zero is rejected.
    pub const fn from_sign(sign: i32) -> Option<Winding> {
        if sign > 0 {
            Some(Winding::Forward)
        } else if sign < 0 {
            Some(Winding::Reverse)
        } else {
            None
        }
    }

    pub const fn sign(self) -> i32 {
        match self {
            Winding::Forward => 1,
            Winding::Reverse => -1,
        }
    }

    pub const fn reversed(self) -> Winding {
        match self {
            Winding::Forward => Winding::Reverse,
            Winding::Reverse => Winding::Forward,
        }
    }
}

/// A curve parameterized over `[0,1]`.
pub trait Curve {
    fn start(&self) -> Point3<Real>;
    fn end(&self) -> Point3<Real>;

    /// Position at `t`, clamped to `[0,1]`.
    fn point(&self, t: Real) -> Point3<Real>;

    /// `true` when the curve is a straight segment and needs no subdivision.
    fn is_straight(&self) -> bool {
        false
    }

    /// Position at traversal parameter `t` when walked in direction `winding`.
    fn point_along(&self, t: Real, winding: Winding) -> Point3<Real> {
        match winding {
            Winding::Forward => self.point(t),
            Winding::Reverse => self.point(1.0 - t),
        }
    }

    /// First point when walked in direction `winding`.
    fn first(&self, winding: Winding) -> Point3<Real> {
        match winding {
            Winding::Forward => self.start(),
            Winding::Reverse => self.end(),
        }
    }

    /// Last point when walked in direction `winding`.
    fn last(&self, winding: Winding) -> Point3<Real> {
        self.first(winding.reversed())
    }

    /// `segments + 1` samples along the traversal direction, endpoints exact.
    fn sample(&self, segments: usize, winding: Winding) -> Vec<Point3<Real>> {
        let n = segments.max(1);
        let (first, last) = (self.first(winding), self.last(winding));
        (0..=n)
            .map(|i| {
                if i == 0 {
                    first
                } else if i == n {
                    last
                } else {
                    self.point_along(i as Real / n as Real, winding)
                }
            })
            .collect()
    }

    /// Length of the polyline through `segments + 1` samples.
    fn length(&self, segments: usize) -> Real {
        self.sample(segments, Winding::Forward)
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }
}

/// Straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
}

impl LineSegment {
    pub const fn new(start: Point3<Real>, end: Point3<Real>) -> Self {
        LineSegment { start, end }
    }
}

impl Curve for LineSegment {
    fn start(&self) -> Point3<Real> {
        self.start
    }

    fn end(&self) -> Point3<Real> {
        self.end
    }

    fn point(&self, t: Real) -> Point3<Real> {
        if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.end
        } else {
            self.start + (self.end - self.start) * t
        }
    }

    fn is_straight(&self) -> bool {
        true
    }

    /// A straight segment never needs interior samples.
    fn sample(&self, _segments: usize, winding: Winding) -> Vec<Point3<Real>> {
        vec![self.first(winding), self.last(winding)]
    }
}

/// Piecewise-linear curve, used for edges derived from a discrete mesh.
/// The parameter is spread uniformly over the segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3<Real>>,
}

impl Polyline {
    /// Returns `None` for fewer than two points.
    pub fn new(points: Vec<Point3<Real>>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Polyline { points })
    }

    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }
}

impl Curve for Polyline {
    fn start(&self) -> Point3<Real> {
        self.points[0]
    }

    fn end(&self) -> Point3<Real> {
        self.points[self.points.len() - 1]
    }

    fn point(&self, t: Real) -> Point3<Real> {
        if t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }
        let s = t * self.segment_count() as Real;
        let i = (s.floor() as usize).min(self.segment_count() - 1);
        let local = s - i as Real;
        self.points[i] + (self.points[i + 1] - self.points[i]) * local
    }

    /// Polylines keep their own vertices instead of being resampled.
    fn sample(&self, _segments: usize, winding: Winding) -> Vec<Point3<Real>> {
        match winding {
            Winding::Forward => self.points.clone(),
            Winding::Reverse => self.points.iter().rev().copied().collect(),
        }
    }
}

/// The evaluator of any edge in the boundary model.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeCurve {
    Line(LineSegment),
    Circle(CircularArc),
    Arc(GeneralArc),
    Polyline(Polyline),
}

impl Curve for EdgeCurve {
    fn start(&self) -> Point3<Real> {
        match self {
            EdgeCurve::Line(c) => c.start(),
            EdgeCurve::Circle(c) => c.start(),
            EdgeCurve::Arc(c) => c.start(),
            EdgeCurve::Polyline(c) => c.start(),
        }
    }

    fn end(&self) -> Point3<Real> {
        match self {
            EdgeCurve::Line(c) => c.end(),
            EdgeCurve::Circle(c) => c.end(),
            EdgeCurve::Arc(c) => c.end(),
            EdgeCurve::Polyline(c) => c.end(),
        }
    }

    fn point(&self, t: Real) -> Point3<Real> {
        match self {
            EdgeCurve::Line(c) => c.point(t),
            EdgeCurve::Circle(c) => c.point(t),
            EdgeCurve::Arc(c) => c.point(t),
            EdgeCurve::Polyline(c) => c.point(t),
        }
    }

    fn is_straight(&self) -> bool {
        matches!(self, EdgeCurve::Line(_))
    }

    fn sample(&self, segments: usize, winding: Winding) -> Vec<Point3<Real>> {
        match self {
            EdgeCurve::Line(c) => c.sample(segments, winding),
            EdgeCurve::Circle(c) => c.sample(segments, winding),
            EdgeCurve::Arc(c) => c.sample(segments, winding),
            EdgeCurve::Polyline(c) => c.sample(segments, winding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_sampling_keeps_endpoints() {
        let line = LineSegment::new(Point3::new(0.1, 0.2, 0.3), Point3::new(1.7, -2.0, 9.0));
        let pts = line.sample(7, Winding::Reverse);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], line.end);
        assert_eq!(pts[1], line.start);
    }

    #[test]
    fn polyline_parameter_is_uniform_per_segment() {
        let poly = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ])
        .expect("two or more points");
        assert_eq!(poly.point(0.5), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(poly.point(0.75), Point3::new(1.0, 1.5, 0.0));
        assert!(Polyline::new(vec![Point3::origin()]).is_none());
    }

    #[test]
    fn winding_sign_round_trip() {
        assert_eq!(Winding::from_sign(-1), Some(Winding::Reverse));
        assert_eq!(Winding::from_sign(0), None);
        assert_eq!(Winding::Reverse.reversed().sign(), 1);
    }
}
