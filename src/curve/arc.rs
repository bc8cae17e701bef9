//! Circular and general (radius-blending) arcs.

use super::Curve;
use crate::errors::TessellationError;
use crate::float_types::{EPSILON, Real, TAU, tolerance};
use nalgebra::{Point3, Unit, Vector3};

/// Sense of rotation about the arc's plane normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcDirection {
    /// Right-hand rule about the normal; sweeps in `(0, 2π]`.
    #[default]
    CounterClockwise,
    /// The complementary arc; sweeps in `[-2π, 0)`.
    Clockwise,
}

/// Polar frame shared by both arc flavours.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcFrame {
    center: Point3<Real>,
    normal: Unit<Vector3<Real>>,
    /// in-plane unit vector towards the start point
    u: Vector3<Real>,
    /// `normal × u`
    v: Vector3<Real>,
    start_radius: Real,
    end_radius: Real,
    /// signed angle, positive about `normal`
    sweep: Real,
}

impl ArcFrame {
    fn new(
        center: Point3<Real>,
        start: Point3<Real>,
        end: Point3<Real>,
        normal: &Vector3<Real>,
        direction: ArcDirection,
    ) -> Result<Self, TessellationError> {
        let normal = Unit::try_new(*normal, EPSILON).ok_or_else(|| {
            TessellationError::degenerate("arc plane normal has zero length", Some(center))
        })?;

        // project both radius vectors into the arc plane
        let r0 = start - center;
        let r0 = r0 - normal.into_inner() * normal.dot(&r0);
        let r1 = end - center;
        let r1 = r1 - normal.into_inner() * normal.dot(&r1);

        let start_radius = r0.norm();
        let end_radius = r1.norm();
        if start_radius <= tolerance() {
            return Err(TessellationError::degenerate(
                "arc start point coincides with its center",
                Some(start),
            ));
        }
        if end_radius <= tolerance() {
            return Err(TessellationError::degenerate(
                "arc end point coincides with its center",
                Some(end),
            ));
        }

        let u = r0 / start_radius;
        let v = normal.cross(&u);

        let mut angle = r1.dot(&v).atan2(r1.dot(&u));
        if angle <= tolerance() {
            // coincident start/end directions mean a full turn
            angle += TAU;
        }
        let sweep = match direction {
            ArcDirection::CounterClockwise => angle,
            ArcDirection::Clockwise => angle - TAU,
        };
        let sweep = if sweep.abs() <= tolerance() { -TAU } else { sweep };

        Ok(ArcFrame { center, normal, u, v, start_radius, end_radius, sweep })
    }

    #[inline]
    fn at(&self, angle: Real, radius: Real) -> Point3<Real> {
        let (s, c) = angle.sin_cos();
        self.center + (self.u * c + self.v * s) * radius
    }
}

/// A circular arc of constant radius `|start − center|`.
///
/// The end point fixes only the end *angle*; if it sits at a different radius
/// the arc still returns it verbatim at `t = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArc {
    start: Point3<Real>,
    end: Point3<Real>,
    frame: ArcFrame,
}

impl CircularArc {
    /// Arc about `center` in the plane with normal `normal`.
    pub fn from_center(
        center: Point3<Real>,
        start: Point3<Real>,
        end: Point3<Real>,
        normal: &Vector3<Real>,
        direction: ArcDirection,
    ) -> Result<Self, TessellationError> {
        let frame = ArcFrame::new(center, start, end, normal, direction)?;
        Ok(CircularArc { start, end, frame })
    }

    /// Arc about `center`, with the plane taken from the three points.
    ///
    /// Takes the shorter arc. Fails for half circles, whose plane is ambiguous.
    pub fn from_center_minor(
        center: Point3<Real>,
        start: Point3<Real>,
        end: Point3<Real>,
    ) -> Result<Self, TessellationError> {
        let normal = (start - center).cross(&(end - center));
        if normal.norm_squared() <= EPSILON {
            return Err(TessellationError::degenerate(
                "arc center, start and end are collinear; the plane is undefined",
                Some(center),
            ));
        }
        Self::from_center(center, start, end, &normal, ArcDirection::CounterClockwise)
    }

    /// The unique arc that starts at `start`, passes through `through` and
    /// ends at `end`.
    pub fn from_three_points(
        start: Point3<Real>,
        through: Point3<Real>,
        end: Point3<Real>,
    ) -> Result<Self, TessellationError> {
        let center = circumcenter(&start, &through, &end)?;
        let normal = (through - start).cross(&(end - start));
        Self::from_center(center, start, end, &normal, ArcDirection::CounterClockwise)
    }

    pub const fn center(&self) -> Point3<Real> {
        self.frame.center
    }

    pub const fn radius(&self) -> Real {
        self.frame.start_radius
    }

    pub fn normal(&self) -> Vector3<Real> {
        self.frame.normal.into_inner()
    }

    /// Signed sweep angle about [`normal`](Self::normal).
    pub const fn sweep(&self) -> Real {
        self.frame.sweep
    }
}

impl Curve for CircularArc {
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
            self.frame.at(self.frame.sweep * t, self.frame.start_radius)
        }
    }
}

/// An arc whose radius blends linearly from `|start − center|` to `|end − center|`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralArc {
    start: Point3<Real>,
    end: Point3<Real>,
    frame: ArcFrame,
}

impl GeneralArc {
    pub fn from_center(
        center: Point3<Real>,
        start: Point3<Real>,
        end: Point3<Real>,
        normal: &Vector3<Real>,
        direction: ArcDirection,
    ) -> Result<Self, TessellationError> {
        let frame = ArcFrame::new(center, start, end, normal, direction)?;
        Ok(GeneralArc { start, end, frame })
    }

    pub const fn center(&self) -> Point3<Real> {
        self.frame.center
    }

    pub const fn sweep(&self) -> Real {
        self.frame.sweep
    }

    pub fn radius_at(&self, t: Real) -> Real {
        let t = t.clamp(0.0, 1.0);
        self.frame.start_radius + (self.frame.end_radius - self.frame.start_radius) * t
    }
}

impl Curve for GeneralArc {
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
            self.frame.at(self.frame.sweep * t, self.radius_at(t))
        }
    }
}

/// Center of the circle through three points.
pub fn circumcenter(
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
) -> Result<Point3<Real>, TessellationError> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let n2 = n.norm_squared();
    if n2 <= EPSILON {
        return Err(TessellationError::degenerate(
            "three arc points are collinear or coincident",
            Some(*a),
        ));
    }
    let offset = (n.cross(&ab) * ac.norm_squared() + ac.cross(&n) * ab.norm_squared()) / (2.0 * n2);
    Ok(a + offset)
}
