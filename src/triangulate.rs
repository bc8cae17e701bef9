//! Planar triangulation of a closed 2D boundary loop.
//!
//! Ear clipping through `geo`'s earcut binding. The result is deterministic for
//! a given input ordering and every triangle is wound the same way as the loop.

use crate::errors::TessellationError;
use crate::float_types::{EPSILON, Real};
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Point2, Point3, Vector3};

/// Newell normal of a closed 3D loop; its length is twice the enclosed area.
pub fn newell_normal(points: &[Point3<Real>]) -> Vector3<Real> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Twice the signed area of a closed loop (positive when counter-clockwise).
pub fn signed_area2(points: &[Point2<Real>]) -> Real {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

#[inline]
fn orient2(a: &Point2<Real>, b: &Point2<Real>, c: &Point2<Real>) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Triangulate the interior of an implicitly closed loop.
///
/// Returns index triples into `points`. Triangles follow the loop's own
/// orientation, so a counter-clockwise loop yields counter-clockwise triangles.
pub fn triangulate_loop(points: &[Point2<Real>]) -> Result<Vec<[usize; 3]>, TessellationError> {
    let lift = |p: &Point2<Real>| Point3::new(p.x, p.y, 0.0);

    if points.len() < 3 {
        return Err(TessellationError::degenerate(
            format!("boundary loop has {} points, at least 3 are needed", points.len()),
            points.first().map(lift),
        ));
    }
    if let Some(bad) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(TessellationError::degenerate("boundary loop has a non-finite coordinate", Some(lift(bad))));
    }

    let area2 = signed_area2(points);
    if area2.abs() <= EPSILON {
        return Err(TessellationError::degenerate("boundary loop encloses no area", Some(lift(&points[0]))));
    }

    let coords: Vec<Coord<Real>> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    let polygon = GeoPolygon::new(LineString::new(coords), vec![]);
    let triangulation = polygon.earcut_triangles_raw();

    // geo closes the ring, so a trailing index may refer to the repeated first point
    let n = points.len();
    let mut triangles: Vec<[usize; 3]> = triangulation
        .triangle_indices
        .chunks_exact(3)
        .map(|tri| [tri[0] % n, tri[1] % n, tri[2] % n])
        .collect();

    for tri in triangles.iter_mut() {
        let o = orient2(&points[tri[0]], &points[tri[1]], &points[tri[2]]);
        if o * area2 < 0.0 {
            tri.swap(1, 2);
        }
    }

    if triangles.is_empty() {
        return Err(TessellationError::degenerate("ear clipping produced no triangles", Some(lift(&points[0]))));
    }
    Ok(triangles)
}
