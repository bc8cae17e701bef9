use super::{MeshBatch, TessellationOptions};
use crate::errors::TessellationError;
use crate::float_types::Real;
use crate::topology::{Face, Topology};
use nalgebra::Point3;

/// Point `k / m` of the way from `a` to `b`, returning the endpoints verbatim.
#[inline]
fn lerp(a: &Point3<Real>, b: &Point3<Real>, k: usize, m: usize) -> Point3<Real> {
    if k == 0 {
        *a
    } else if k == m {
        *b
    } else {
        a + (b - a) * (k as Real / m as Real)
    }
}

/// Grid point `(i, j)` of the bilinear patch through `corners`, as a lerp
/// between the points `i / m` along edges 0 and 2. Boundary rows and columns
/// reduce to a lerp between the two corners of their edge.
pub fn bilinear_point(corners: &[Point3<Real>; 4], i: usize, j: usize, m: usize) -> Point3<Real> {
    let near = lerp(&corners[0], &corners[1], i, m);
    let far = lerp(&corners[3], &corners[2], i, m);
    lerp(&near, &far, j, m)
}

/// Bilinear quad faces: an `(M+1) × (M+1)` grid interpolating the four loop
/// corners. Edge geometry is ignored, only the corner nodes matter.
pub(super) fn tessellate(
    topology: &Topology,
    face: &Face,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let nodes = topology.face_nodes(face.id)?;
    let corners = [
        topology.position(nodes[0])?,
        topology.position(nodes[1])?,
        topology.position(nodes[2])?,
        topology.position(nodes[3])?,
    ];

    let m = options.quad_divisions;
    let idx = |i: usize, j: usize| j * (m + 1) + i;

    let mut batch = MeshBatch::with_capacity((m + 1) * (m + 1), 2 * m * m);
    for j in 0..=m {
        for i in 0..=m {
            let tag = match (i, j) {
                (0, 0) => Some(nodes[0]),
                (i, 0) if i == m => Some(nodes[1]),
                (i, j) if i == m && j == m => Some(nodes[2]),
                (0, j) if j == m => Some(nodes[3]),
                _ => None,
            };
            batch.push_vertex(bilinear_point(&corners, i, j, m), tag);
        }
    }

    for j in 0..m {
        for i in 0..m {
            let a = idx(i, j);
            let b = idx(i + 1, j);
            let c = idx(i + 1, j + 1);
            let d = idx(i, j + 1);
            batch.push_triangle([a, b, c], face.id);
            batch.push_triangle([c, d, a], face.id);
        }
    }

    let e0_run: Vec<usize> = (0..=m).map(|i| idx(i, 0)).collect();
    let e1_run: Vec<usize> = (0..=m).map(|j| idx(m, j)).collect();
    let e2_run: Vec<usize> = (0..=m).rev().map(|i| idx(i, m)).collect();
    let e3_run: Vec<usize> = (0..=m).rev().map(|j| idx(0, j)).collect();
    batch.push_polyline(&e0_run, face.edges[0].edge);
    batch.push_polyline(&e1_run, face.edges[1].edge);
    batch.push_polyline(&e2_run, face.edges[2].edge);
    batch.push_polyline(&e3_run, face.edges[3].edge);
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_come_back_verbatim() {
        let corners = [
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(1.7, 0.2, 0.3),
            Point3::new(1.9, 1.3, 0.7),
            Point3::new(0.3, 1.1, 0.9),
        ];
        let m = 7;
        assert_eq!(bilinear_point(&corners, 0, 0, m), corners[0]);
        assert_eq!(bilinear_point(&corners, m, 0, m), corners[1]);
        assert_eq!(bilinear_point(&corners, m, m, m), corners[2]);
        assert_eq!(bilinear_point(&corners, 0, m, m), corners[3]);
    }

    #[test]
    fn boundary_samples_stay_on_a_unit_face() {
        let corners = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let m = 10;
        for i in 0..=m {
            for j in 0..=m {
                let p = bilinear_point(&corners, i, j, m);
                assert_eq!(p.z, 1.0);
                assert!(p.x <= 1.0 && p.y <= 1.0);
            }
            // the far column is exactly x = 1
            assert_eq!(bilinear_point(&corners, m, i, m).x, 1.0);
        }
    }
}
