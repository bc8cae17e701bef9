//! Face shape functions and edge interpolation for higher-order faces.
//!
//! Quads are parameterized on `(r, s) ∈ [-1, 1]²` with corners in face-table
//! order. Triangles use `(r, s)` as the area coordinates of nodes 1 and 2,
//! so node 0 sits at the origin.

use super::FaceShape;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Natural coordinates of the nine Lagrange quad nodes.
const QUAD_NODES: [(Real, Real); 9] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (0.0, -1.0),
    (1.0, 0.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, 0.0),
];

const QUAD8_EDGES: &[&[usize]] = &[&[0, 1, 4], &[1, 2, 5], &[2, 3, 6], &[3, 0, 7]];
const TRI6_EDGES: &[&[usize]] = &[&[0, 1, 3], &[1, 2, 4], &[2, 0, 5]];
const TRI10_EDGES: &[&[usize]] = &[&[0, 1, 3, 4], &[1, 2, 5, 6], &[2, 0, 7, 8]];

impl FaceShape {
    pub const fn is_quad(self) -> bool {
        matches!(self, FaceShape::Quad4 | FaceShape::Quad8 | FaceShape::Quad9)
    }

    /// Polynomial order along the face edges.
    pub const fn edge_order(self) -> usize {
        match self {
            FaceShape::Tri3 | FaceShape::Quad4 => 1,
            FaceShape::Tri6 | FaceShape::Tri7 | FaceShape::Quad8 | FaceShape::Quad9 => 2,
            FaceShape::Tri10 => 3,
        }
    }

    /// Local nodes of each edge: the two ends, then the interior nodes in
    /// order from the first end. Linear faces have no edge table.
    pub const fn edges(self) -> &'static [&'static [usize]] {
        match self {
            FaceShape::Tri3 | FaceShape::Quad4 => &[],
            FaceShape::Tri6 | FaceShape::Tri7 => TRI6_EDGES,
            FaceShape::Tri10 => TRI10_EDGES,
            FaceShape::Quad8 | FaceShape::Quad9 => QUAD8_EDGES,
        }
    }

    /// Shape function values at `(r, s)`, one per face node.
    pub fn weights(self, r: Real, s: Real) -> Vec<Real> {
        match self {
            FaceShape::Quad4 => QUAD_NODES[..4]
                .iter()
                .map(|&(ri, si)| 0.25 * (1.0 + ri * r) * (1.0 + si * s))
                .collect(),
            FaceShape::Quad8 => {
                let mut w: Vec<Real> = QUAD_NODES[..4]
                    .iter()
                    .map(|&(ri, si)| 0.25 * (1.0 + ri * r) * (1.0 + si * s) * (ri * r + si * s - 1.0))
                    .collect();
                w.extend([
                    0.5 * (1.0 - r * r) * (1.0 - s),
                    0.5 * (1.0 + r) * (1.0 - s * s),
                    0.5 * (1.0 - r * r) * (1.0 + s),
                    0.5 * (1.0 - r) * (1.0 - s * s),
                ]);
                w
            },
            FaceShape::Quad9 => QUAD_NODES.iter().map(|&(ri, si)| lagrange3(ri, r) * lagrange3(si, s)).collect(),
            FaceShape::Tri3 => {
                let [l0, l1, l2] = area_coordinates(r, s);
                vec![l0, l1, l2]
            },
            FaceShape::Tri6 => tri6(area_coordinates(r, s)).to_vec(),
            FaceShape::Tri7 => {
                let l = area_coordinates(r, s);
                let bubble = l[0] * l[1] * l[2];
                let mut w = tri6(l).to_vec();
                w[..3].iter_mut().for_each(|n| *n += 3.0 * bubble);
                w[3..].iter_mut().for_each(|n| *n -= 12.0 * bubble);
                w.push(27.0 * bubble);
                w
            },
            FaceShape::Tri10 => {
                let [l0, l1, l2] = area_coordinates(r, s);
                let corner = |l: Real| 0.5 * l * (3.0 * l - 1.0) * (3.0 * l - 2.0);
                let side = |near: Real, far: Real| 4.5 * near * far * (3.0 * near - 1.0);
                vec![
                    corner(l0),
                    corner(l1),
                    corner(l2),
                    side(l0, l1),
                    side(l1, l0),
                    side(l1, l2),
                    side(l2, l1),
                    side(l2, l0),
                    side(l0, l2),
                    27.0 * l0 * l1 * l2,
                ]
            },
        }
    }
}

fn area_coordinates(r: Real, s: Real) -> [Real; 3] {
    [1.0 - r - s, r, s]
}

fn tri6([l0, l1, l2]: [Real; 3]) -> [Real; 6] {
    [
        l0 * (2.0 * l0 - 1.0),
        l1 * (2.0 * l1 - 1.0),
        l2 * (2.0 * l2 - 1.0),
        4.0 * l0 * l1,
        4.0 * l1 * l2,
        4.0 * l2 * l0,
    ]
}

/// Quadratic Lagrange polynomial of the node at `xi ∈ {-1, 0, 1}`.
fn lagrange3(xi: Real, x: Real) -> Real {
    if xi < 0.0 {
        0.5 * x * (x - 1.0)
    } else if xi > 0.0 {
        0.5 * x * (x + 1.0)
    } else {
        1.0 - x * x
    }
}

/// Weighted sum of node positions.
pub fn interpolate_point(weights: &[Real], points: &[Point3<Real>]) -> Point3<Real> {
    Point3::from(weights.iter().zip(points).map(|(w, p)| p.coords * *w).sum::<Vector3<Real>>())
}

/// Weighted sum of node normals, renormalized. Zero when they cancel.
pub fn interpolate_normal(weights: &[Real], normals: &[Vector3<Real>]) -> Vector3<Real> {
    weights
        .iter()
        .zip(normals)
        .map(|(w, n)| n * *w)
        .sum::<Vector3<Real>>()
        .try_normalize(Real::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Point at `t ∈ [0, 1]` along an edge given as in [`FaceShape::edges`].
///
/// The interior nodes sit at equal steps between the ends, so a three-node
/// edge has its middle node at `t = 1/2` and a four-node edge has nodes at
/// `1/3` and `2/3`.
pub fn edge_point(points: &[Point3<Real>], t: Real) -> Point3<Real> {
    let order = points.len().saturating_sub(1).max(1) as Real;
    let at = |k: usize| match k {
        0 => 0.0,
        1 => 1.0,
        k => (k - 1) as Real / order,
    };
    let weights: Vec<Real> = (0..points.len())
        .map(|k| {
            (0..points.len())
                .filter(|&m| m != k)
                .map(|m| (t - at(m)) / (at(k) - at(m)))
                .product()
        })
        .collect();
    interpolate_point(&weights, points)
}
