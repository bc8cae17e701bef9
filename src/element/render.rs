//! Neighbor-aware boundary face rendering of finite elements.

use super::shape::{interpolate_normal, interpolate_point};
use super::{ElementKind, FaceShape, FeElement, FeMesh, flat_normal};
use crate::float_types::Real;
use crate::triangulated::Triangulated3D;
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector3};

const QUAD4_TRIS: &[[usize; 3]] = &[[0, 1, 2], [2, 3, 0]];

/// Corner triangles around the edge nodes, then a fan about the center (8).
const QUAD8_TRIS: &[[usize; 3]] = &[
    [0, 4, 7],
    [4, 1, 5],
    [5, 2, 6],
    [6, 3, 7],
    [8, 7, 4],
    [8, 4, 5],
    [8, 5, 6],
    [8, 6, 7],
];

const TRI3_TRIS: &[[usize; 3]] = &[[0, 1, 2]];
const TRI6_TRIS: &[[usize; 3]] = &[[0, 3, 5], [3, 1, 4], [4, 2, 5], [3, 4, 5]];
const TRI7_TRIS: &[[usize; 3]] = &[[0, 3, 6], [3, 1, 6], [1, 4, 6], [4, 2, 6], [2, 5, 6], [5, 0, 6]];

/// Fan about the center node over the boundary 0 3 4 1 5 6 2 7 8.
const TRI10_TRIS: &[[usize; 3]] = &[
    [9, 0, 3],
    [9, 3, 4],
    [9, 4, 1],
    [9, 1, 5],
    [9, 5, 6],
    [9, 6, 2],
    [9, 2, 7],
    [9, 7, 8],
    [9, 8, 0],
];

const fn refinement(shape: FaceShape) -> &'static [[usize; 3]] {
    match shape {
        FaceShape::Quad4 => QUAD4_TRIS,
        FaceShape::Quad8 | FaceShape::Quad9 => QUAD8_TRIS,
        FaceShape::Tri3 => TRI3_TRIS,
        FaceShape::Tri6 => TRI6_TRIS,
        FaceShape::Tri7 => TRI7_TRIS,
        FaceShape::Tri10 => TRI10_TRIS,
    }
}

/// Which element face a facet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacetOwner {
    pub element: usize,
    pub face: usize,
}

/// Triangles emitted by the element renderer.
///
/// Every face gets its own vertices so flat-shaded faces keep sharp edges.
/// `owners[i]` names the element face of `triangles[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetBuffer {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[usize; 3]>,
    pub owners: Vec<FacetOwner>,
}

impl FacetBuffer {
    pub fn new() -> Self {
        FacetBuffer::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.owners.clear();
    }

    /// Distinct element faces present in the buffer, in emission order.
    pub fn faces(&self) -> Vec<FacetOwner> {
        let mut seen = Vec::new();
        for owner in &self.owners {
            if !seen.contains(owner) {
                seen.push(*owner);
            }
        }
        seen
    }

    pub fn triangles_of(&self, owner: FacetOwner) -> impl Iterator<Item = &[usize; 3]> + '_ {
        self.triangles.iter().zip(&self.owners).filter(move |(_, o)| **o == owner).map(|(t, _)| t)
    }

    /// Append one face of `shape` given its node positions and normals in
    /// face-table order. Quadratic quads without a center node get one
    /// evaluated from the serendipity shape functions.
    pub(crate) fn push_face(
        &mut self,
        shape: FaceShape,
        positions: &[Point3<Real>],
        normals: &[Vector3<Real>],
        owner: FacetOwner,
    ) {
        let base = self.vertices.len();
        self.vertices
            .extend(positions.iter().zip(normals).map(|(p, n)| Vertex::new(*p, *n)));

        if shape == FaceShape::Quad8 {
            let corners = positions[..4].iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
            let mids = positions[4..8].iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
            let center = Point3::from(corners * -0.25 + mids * 0.5);
            let normal = normals[..4]
                .iter()
                .sum::<Vector3<Real>>()
                .try_normalize(Real::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            self.vertices.push(Vertex::new(center, normal));
        }

        for tri in refinement(shape) {
            self.triangles.push([base + tri[0], base + tri[1], base + tri[2]]);
            self.owners.push(owner);
        }
    }
}

impl FacetBuffer {
    /// Append one face sampled on a regular grid of its shape functions.
    ///
    /// Quads get `(n+1)²` samples and `2n²` triangles, triangles get
    /// `(n+1)(n+2)/2` samples and `n²` triangles. Positions and normals are
    /// both interpolated, normals renormalized.
    pub(crate) fn push_subdivided(
        &mut self,
        shape: FaceShape,
        positions: &[Point3<Real>],
        normals: &[Vector3<Real>],
        divisions: usize,
        owner: FacetOwner,
    ) {
        let n = divisions.max(1);
        let base = self.vertices.len();
        let step = 1.0 / n as Real;
        let mut sample = |r: Real, s: Real| {
            let w = shape.weights(r, s);
            self.vertices.push(Vertex::new(interpolate_point(&w, positions), interpolate_normal(&w, normals)));
        };

        if shape.is_quad() {
            for j in 0..=n {
                for i in 0..=n {
                    sample(-1.0 + 2.0 * i as Real * step, -1.0 + 2.0 * j as Real * step);
                }
            }
            let idx = |i: usize, j: usize| base + j * (n + 1) + i;
            for j in 0..n {
                for i in 0..n {
                    let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
                    self.triangles.extend([[a, b, c], [c, d, a]]);
                    self.owners.extend([owner; 2]);
                }
            }
        } else {
            for j in 0..=n {
                for i in 0..=n - j {
                    sample(i as Real * step, j as Real * step);
                }
            }
            // row j starts after the (n+1) + n + ... points of the rows below
            let idx = |i: usize, j: usize| base + j * (2 * n + 3 - j) / 2 + i;
            for j in 0..n {
                for i in 0..n - j {
                    self.triangles.push([idx(i, j), idx(i + 1, j), idx(i, j + 1)]);
                    self.owners.push(owner);
                    if i + 1 < n - j {
                        self.triangles.push([idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
                        self.owners.push(owner);
                    }
                }
            }
        }
    }
}

impl Triangulated3D for FacetBuffer {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for tri in &self.triangles {
            f([self.vertices[tri[0]], self.vertices[tri[1]], self.vertices[tri[2]]]);
        }
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Renders element boundary faces.
///
/// A solid element face is drawn when there is no element across it, when
/// that element is hidden, or when it is selected and
/// `hide_selected_neighbors` is on (selected elements are drawn in their own
/// pass, so the face behind them must show). Shell elements always draw
/// their single face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementRenderer {
    pub hide_selected_neighbors: bool,
}

impl ElementRenderer {
    pub const fn new(hide_selected_neighbors: bool) -> Self {
        ElementRenderer { hide_selected_neighbors }
    }

    /// Append the exposed faces of `element` to `out`.
    pub fn render_element(&self, mesh: &FeMesh, element: usize, out: &mut FacetBuffer) {
        let Some(el) = mesh.elements.get(element) else {
            tracing::warn!(element, elements = mesh.elements.len(), "render of missing element skipped");
            return;
        };

        for (f, def) in el.kind.faces().iter().enumerate() {
            let neighbor = resolve_neighbor(mesh, element, el, f);
            if !el.kind.is_shell() && !self.exposes(mesh, neighbor) {
                continue;
            }
            let Some(positions) = el.face_nodes(f).and_then(|nodes| mesh.positions(&nodes)) else {
                tracing::warn!(element, face = f, "element face refers to missing nodes, skipped");
                continue;
            };
            let normals = face_normals(mesh, el, f, neighbor, &positions);
            out.push_face(def.shape, &positions, &normals, FacetOwner { element, face: f });
        }
    }

    /// All visible elements.
    pub fn render_mesh(&self, mesh: &FeMesh) -> FacetBuffer {
        self.render_where(mesh, FeElement::is_visible)
    }

    /// Visible, selected elements.
    pub fn render_selected(&self, mesh: &FeMesh) -> FacetBuffer {
        self.render_where(mesh, |el| el.is_visible() && el.is_selected())
    }

    /// Visible elements outside the selection.
    pub fn render_unselected(&self, mesh: &FeMesh) -> FacetBuffer {
        self.render_where(mesh, |el| el.is_visible() && !el.is_selected())
    }

    fn render_where(&self, mesh: &FeMesh, keep: impl Fn(&FeElement) -> bool) -> FacetBuffer {
        let mut out = FacetBuffer::new();
        for (i, el) in mesh.elements.iter().enumerate() {
            if keep(el) {
                self.render_element(mesh, i, &mut out);
            }
        }
        tracing::debug!(triangles = out.triangles.len(), "element faces rendered");
        out
    }

    fn exposes(&self, mesh: &FeMesh, neighbor: Option<usize>) -> bool {
        match neighbor.and_then(|n| mesh.elements.get(n)) {
            None => true,
            Some(pen) => !pen.is_visible() || (pen.is_selected() && self.hide_selected_neighbors),
        }
    }
}

/// Neighbor across local face `face`, treating dangling indices as none.
fn resolve_neighbor(mesh: &FeMesh, element: usize, el: &FeElement, face: usize) -> Option<usize> {
    let neighbor = el.neighbors.get(face).copied().flatten()?;
    if neighbor < mesh.elements.len() {
        Some(neighbor)
    } else {
        tracing::warn!(element, face, neighbor, "missing adjacency, face treated as exterior");
        None
    }
}

/// Per-node normals for one element face.
///
/// Exterior faces with a face record take the record's smooth normals,
/// matched by node. Everything else is flat shaded.
fn face_normals(
    mesh: &FeMesh,
    el: &FeElement,
    face: usize,
    neighbor: Option<usize>,
    positions: &[Point3<Real>],
) -> Vec<Vector3<Real>> {
    let flat = flat_normal(positions);
    let record = el
        .faces
        .get(face)
        .copied()
        .flatten()
        .and_then(|r| mesh.faces.get(r))
        .filter(|_| neighbor.is_none() || el.kind.is_shell());

    let (Some(record), Some(nodes)) = (record, el.face_nodes(face)) else {
        return vec![flat; positions.len()];
    };
    nodes
        .iter()
        .map(|node| {
            record
                .nodes
                .iter()
                .position(|n| n == node)
                .and_then(|k| record.normals.get(k))
                .copied()
                .unwrap_or(flat)
        })
        .collect()
}

impl ElementKind {
    /// Triangles rendered when every face of the element is exposed.
    pub fn facet_count(self) -> usize {
        self.faces().iter().map(|f| refinement(f.shape).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinement_tables_stay_in_range() {
        for shape in [
            FaceShape::Tri3,
            FaceShape::Tri6,
            FaceShape::Tri7,
            FaceShape::Tri10,
            FaceShape::Quad4,
            FaceShape::Quad8,
            FaceShape::Quad9,
        ] {
            // quad8 gains an evaluated center node
            let n = shape.node_count().max(if shape == FaceShape::Quad8 { 9 } else { 0 });
            assert!(refinement(shape).iter().flatten().all(|&i| i < n), "{:?}", shape);
        }
    }

    #[test]
    fn quad8_center_is_the_serendipity_midpoint() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let normals = [Vector3::z(); 8];
        let mut out = FacetBuffer::new();
        out.push_face(FaceShape::Quad8, &positions, &normals, FacetOwner { element: 0, face: 0 });

        assert_eq!(out.vertices.len(), 9);
        assert_eq!(out.triangles.len(), 8);
        assert!((out.vertices[8].pos - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
        assert!((out.vertices[8].normal - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn subdivided_grids_count_their_triangles() {
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let owner = FacetOwner { element: 0, face: 0 };
        let mut out = FacetBuffer::new();
        out.push_subdivided(FaceShape::Quad4, &quad, &[Vector3::z(); 4], 3, owner);
        assert_eq!(out.vertices.len(), 16);
        assert_eq!(out.triangles.len(), 18);

        let mut out = FacetBuffer::new();
        out.push_subdivided(FaceShape::Tri3, &quad[..3], &[Vector3::z(); 3], 4, owner);
        assert_eq!(out.vertices.len(), 15);
        assert_eq!(out.triangles.len(), 16);
        assert!(out.triangles.iter().flatten().all(|&i| i < 15));
        for t in &out.triangles {
            let [a, b, c] = t.map(|i| out.vertices[i].pos);
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }

    #[test]
    fn facet_counts_per_kind() {
        assert_eq!(ElementKind::Hex8.facet_count(), 12);
        assert_eq!(ElementKind::Hex20.facet_count(), 48);
        assert_eq!(ElementKind::Tet4.facet_count(), 4);
        assert_eq!(ElementKind::Tet10.facet_count(), 16);
        assert_eq!(ElementKind::Penta6.facet_count(), 8);
        assert_eq!(ElementKind::Pyra5.facet_count(), 6);
        assert_eq!(ElementKind::Tri10.facet_count(), 9);
    }
}
