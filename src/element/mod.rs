//! Finite-element meshes and their boundary-face renderer.
//!
//! An [`FeMesh`] is a discretized body: nodes, elements of the usual solid
//! and shell families, an element adjacency table and the exterior face
//! records shared with the surface mesh. The renderer in [`render`] walks
//! element faces and emits the ones that are actually on the visible
//! boundary.

use crate::errors::ElementError;
use crate::float_types::{EPSILON, Real};
use crate::topology::{ItemState, Topology};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

pub mod face;
pub mod render;
pub mod shape;
pub mod tables;

pub use face::{Shading, face_outline, render_face};
pub use render::{ElementRenderer, FacetBuffer, FacetOwner};
pub use tables::FaceDef;

/// Supported element topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Hex8,
    Hex20,
    Hex27,
    Penta6,
    Penta15,
    Tet4,
    Tet5,
    Tet10,
    Tet15,
    Tet20,
    Pyra5,
    Quad4,
    Quad8,
    Quad9,
    Tri3,
    Tri6,
    Tri7,
    Tri10,
}

impl ElementKind {
    pub const fn node_count(self) -> usize {
        match self {
            ElementKind::Hex8 => 8,
            ElementKind::Hex20 => 20,
            ElementKind::Hex27 => 27,
            ElementKind::Penta6 => 6,
            ElementKind::Penta15 => 15,
            ElementKind::Tet4 => 4,
            ElementKind::Tet5 => 5,
            ElementKind::Tet10 => 10,
            ElementKind::Tet15 => 15,
            ElementKind::Tet20 => 20,
            ElementKind::Pyra5 => 5,
            ElementKind::Quad4 => 4,
            ElementKind::Quad8 => 8,
            ElementKind::Quad9 => 9,
            ElementKind::Tri3 => 3,
            ElementKind::Tri6 => 6,
            ElementKind::Tri7 => 7,
            ElementKind::Tri10 => 10,
        }
    }

    /// Shell elements are their own single face.
    pub const fn is_shell(self) -> bool {
        matches!(
            self,
            ElementKind::Quad4
                | ElementKind::Quad8
                | ElementKind::Quad9
                | ElementKind::Tri3
                | ElementKind::Tri6
                | ElementKind::Tri7
                | ElementKind::Tri10
        )
    }

    pub const fn face_count(self) -> usize {
        self.faces().len()
    }
}

/// Node layout of one element face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceShape {
    Tri3,
    Tri6,
    Tri7,
    Tri10,
    Quad4,
    Quad8,
    Quad9,
}

impl FaceShape {
    pub const fn node_count(self) -> usize {
        match self {
            FaceShape::Tri3 => 3,
            FaceShape::Tri6 => 6,
            FaceShape::Tri7 => 7,
            FaceShape::Tri10 => 10,
            FaceShape::Quad4 => 4,
            FaceShape::Quad8 => 8,
            FaceShape::Quad9 => 9,
        }
    }

    pub const fn corner_count(self) -> usize {
        match self {
            FaceShape::Tri3 | FaceShape::Tri6 | FaceShape::Tri7 | FaceShape::Tri10 => 3,
            FaceShape::Quad4 | FaceShape::Quad8 | FaceShape::Quad9 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeNode {
    pub position: Point3<Real>,
}

/// One element: its kind, global node indices and per-local-face links.
#[derive(Debug, Clone, PartialEq)]
pub struct FeElement {
    pub kind: ElementKind,
    pub nodes: Vec<usize>,
    /// Element across each local face, `None` on the exterior.
    pub neighbors: Vec<Option<usize>>,
    /// Exterior face record for each local face, if one was built.
    pub faces: Vec<Option<usize>>,
    pub part: usize,
    pub state: ItemState,
}

impl FeElement {
    pub fn new(kind: ElementKind, nodes: Vec<usize>, part: usize) -> Self {
        let n = kind.face_count();
        FeElement {
            kind,
            nodes,
            neighbors: vec![None; n],
            faces: vec![None; n],
            part,
            state: ItemState::default(),
        }
    }

    pub const fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub const fn is_selected(&self) -> bool {
        self.state.selected
    }

    /// Global node indices of local face `face`, in table order.
    pub fn face_nodes(&self, face: usize) -> Option<Vec<usize>> {
        let def = self.kind.faces().get(face)?;
        def.nodes.iter().map(|&local| self.nodes.get(local).copied()).collect()
    }
}

/// Exterior face record with per-node normals for smooth shading.
#[derive(Debug, Clone, PartialEq)]
pub struct FeFace {
    pub shape: FaceShape,
    pub nodes: Vec<usize>,
    pub normals: Vec<Vector3<Real>>,
    /// Owning element and its local face index.
    pub element: (usize, usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeMesh {
    pub nodes: Vec<FeNode>,
    pub elements: Vec<FeElement>,
    pub faces: Vec<FeFace>,
}

/// Flat normal of the first three points, zero when they are collinear.
pub fn flat_normal(r: &[Point3<Real>]) -> Vector3<Real> {
    if r.len() < 3 {
        return Vector3::zeros();
    }
    let n = (r[1] - r[0]).cross(&(r[2] - r[0]));
    if n.norm_squared() <= EPSILON {
        Vector3::zeros()
    } else {
        n.normalize()
    }
}

impl FeMesh {
    pub fn new() -> Self {
        FeMesh::default()
    }

    pub fn add_node(&mut self, position: Point3<Real>) -> usize {
        self.nodes.push(FeNode { position });
        self.nodes.len() - 1
    }

    pub fn add_element(&mut self, kind: ElementKind, nodes: Vec<usize>, part: usize) -> usize {
        self.elements.push(FeElement::new(kind, nodes, part));
        self.elements.len() - 1
    }

    pub fn position(&self, node: usize) -> Option<Point3<Real>> {
        self.nodes.get(node).map(|n| n.position)
    }

    /// Positions of `nodes`, or `None` if any index is out of range.
    pub fn positions(&self, nodes: &[usize]) -> Option<Vec<Point3<Real>>> {
        nodes.iter().map(|&n| self.position(n)).collect()
    }

    pub fn set_visible(&mut self, element: usize, visible: bool) {
        if let Some(el) = self.elements.get_mut(element) {
            el.state.visible = visible;
            if !visible {
                el.state.selected = false;
            }
        }
    }

    /// Show or hide every element after the part it belongs to. `part` is
    /// the part's slot in [`Topology::parts`]; elements naming no known part
    /// keep their flags.
    pub fn update_element_visibility(&mut self, topology: &Topology) {
        let parts = topology.parts();
        let mut hidden = 0;
        for el in &mut self.elements {
            let Some(part) = parts.get(el.part) else { continue };
            el.state.visible = part.state.visible;
            if !part.state.visible {
                el.state.selected = false;
                hidden += 1;
            }
        }
        tracing::debug!(elements = self.elements.len(), hidden, "element visibility follows parts");
    }

    pub fn set_selected(&mut self, element: usize, selected: bool) {
        if let Some(el) = self.elements.get_mut(element) {
            el.state.selected = selected;
        }
    }

    pub fn clear_selection(&mut self) {
        for el in &mut self.elements {
            el.state.selected = false;
        }
    }

    /// Structural problems: node counts, node references, dangling neighbor
    /// and face record indices. An empty result means the renderer will not
    /// have to skip or reinterpret anything.
    pub fn validate(&self) -> Vec<ElementError> {
        let mut errors = Vec::new();
        for (i, el) in self.elements.iter().enumerate() {
            let expected = el.kind.node_count();
            if el.nodes.len() != expected {
                errors.push(ElementError::NodeCount { element: i, expected, found: el.nodes.len() });
            }
            for &node in &el.nodes {
                if node >= self.nodes.len() {
                    errors.push(ElementError::NodeOutOfRange { element: i, node });
                }
            }
            for (face, neighbor) in el.neighbors.iter().enumerate() {
                if let Some(neighbor) = neighbor.filter(|&n| n >= self.elements.len()) {
                    errors.push(ElementError::MissingAdjacency { element: i, face, neighbor });
                }
            }
            for (face, record) in el.faces.iter().enumerate() {
                if let Some(record) = record.filter(|&r| r >= self.faces.len()) {
                    errors.push(ElementError::FaceRecordOutOfRange { element: i, face, record });
                }
            }
        }
        errors
    }

    /// Rebuild every element's neighbor table by matching faces on their
    /// sorted corner nodes. Shell elements never get neighbors.
    pub fn build_adjacency(&mut self) {
        let mut open: HashMap<Vec<usize>, (usize, usize)> = HashMap::new();
        let mut links = Vec::new();

        for (i, el) in self.elements.iter().enumerate() {
            if el.kind.is_shell() {
                continue;
            }
            for (f, def) in el.kind.faces().iter().enumerate() {
                let corners = &def.nodes[..def.shape.corner_count()];
                let Some(mut key) = corners.iter().map(|&l| el.nodes.get(l).copied()).collect::<Option<Vec<_>>>()
                else {
                    continue;
                };
                key.sort_unstable();
                match open.remove(&key) {
                    Some(other) => links.push(((i, f), other)),
                    None => {
                        open.insert(key, (i, f));
                    },
                }
            }
        }

        for el in &mut self.elements {
            el.neighbors.iter_mut().for_each(|n| *n = None);
        }
        for ((a, fa), (b, fb)) in links {
            self.elements[a].neighbors[fa] = Some(b);
            self.elements[b].neighbors[fb] = Some(a);
        }
        tracing::debug!(elements = self.elements.len(), exterior = open.len(), "element adjacency rebuilt");
    }

    /// Rebuild the exterior face records from the adjacency table, then
    /// their smooth normals.
    pub fn build_faces(&mut self) {
        self.faces.clear();
        for i in 0..self.elements.len() {
            let el = &self.elements[i];
            let mut records = vec![None; el.kind.face_count()];
            for (f, def) in el.kind.faces().iter().enumerate() {
                if !el.kind.is_shell() && el.neighbors.get(f).copied().flatten().is_some() {
                    continue;
                }
                let Some(nodes) = el.face_nodes(f) else { continue };
                records[f] = Some(self.faces.len());
                self.faces.push(FeFace {
                    shape: def.shape,
                    normals: vec![Vector3::zeros(); nodes.len()],
                    nodes,
                    element: (i, f),
                });
            }
            self.elements[i].faces = records;
        }
        self.update_face_normals();
    }

    /// Per-node normals on every face record: the normalized sum of the
    /// flat normals of all records touching the node.
    pub fn update_face_normals(&mut self) {
        let mut sums: HashMap<usize, Vector3<Real>> = HashMap::new();
        let flats: Vec<Vector3<Real>> = self
            .faces
            .iter()
            .map(|f| {
                let corners = &f.nodes[..f.shape.corner_count().min(f.nodes.len())];
                self.positions(corners).map_or_else(Vector3::zeros, |r| flat_normal(&r))
            })
            .collect();

        for (face, n) in self.faces.iter().zip(&flats) {
            for &node in &face.nodes {
                *sums.entry(node).or_insert_with(Vector3::zeros) += n;
            }
        }
        for face in &mut self.faces {
            face.normals = face
                .nodes
                .iter()
                .map(|node| {
                    sums.get(node)
                        .and_then(|s| s.try_normalize(Real::EPSILON))
                        .unwrap_or_else(Vector3::zeros)
                })
                .collect();
        }
    }
}
