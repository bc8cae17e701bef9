//! The boundary topology model: nodes, parametric edges, bounded faces and parts.
//!
//! Entities are stored in insertion order and looked up through an id → slot
//! index, so lookups stay correct after deletions leave the id space sparse.
//! The editing layer is the only writer; tessellation reads through `&Topology`.

use crate::curve::{ArcDirection, CircularArc, Curve, EdgeCurve, GeneralArc, LineSegment, Polyline, Winding};
use crate::errors::{TessellationError, TopologyError};
use crate::float_types::{EPSILON, Real, tolerance};
use crate::triangulate::newell_normal;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::hash::Hash;

pub mod ids;
mod validate;
mod visibility;

pub use ids::{EdgeId, FaceId, IdAllocator, NodeId, PartId};
pub use visibility::ItemRef;

/// Visibility and selection flags carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState {
    pub visible: bool,
    pub selected: bool,
}

impl Default for ItemState {
    fn default() -> Self {
        ItemState { visible: true, selected: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Point3<Real>,
    pub state: ItemState,
}

/// Discriminant of [`EdgeShape`], used for face type pairing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Line,
    CircleArc,
    GeneralArc,
    YArc,
    ZArc,
    Polyline,
}

/// Geometry of an edge beyond its two endpoint nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeShape {
    Line,
    /// Constant-radius arc about `center`, counter-clockwise about `axis`.
    /// Without an `axis` the arc lies in the plane of the first polygon face
    /// it bounds and turns the way that loop walks it. An arc bounding no
    /// polygon takes the shorter way round in the plane of its three nodes.
    CircleArc { center: NodeId, axis: Option<Vector3<Real>> },
    /// Arc about `center` whose radius blends from start to end. The plane
    /// is resolved like [`CircleArc`](EdgeShape::CircleArc).
    GeneralArc { center: NodeId, axis: Option<Vector3<Real>> },
    /// Arc about the global Y axis in the XZ plane, turning from +X toward
    /// +Z (counter-clockwise about -Y).
    YArc,
    /// Arc about the global Z axis, counter-clockwise about +Z.
    ZArc,
    /// Interior points of a mesh-derived edge, endpoints excluded.
    Polyline(Vec<Point3<Real>>),
}

impl EdgeShape {
    pub const fn kind(&self) -> EdgeKind {
        match self {
            EdgeShape::Line => EdgeKind::Line,
            EdgeShape::CircleArc { .. } => EdgeKind::CircleArc,
            EdgeShape::GeneralArc { .. } => EdgeKind::GeneralArc,
            EdgeShape::YArc => EdgeKind::YArc,
            EdgeShape::ZArc => EdgeKind::ZArc,
            EdgeShape::Polyline(_) => EdgeKind::Polyline,
        }
    }

    const fn center(&self) -> Option<NodeId> {
        match self {
            EdgeShape::CircleArc { center, .. } | EdgeShape::GeneralArc { center, .. } => Some(*center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub nodes: [NodeId; 2],
    pub shape: EdgeShape,
    pub state: ItemState,
}

impl Edge {
    pub const fn kind(&self) -> EdgeKind {
        self.shape.kind()
    }

    /// Whether `node` is an endpoint or the arc center of this edge.
    pub fn references(&self, node: NodeId) -> bool {
        self.nodes.contains(&node) || self.shape.center() == Some(node)
    }
}

/// Tessellation class of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// Arbitrary closed loop of lines and arcs, triangulated in its plane.
    Polygon,
    /// Edges 0 and 2 are matching curves, edges 1 and 3 the straight extrusion.
    Extrude,
    /// Edges 0 and 2 are profiles, edges 1 and 3 arcs about a coordinate axis.
    Revolve,
    /// Node 0 is the apex on the axis; edge 1 is the arc about the axis.
    RevolveWedge,
    /// Bilinear patch through the four loop corners.
    Quad,
}

/// One signed entry of a face loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeUse {
    pub edge: EdgeId,
    pub winding: Winding,
}

impl EdgeUse {
    pub const fn forward(edge: EdgeId) -> Self {
        EdgeUse { edge, winding: Winding::Forward }
    }

    pub const fn reverse(edge: EdgeId) -> Self {
        EdgeUse { edge, winding: Winding::Reverse }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    pub kind: FaceKind,
    pub edges: Vec<EdgeUse>,
    /// Adjoining parts; the second is `None` for a true boundary face.
    pub parts: [Option<PartId>; 2],
    /// `visible` is derived by [`Topology::update_visibility`].
    pub state: ItemState,
}

impl Face {
    pub fn uses_edge(&self, edge: EdgeId) -> bool {
        self.edges.iter().any(|e| e.edge == edge)
    }

    pub fn touches_part(&self, part: PartId) -> bool {
        self.parts.contains(&Some(part))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub material: Option<u32>,
    pub state: ItemState,
}

#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    parts: Vec<Part>,
    node_slots: HashMap<NodeId, usize>,
    edge_slots: HashMap<EdgeId, usize>,
    face_slots: HashMap<FaceId, usize>,
    part_slots: HashMap<PartId, usize>,
}

fn reindex<I: Copy + Eq + Hash, T>(items: &[T], id_of: impl Fn(&T) -> I) -> HashMap<I, usize> {
    items.iter().enumerate().map(|(slot, item)| (id_of(item), slot)).collect()
}

impl Topology {
    pub fn new() -> Self {
        Topology::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    // ---------------------------------------------------------------------
    // lookup
    // ---------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_slots.get(&id).map(|&slot| &mut self.nodes[slot])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_slots.get(&id).map(|&slot| &self.edges[slot])
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edge_slots.get(&id).map(|&slot| &mut self.edges[slot])
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.face_slots.get(&id).map(|&slot| &self.faces[slot])
    }

    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.face_slots.get(&id).map(|&slot| &mut self.faces[slot])
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.part_slots.get(&id).map(|&slot| &self.parts[slot])
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.part_slots.get(&id).map(|&slot| &mut self.parts[slot])
    }

    /// Slot of a node in [`nodes`](Self::nodes), for request-scoped side arrays.
    pub fn node_slot(&self, id: NodeId) -> Option<usize> {
        self.node_slots.get(&id).copied()
    }

    pub fn edge_slot(&self, id: EdgeId) -> Option<usize> {
        self.edge_slots.get(&id).copied()
    }

    pub fn position(&self, id: NodeId) -> Result<Point3<Real>, TopologyError> {
        self.node(id).map(|n| n.position).ok_or(TopologyError::UnknownNode(id))
    }

    // ---------------------------------------------------------------------
    // creation
    // ---------------------------------------------------------------------

    pub fn add_node(&mut self, ids: &mut IdAllocator, position: Point3<Real>) -> NodeId {
        let id = ids.node();
        self.node_slots.insert(id, self.nodes.len());
        self.nodes.push(Node { id, position, state: ItemState::default() });
        id
    }

    pub fn add_part(&mut self, ids: &mut IdAllocator, name: impl Into<String>) -> PartId {
        let id = ids.part();
        self.part_slots.insert(id, self.parts.len());
        self.parts.push(Part { id, name: name.into(), material: None, state: ItemState::default() });
        id
    }

    /// Add an edge between two existing nodes.
    pub fn add_edge(
        &mut self,
        ids: &mut IdAllocator,
        nodes: [NodeId; 2],
        shape: EdgeShape,
    ) -> Result<EdgeId, TopologyError> {
        for node in nodes.iter().copied().chain(shape.center()) {
            if self.node(node).is_none() {
                return Err(TopologyError::UnknownNode(node));
            }
        }
        let id = ids.edge();
        self.edge_slots.insert(id, self.edges.len());
        self.edges.push(Edge { id, nodes, shape, state: ItemState::default() });
        Ok(id)
    }

    /// Shorthand for a straight edge.
    pub fn add_line(
        &mut self,
        ids: &mut IdAllocator,
        a: NodeId,
        b: NodeId,
    ) -> Result<EdgeId, TopologyError> {
        self.add_edge(ids, [a, b], EdgeShape::Line)
    }

    /// Add a face over existing edges and parts.
    ///
    /// Only references are checked here; loop structure is checked by
    /// [`validate_face`](Self::validate_face) before tessellation.
    pub fn add_face(
        &mut self,
        ids: &mut IdAllocator,
        kind: FaceKind,
        edges: Vec<EdgeUse>,
        parts: [Option<PartId>; 2],
    ) -> Result<FaceId, TopologyError> {
        if let Some(missing) = edges.iter().find(|e| self.edge(e.edge).is_none()) {
            return Err(TopologyError::UnknownEdge(missing.edge));
        }
        if let Some(missing) = parts.iter().flatten().find(|&&p| self.part(p).is_none()) {
            return Err(TopologyError::UnknownPart(*missing));
        }
        let id = ids.face();
        self.face_slots.insert(id, self.faces.len());
        self.faces.push(Face { id, kind, edges, parts, state: ItemState::default() });
        Ok(id)
    }

    // ---------------------------------------------------------------------
    // removal
    // ---------------------------------------------------------------------

    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, TopologyError> {
        let slot = self.node_slot(id).ok_or(TopologyError::UnknownNode(id))?;
        if let Some(edge) = self.edges.iter().find(|e| e.references(id)) {
            return Err(TopologyError::InUse { entity: id.to_string(), referenced_by: edge.id.to_string() });
        }
        let node = self.nodes.remove(slot);
        self.node_slots = reindex(&self.nodes, |n| n.id);
        Ok(node)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, TopologyError> {
        let slot = self.edge_slot(id).ok_or(TopologyError::UnknownEdge(id))?;
        if let Some(face) = self.faces.iter().find(|f| f.uses_edge(id)) {
            return Err(TopologyError::InUse { entity: id.to_string(), referenced_by: face.id.to_string() });
        }
        let edge = self.edges.remove(slot);
        self.edge_slots = reindex(&self.edges, |e| e.id);
        Ok(edge)
    }

    pub fn remove_face(&mut self, id: FaceId) -> Result<Face, TopologyError> {
        let slot = self.face_slots.get(&id).copied().ok_or(TopologyError::UnknownFace(id))?;
        let face = self.faces.remove(slot);
        self.face_slots = reindex(&self.faces, |f| f.id);
        Ok(face)
    }

    pub fn remove_part(&mut self, id: PartId) -> Result<Part, TopologyError> {
        let slot = self.part_slots.get(&id).copied().ok_or(TopologyError::UnknownPart(id))?;
        if let Some(face) = self.faces.iter().find(|f| f.touches_part(id)) {
            return Err(TopologyError::InUse { entity: id.to_string(), referenced_by: face.id.to_string() });
        }
        let part = self.parts.remove(slot);
        self.part_slots = reindex(&self.parts, |p| p.id);
        Ok(part)
    }

    // ---------------------------------------------------------------------
    // editing
    // ---------------------------------------------------------------------

    pub fn set_node_position(&mut self, id: NodeId, position: Point3<Real>) -> Result<(), TopologyError> {
        let node = self.node_mut(id).ok_or(TopologyError::UnknownNode(id))?;
        node.position = position;
        Ok(())
    }

    /// Reverse the orientation of a face loop.
    ///
    /// Edge 0 stays in slot 0 (walked backwards) for four-edge loops and the apex
    /// stays node 0 for wedges, so the edge-type pattern of every face kind is kept.
    pub fn flip_face(&mut self, id: FaceId) -> Result<(), TopologyError> {
        let face = self.face_mut(id).ok_or(TopologyError::UnknownFace(id))?;
        face.edges.reverse();
        for edge_use in face.edges.iter_mut() {
            edge_use.winding = edge_use.winding.reversed();
        }
        if face.kind != FaceKind::RevolveWedge {
            face.edges.rotate_right(1);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // derived geometry
    // ---------------------------------------------------------------------

    /// Node an edge use starts from and ends at, honoring its winding.
    pub fn edge_use_nodes(&self, edge_use: &EdgeUse) -> Result<(NodeId, NodeId), TopologyError> {
        let edge = self.edge(edge_use.edge).ok_or(TopologyError::UnknownEdge(edge_use.edge))?;
        Ok(match edge_use.winding {
            Winding::Forward => (edge.nodes[0], edge.nodes[1]),
            Winding::Reverse => (edge.nodes[1], edge.nodes[0]),
        })
    }

    /// Corner nodes of a face loop: the initial node of each edge use.
    pub fn face_nodes(&self, id: FaceId) -> Result<Vec<NodeId>, TopologyError> {
        let face = self.face(id).ok_or(TopologyError::UnknownFace(id))?;
        face.edges
            .iter()
            .map(|edge_use| self.edge_use_nodes(edge_use).map(|(first, _)| first))
            .collect()
    }

    /// Unit normal of the plane through a face's corner nodes, oriented by
    /// the loop. `None` when the corners enclose no area.
    pub fn face_normal(&self, id: FaceId) -> Result<Option<Vector3<Real>>, TopologyError> {
        let corners = self
            .face_nodes(id)?
            .into_iter()
            .map(|node| self.position(node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(newell_normal(&corners).try_normalize(EPSILON))
    }

    /// Arc axis taken from the first polygon face bounding `edge`.
    fn loop_axis(&self, edge: EdgeId) -> Option<Vector3<Real>> {
        self.faces.iter().filter(|f| f.kind == FaceKind::Polygon).find_map(|face| {
            let edge_use = face.edges.iter().find(|e| e.edge == edge)?;
            let normal = self.face_normal(face.id).ok().flatten()?;
            Some(normal * edge_use.winding.sign() as Real)
        })
    }

    /// Build the evaluator of an edge from the current node positions.
    pub fn edge_curve(&self, id: EdgeId) -> Result<EdgeCurve, TessellationError> {
        let edge = self.edge(id).ok_or(TopologyError::UnknownEdge(id))?;
        let start = self.position(edge.nodes[0])?;
        let end = self.position(edge.nodes[1])?;

        let curve = match &edge.shape {
            EdgeShape::Line => EdgeCurve::Line(LineSegment::new(start, end)),
            EdgeShape::CircleArc { center, axis } => {
                let center = self.position(*center)?;
                EdgeCurve::Circle(match (*axis).or_else(|| self.loop_axis(id)) {
                    Some(axis) => CircularArc::from_center(center, start, end, &axis, ArcDirection::CounterClockwise)?,
                    None => CircularArc::from_center_minor(center, start, end)?,
                })
            },
            EdgeShape::GeneralArc { center, axis } => {
                let center = self.position(*center)?;
                let axis = (*axis)
                    .or_else(|| self.loop_axis(id))
                    .unwrap_or_else(|| (start - center).cross(&(end - center)));
                EdgeCurve::Arc(GeneralArc::from_center(center, start, end, &axis, ArcDirection::CounterClockwise)?)
            },
            EdgeShape::YArc => {
                let center = Point3::new(0.0, start.y, 0.0);
                EdgeCurve::Circle(CircularArc::from_center(center, start, end, &-Vector3::y(), ArcDirection::CounterClockwise)?)
            },
            EdgeShape::ZArc => {
                let center = Point3::new(0.0, 0.0, start.z);
                EdgeCurve::Circle(CircularArc::from_center(center, start, end, &Vector3::z(), ArcDirection::CounterClockwise)?)
            },
            EdgeShape::Polyline(interior) => {
                let mut points = Vec::with_capacity(interior.len() + 2);
                points.push(start);
                points.extend(interior.iter().copied());
                points.push(end);
                match Polyline::new(points) {
                    Some(polyline) => EdgeCurve::Polyline(polyline),
                    None => EdgeCurve::Line(LineSegment::new(start, end)),
                }
            },
        };

        if curve.is_straight() && (end - start).norm() <= tolerance() {
            return Err(TessellationError::degenerate(format!("edge {} has zero length", id), Some(start)));
        }
        Ok(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(ids: &mut IdAllocator) -> (Topology, [NodeId; 3], [EdgeId; 3], FaceId) {
        let mut topo = Topology::new();
        let part = topo.add_part(ids, "body");
        let n = [
            topo.add_node(ids, Point3::new(0.0, 0.0, 0.0)),
            topo.add_node(ids, Point3::new(1.0, 0.0, 0.0)),
            topo.add_node(ids, Point3::new(0.0, 1.0, 0.0)),
        ];
        let e = [
            topo.add_line(ids, n[0], n[1]).expect("nodes exist"),
            topo.add_line(ids, n[1], n[2]).expect("nodes exist"),
            topo.add_line(ids, n[2], n[0]).expect("nodes exist"),
        ];
        let f = topo
            .add_face(ids, FaceKind::Polygon, e.iter().map(|&e| EdgeUse::forward(e)).collect(), [Some(part), None])
            .expect("edges exist");
        (topo, n, e, f)
    }

    #[test]
    fn removal_is_refused_while_referenced() {
        let mut ids = IdAllocator::new();
        let (mut topo, n, e, f) = triangle(&mut ids);
        assert!(matches!(topo.remove_edge(e[0]), Err(TopologyError::InUse { .. })));
        assert!(matches!(topo.remove_node(n[0]), Err(TopologyError::InUse { .. })));

        topo.remove_face(f).expect("face exists");
        topo.remove_edge(e[0]).expect("edge is free now");
        topo.remove_edge(e[2]).expect("edge is free now");
        let removed = topo.remove_node(n[0]).expect("node is free now");
        assert_eq!(removed.id, n[0]);

        // lookups stay correct with a sparse id space
        assert!(topo.node(n[0]).is_none());
        assert_eq!(topo.node(n[2]).map(|node| node.position), Some(Point3::new(0.0, 1.0, 0.0)));
        assert_eq!(topo.edge(e[1]).map(|edge| edge.nodes), Some([n[1], n[2]]));
    }

    #[test]
    fn flip_keeps_edge_zero_first() {
        let mut ids = IdAllocator::new();
        let (mut topo, n, e, f) = triangle(&mut ids);
        topo.flip_face(f).expect("face exists");
        let face = topo.face(f).expect("face exists");
        assert_eq!(face.edges[0], EdgeUse::reverse(e[0]));
        assert_eq!(face.edges[1], EdgeUse::reverse(e[2]));
        assert_eq!(topo.face_nodes(f).expect("valid loop"), vec![n[1], n[0], n[2]]);
    }

    #[test]
    fn y_arc_turns_from_x_toward_z() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let a = topo.add_node(&mut ids, Point3::new(1.0, 0.5, 0.0));
        let b = topo.add_node(&mut ids, Point3::new(0.0, 0.5, 1.0));
        let e = topo.add_edge(&mut ids, [a, b], EdgeShape::YArc).expect("nodes exist");

        let EdgeCurve::Circle(arc) = topo.edge_curve(e).expect("valid arc") else {
            panic!("y arcs are circular");
        };
        assert!((arc.sweep() - crate::float_types::FRAC_PI_2).abs() < 1e-12);
        let half = (0.5 as Real).sqrt();
        assert!((arc.point(0.5) - Point3::new(half, 0.5, half)).norm() < 1e-12);
    }

    #[test]
    fn zero_length_line_is_degenerate() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let a = topo.add_node(&mut ids, Point3::new(1.0, 2.0, 3.0));
        let b = topo.add_node(&mut ids, Point3::new(1.0, 2.0, 3.0));
        let e = topo.add_line(&mut ids, a, b).expect("nodes exist");
        assert!(matches!(topo.edge_curve(e), Err(TessellationError::DegenerateGeometry { .. })));
    }

    #[test]
    fn axisless_arc_takes_the_plane_of_its_polygon() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let part = topo.add_part(&mut ids, "d");
        let center = topo.add_node(&mut ids, Point3::origin());
        let n = [
            topo.add_node(&mut ids, Point3::new(1.0, 0.0, 0.0)),
            topo.add_node(&mut ids, Point3::new(-1.0, 0.0, 0.0)),
            topo.add_node(&mut ids, Point3::new(-1.0, -1.0, 0.0)),
            topo.add_node(&mut ids, Point3::new(1.0, -1.0, 0.0)),
        ];
        let arc = topo
            .add_edge(&mut ids, [n[0], n[1]], EdgeShape::CircleArc { center, axis: None })
            .expect("nodes exist");
        // a half circle has no plane of its own
        assert!(topo.edge_curve(arc).is_err());

        let mut edges = vec![EdgeUse::forward(arc)];
        for k in 1..4 {
            edges.push(EdgeUse::forward(topo.add_line(&mut ids, n[k], n[(k + 1) % 4]).expect("nodes exist")));
        }
        let face = topo.add_face(&mut ids, FaceKind::Polygon, edges, [Some(part), None]).expect("edges exist");
        let normal = topo.face_normal(face).expect("face exists").expect("corners span a plane");
        assert!((normal - Vector3::z()).norm() < 1e-12);

        let curve = topo.edge_curve(arc).expect("plane from the face");
        assert!((curve.point(0.5) - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn adding_edge_to_missing_node_fails() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let a = topo.add_node(&mut ids, Point3::origin());
        assert_eq!(topo.add_line(&mut ids, a, NodeId(99)), Err(TopologyError::UnknownNode(NodeId(99))));
    }
}
