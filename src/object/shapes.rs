//! Primitive objects built directly as boundary topologies.
//!
//! Every face loop is wound counter-clockwise seen from outside, so the
//! tessellated triangles face outward.

use super::GObject;
use crate::errors::TopologyError;
use crate::float_types::{FRAC_PI_2, Real};
use crate::topology::{EdgeShape, EdgeUse, FaceKind, IdAllocator, NodeId, Topology};
use nalgebra::Point3;

/// Axis-aligned box with one corner at the origin, six bilinear quad faces.
pub fn box_object(
    ids: &mut IdAllocator,
    name: &str,
    width: Real,
    depth: Real,
    height: Real,
) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let part = Some(topo.add_part(ids, name));

    let corners = [
        [0.0, 0.0, 0.0],
        [width, 0.0, 0.0],
        [width, depth, 0.0],
        [0.0, depth, 0.0],
        [0.0, 0.0, height],
        [width, 0.0, height],
        [width, depth, height],
        [0.0, depth, height],
    ];
    let n: Vec<NodeId> = corners
        .iter()
        .map(|c| topo.add_node(ids, Point3::new(c[0], c[1], c[2])))
        .collect();

    // bottom ring, top ring, verticals
    let mut e = Vec::with_capacity(12);
    for k in 0..4 {
        e.push(topo.add_line(ids, n[k], n[(k + 1) % 4])?);
    }
    for k in 0..4 {
        e.push(topo.add_line(ids, n[4 + k], n[4 + (k + 1) % 4])?);
    }
    for k in 0..4 {
        e.push(topo.add_line(ids, n[k], n[4 + k])?);
    }

    use EdgeUse as U;
    let loops = [
        // sides: bottom edge, next vertical, top edge backwards, own vertical backwards
        [U::forward(e[0]), U::forward(e[9]), U::reverse(e[4]), U::reverse(e[8])],
        [U::forward(e[1]), U::forward(e[10]), U::reverse(e[5]), U::reverse(e[9])],
        [U::forward(e[2]), U::forward(e[11]), U::reverse(e[6]), U::reverse(e[10])],
        [U::forward(e[3]), U::forward(e[8]), U::reverse(e[7]), U::reverse(e[11])],
        // bottom, seen from below
        [U::reverse(e[2]), U::reverse(e[1]), U::reverse(e[0]), U::reverse(e[3])],
        // top
        [U::forward(e[4]), U::forward(e[5]), U::forward(e[6]), U::forward(e[7])],
    ];
    for edges in loops {
        topo.add_face(ids, FaceKind::Quad, edges.to_vec(), [part, None])?;
    }

    Ok(GObject::new(name, topo))
}

/// Points at `radius` on the four quadrant directions of the XY plane, at height `z`.
fn quadrant_ring(radius: Real, z: Real) -> [Point3<Real>; 4] {
    [
        Point3::new(radius, 0.0, z),
        Point3::new(0.0, radius, z),
        Point3::new(-radius, 0.0, z),
        Point3::new(0.0, -radius, z),
    ]
}

/// Cylinder along +Z: planar caps bounded by quarter arcs, four extruded sides.
pub fn cylinder_object(
    ids: &mut IdAllocator,
    name: &str,
    radius: Real,
    height: Real,
) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let part = Some(topo.add_part(ids, name));

    let bottom_center = topo.add_node(ids, Point3::origin());
    let top_center = topo.add_node(ids, Point3::new(0.0, 0.0, height));
    let bottom: Vec<NodeId> = quadrant_ring(radius, 0.0).iter().map(|p| topo.add_node(ids, *p)).collect();
    let top: Vec<NodeId> = quadrant_ring(radius, height).iter().map(|p| topo.add_node(ids, *p)).collect();

    let mut bottom_arcs = Vec::with_capacity(4);
    let mut top_arcs = Vec::with_capacity(4);
    let mut verticals = Vec::with_capacity(4);
    for k in 0..4 {
        let next = (k + 1) % 4;
        bottom_arcs.push(topo.add_edge(
            ids,
            [bottom[k], bottom[next]],
            EdgeShape::CircleArc { center: bottom_center, axis: None },
        )?);
        top_arcs.push(topo.add_edge(
            ids,
            [top[k], top[next]],
            EdgeShape::CircleArc { center: top_center, axis: None },
        )?);
        verticals.push(topo.add_line(ids, bottom[k], top[k])?);
    }

    for k in 0..4 {
        let next = (k + 1) % 4;
        let edges = vec![
            EdgeUse::forward(bottom_arcs[k]),
            EdgeUse::forward(verticals[next]),
            EdgeUse::reverse(top_arcs[k]),
            EdgeUse::reverse(verticals[k]),
        ];
        topo.add_face(ids, FaceKind::Extrude, edges, [part, None])?;
    }

    let bottom_cap = bottom_arcs.iter().rev().map(|&e| EdgeUse::reverse(e)).collect();
    topo.add_face(ids, FaceKind::Polygon, bottom_cap, [part, None])?;
    let top_cap = top_arcs.iter().map(|&e| EdgeUse::forward(e)).collect();
    topo.add_face(ids, FaceKind::Polygon, top_cap, [part, None])?;

    Ok(GObject::new(name, topo))
}

/// Point at `radius` turned `k` quarter turns from +X toward +Z, at height `y`.
/// Consecutive points are joined by Y arcs.
fn y_ring_point(radius: Real, y: Real, k: usize) -> Point3<Real> {
    let (s, c) = (k as Real * FRAC_PI_2).sin_cos();
    Point3::new(radius * c, y, radius * s)
}

/// Disc in the XZ plane facing +Y, built from four revolve-wedge fans.
pub fn revolved_disc_object(ids: &mut IdAllocator, name: &str, radius: Real) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let part = Some(topo.add_part(ids, name));

    let apex = topo.add_node(ids, Point3::origin());
    let rim: Vec<NodeId> = (0..4).map(|k| topo.add_node(ids, y_ring_point(radius, 0.0, k))).collect();

    let mut spokes = Vec::with_capacity(4);
    let mut arcs = Vec::with_capacity(4);
    for k in 0..4 {
        spokes.push(topo.add_line(ids, apex, rim[k])?);
        arcs.push(topo.add_edge(ids, [rim[k], rim[(k + 1) % 4]], EdgeShape::YArc)?);
    }
    // the rim arcs turn clockwise seen from +Y, so each wedge walks its arc backwards
    for k in 0..4 {
        let edges = vec![
            EdgeUse::forward(spokes[(k + 1) % 4]),
            EdgeUse::reverse(arcs[k]),
            EdgeUse::reverse(spokes[k]),
        ];
        topo.add_face(ids, FaceKind::RevolveWedge, edges, [part, None])?;
    }

    Ok(GObject::new(name, topo))
}

/// Open cylindrical band about +Y from `y = 0` to `y = height`, four revolve faces.
pub fn revolved_band_object(
    ids: &mut IdAllocator,
    name: &str,
    radius: Real,
    height: Real,
) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let part = Some(topo.add_part(ids, name));

    let bottom: Vec<NodeId> = (0..4).map(|k| topo.add_node(ids, y_ring_point(radius, 0.0, k))).collect();
    let top: Vec<NodeId> = (0..4).map(|k| topo.add_node(ids, y_ring_point(radius, height, k))).collect();

    let mut profiles = Vec::with_capacity(4);
    let mut bottom_arcs = Vec::with_capacity(4);
    let mut top_arcs = Vec::with_capacity(4);
    for k in 0..4 {
        let next = (k + 1) % 4;
        profiles.push(topo.add_line(ids, bottom[k], top[k])?);
        bottom_arcs.push(topo.add_edge(ids, [bottom[k], bottom[next]], EdgeShape::YArc)?);
        top_arcs.push(topo.add_edge(ids, [top[k], top[next]], EdgeShape::YArc)?);
    }

    for k in 0..4 {
        let next = (k + 1) % 4;
        // profile walked bottom -> top, then around the axis along the top
        let edges = vec![
            EdgeUse::forward(profiles[k]),
            EdgeUse::forward(top_arcs[k]),
            EdgeUse::reverse(profiles[next]),
            EdgeUse::reverse(bottom_arcs[k]),
        ];
        topo.add_face(ids, FaceKind::Revolve, edges, [part, None])?;
    }

    Ok(GObject::new(name, topo))
}

/// Flat plate bounded by straight edges through `points`, in order.
pub fn plate_object(ids: &mut IdAllocator, name: &str, points: &[Point3<Real>]) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let part = Some(topo.add_part(ids, name));

    let nodes: Vec<NodeId> = points.iter().map(|p| topo.add_node(ids, *p)).collect();
    let mut edges = Vec::with_capacity(nodes.len());
    for k in 0..nodes.len() {
        let edge = topo.add_line(ids, nodes[k], nodes[(k + 1) % nodes.len()])?;
        edges.push(EdgeUse::forward(edge));
    }
    topo.add_face(ids, FaceKind::Polygon, edges, [part, None])?;

    Ok(GObject::new(name, topo))
}

/// Open polyline through `points`, edges only. Renders as a wireframe.
pub fn curve_object(ids: &mut IdAllocator, name: &str, points: &[Point3<Real>]) -> Result<GObject, TopologyError> {
    let mut topo = Topology::new();
    let nodes: Vec<NodeId> = points.iter().map(|p| topo.add_node(ids, *p)).collect();
    for pair in nodes.windows(2) {
        topo.add_line(ids, pair[0], pair[1])?;
    }
    Ok(GObject::new(name, topo))
}
