//! Test support library
//! Fixture builders and geometric checks shared by the integration tests.
#![allow(dead_code)]

use femtess::element::{ElementKind, FeMesh};
use femtess::float_types::Real;
use femtess::topology::{EdgeUse, FaceId, FaceKind, IdAllocator, PartId, Topology};
use femtess::{RenderMesh, Triangulated3D};
use nalgebra::{Point3, Vector3};

/// Unit square in the XY plane as one bilinear quad face, wound toward +Z.
pub fn unit_quad_face(ids: &mut IdAllocator) -> (Topology, FaceId, PartId) {
    let mut topo = Topology::new();
    let part = topo.add_part(ids, "quad");
    let corners = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let nodes: Vec<_> = corners.iter().map(|p| topo.add_node(ids, *p)).collect();
    let edges: Vec<_> = (0..4)
        .map(|k| topo.add_line(ids, nodes[k], nodes[(k + 1) % 4]).expect("line"))
        .map(EdgeUse::forward)
        .collect();
    let face = topo
        .add_face(ids, FaceKind::Quad, edges, [Some(part), None])
        .expect("face");
    topo.update_visibility();
    (topo, face, part)
}

/// Node positions of an axis-aligned unit cube shifted by `x0` along X,
/// in HEX8 order.
pub fn hex_corners(x0: Real) -> [Point3<Real>; 8] {
    [
        Point3::new(x0, 0.0, 0.0),
        Point3::new(x0 + 1.0, 0.0, 0.0),
        Point3::new(x0 + 1.0, 1.0, 0.0),
        Point3::new(x0, 1.0, 0.0),
        Point3::new(x0, 0.0, 1.0),
        Point3::new(x0 + 1.0, 0.0, 1.0),
        Point3::new(x0 + 1.0, 1.0, 1.0),
        Point3::new(x0, 1.0, 1.0),
    ]
}

/// A single HEX8 on the unit cube with no neighbors.
pub fn unit_hex_mesh() -> FeMesh {
    let mut mesh = FeMesh::new();
    let nodes = hex_corners(0.0).iter().map(|p| mesh.add_node(*p)).collect();
    mesh.add_element(ElementKind::Hex8, nodes, 0);
    mesh
}

/// Two HEX8 elements side by side along X sharing the face at x = 1,
/// adjacency built.
pub fn two_hex_mesh() -> FeMesh {
    let mut mesh = FeMesh::new();
    for p in hex_corners(0.0) {
        mesh.add_node(p);
    }
    // the second cube reuses nodes 1, 2, 5, 6
    let far: Vec<usize> = [1, 2, 5, 6]
        .iter()
        .map(|&k| mesh.add_node(hex_corners(1.0)[k]))
        .collect();
    mesh.add_element(ElementKind::Hex8, (0..8).collect(), 0);
    mesh.add_element(ElementKind::Hex8, vec![1, far[0], far[1], 2, 5, far[2], far[3], 6], 0);
    mesh.build_adjacency();
    mesh
}

/// Centroid of a closed surface given as triangles.
pub fn centroid<T: Triangulated3D>(surface: &T) -> Point3<Real> {
    let mut sum = Vector3::zeros();
    let mut count = 0.0;
    surface.visit_triangles(|[a, b, c]| {
        sum += a.pos.coords + b.pos.coords + c.pos.coords;
        count += 3.0;
    });
    Point3::from(sum / count)
}

/// Asserts every triangle's geometric normal points away from `inside`.
pub fn assert_outward<T: Triangulated3D>(surface: &T, inside: &Point3<Real>) {
    surface.visit_triangles(|[a, b, c]| {
        let n = (b.pos - a.pos).cross(&(c.pos - a.pos));
        let mid = Point3::from((a.pos.coords + b.pos.coords + c.pos.coords) / 3.0);
        assert!(
            n.dot(&(mid - inside)) > 0.0,
            "triangle {:?} {:?} {:?} faces inward",
            a.pos,
            b.pos,
            c.pos
        );
    });
}

/// Asserts each triangle's wound normal agrees with its stored vertex normals.
pub fn assert_winding_matches_normals<T: Triangulated3D>(surface: &T) {
    surface.visit_triangles(|[a, b, c]| {
        let n = (b.pos - a.pos).cross(&(c.pos - a.pos));
        for v in [a, b, c] {
            if v.normal.norm() > 0.0 {
                assert!(n.dot(&v.normal) > 0.0, "vertex normal {:?} disagrees with winding", v.normal);
            }
        }
    });
}

/// Sum of the triangle areas of a render mesh.
pub fn surface_area(mesh: &RenderMesh) -> Real {
    mesh.triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.indices.map(|i| mesh.vertices[i].pos);
            (b - a).cross(&(c - a)).norm() * 0.5
        })
        .sum()
}
