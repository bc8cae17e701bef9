mod support;

use approx::assert_relative_eq;
use femtess::float_types::{PI, Real};
use femtess::object::shapes::{
    box_object, curve_object, cylinder_object, revolved_band_object, revolved_disc_object,
};
use femtess::topology::{EdgeShape, IdAllocator, ItemRef};
use femtess::{
    ExternalObject, GeometricObject, RenderMesh, RenderMeshCell, SurfacePatch, TessellationError,
    TessellationOptions, Triangulated3D,
};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use support::{assert_outward, assert_winding_matches_normals, surface_area, unit_quad_face};

#[test]
fn box_faces_point_out() {
    let mut ids = IdAllocator::new();
    let cube = box_object(&mut ids, "box", 2.0, 3.0, 4.0).expect("box");
    let mesh = cube.ensure_render_mesh().expect("visible");

    assert_eq!(mesh.face_partitions().len(), 6);
    assert_outward(mesh.as_ref(), &Point3::new(1.0, 1.5, 2.0));
    assert_winding_matches_normals(mesh.as_ref());
    assert_relative_eq!(surface_area(&mesh), 2.0 * (6.0 + 8.0 + 12.0), epsilon = 1e-9);
    assert_relative_eq!(cube.extents(), Vector3::new(2.0, 3.0, 4.0));
    assert_relative_eq!(cube.center(), Point3::new(1.0, 1.5, 2.0));
}

#[test]
fn cylinder_is_closed_and_outward() {
    let mut ids = IdAllocator::new();
    let cylinder = cylinder_object(&mut ids, "cyl", 1.0, 2.0).expect("cylinder");
    let out = cylinder.tessellate(&TessellationOptions::default());

    assert!(out.is_complete(), "{:?}", out.failures);
    assert_eq!(out.mesh.face_partitions().len(), 6);
    assert_outward(&out.mesh, &Point3::new(0.0, 0.0, 1.0));
    assert_relative_eq!(surface_area(&out.mesh), 6.0 * PI, max_relative = 1e-3);

    // rim samples stay on the circle
    for v in &out.mesh.vertices {
        let r = (v.pos.x * v.pos.x + v.pos.y * v.pos.y).sqrt();
        assert!(r <= 1.0 + 1e-9);
    }
}

#[test]
fn revolved_disc_faces_up_the_axis() {
    let mut ids = IdAllocator::new();
    let disc = revolved_disc_object(&mut ids, "disc", 2.0).expect("disc");
    let out = disc.tessellate(&TessellationOptions::default().with_revolve_segments(16));

    assert!(out.is_complete(), "{:?}", out.failures);
    assert_eq!(out.mesh.triangles.len(), 4 * 16);
    for t in &out.mesh.triangles {
        assert_relative_eq!(t.normal, Vector3::y(), epsilon = 1e-9);
    }
    assert_relative_eq!(surface_area(&out.mesh), 4.0 * PI, max_relative = 1e-2);
}

#[test]
fn revolved_band_faces_away_from_the_axis() {
    let mut ids = IdAllocator::new();
    let band = revolved_band_object(&mut ids, "band", 1.5, 1.0).expect("band");
    let options = TessellationOptions::default().with_curve_segments(2).with_revolve_segments(12);
    let out = band.tessellate(&options);

    assert!(out.is_complete(), "{:?}", out.failures);
    // straight profiles are never subdivided
    assert_eq!(out.mesh.triangles.len(), 4 * 2 * 12);
    for t in &out.mesh.triangles {
        let [a, b, c] = t.indices.map(|i| out.mesh.vertices[i].pos);
        let mid = (a.coords + b.coords + c.coords) / 3.0;
        let radial = Vector3::new(mid.x, 0.0, mid.z);
        assert!(t.normal.dot(&radial) > 0.0);
        assert!(t.normal.y.abs() < 1e-9);
    }
}

#[test]
fn curve_object_is_a_wireframe() {
    let mut ids = IdAllocator::new();
    let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
    let curve = curve_object(&mut ids, "curve", &points).expect("curve");
    let mesh = curve.ensure_render_mesh().expect("visible");

    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(mesh.edges.len(), 2);
    assert_eq!(mesh.edge_partitions().len(), 2);
}

#[test]
fn render_mesh_is_rebuilt_after_edits_and_hidden_with_the_object() {
    let mut ids = IdAllocator::new();
    let mut cube = box_object(&mut ids, "box", 1.0, 1.0, 1.0).expect("box");
    assert!(cube.render_mesh().is_none());

    assert!(cube.update().is_empty());
    let first = cube.render_mesh().expect("built");

    let corner = cube.topology().nodes()[6].id;
    cube.set_node_position(corner, Point3::new(2.0, 2.0, 2.0)).expect("known node");
    assert!(cube.render_mesh().is_none());
    let second = cube.ensure_render_mesh().expect("rebuilt");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.bounding_box().maxs, Point3::new(2.0, 2.0, 2.0));
    // the old snapshot is untouched
    assert_eq!(first.bounding_box().maxs, Point3::new(1.0, 1.0, 1.0));

    cube.set_options(TessellationOptions::default().with_quad_divisions(2));
    assert!(cube.render_mesh().is_none());
    assert_eq!(cube.ensure_render_mesh().expect("rebuilt").triangles.len(), 6 * 8);

    cube.hide();
    assert!(cube.render_mesh().is_none());
    cube.show();
    assert!(cube.render_mesh().is_some());
}

#[test]
fn hidden_parts_drop_out_of_visible_triangles() {
    let mut ids = IdAllocator::new();
    let mut cube = box_object(&mut ids, "box", 1.0, 1.0, 1.0).expect("box");
    let mesh = cube.ensure_render_mesh().expect("visible");
    let part = cube.topology().parts()[0].id;

    cube.select(ItemRef::Part(part)).expect("known part");
    cube.hide_part(part).expect("known part");
    assert_eq!(mesh.visible_triangles(cube.topology()).count(), 0);
    assert!(cube.topology().nodes().iter().all(|n| !n.state.visible));
    assert!(cube.topology().selection().is_empty());
    assert!(
        mesh.pick_visible(cube.topology(), &Point3::new(0.5, 0.5, 5.0), &-Vector3::z(), 0.0)
            .is_none()
    );

    cube.show_all_parts();
    assert_eq!(mesh.visible_triangles(cube.topology()).count(), mesh.triangles.len());
}

#[test]
fn visibility_cascade_is_idempotent() {
    let mut ids = IdAllocator::new();
    let (mut topo, face, first) = unit_quad_face(&mut ids);
    let second = topo.add_part(&mut ids, "other side");
    topo.face_mut(face).expect("face").parts[1] = Some(second);

    let flags = |t: &femtess::Topology| -> Vec<bool> {
        t.faces()
            .iter()
            .map(|f| f.state.visible)
            .chain(t.edges().iter().map(|e| e.state.visible))
            .chain(t.nodes().iter().map(|n| n.state.visible))
            .collect()
    };

    topo.hide_part(first).expect("part");
    assert!(topo.is_face_visible(face), "the second part still shows the face");
    let once = flags(&topo);
    topo.update_visibility();
    assert_eq!(flags(&topo), once);

    topo.hide_part(second).expect("part");
    assert!(!topo.is_face_visible(face));
    let once = flags(&topo);
    topo.update_visibility();
    assert_eq!(flags(&topo), once);
    assert!(once.iter().all(|v| !v));
}

#[test]
fn loose_edges_nodes_and_arc_centers_stay_hidden() {
    let mut ids = IdAllocator::new();
    let (mut topo, _face, _part) = unit_quad_face(&mut ids);
    let loose = [
        topo.add_node(&mut ids, Point3::new(3.0, 0.0, 0.0)),
        topo.add_node(&mut ids, Point3::new(4.0, 0.0, 0.0)),
    ];
    let loose_edge = topo.add_line(&mut ids, loose[0], loose[1]).expect("nodes exist");
    let center = topo.add_node(&mut ids, Point3::new(5.0, 0.0, 0.0));
    let rim = [
        topo.add_node(&mut ids, Point3::new(6.0, 0.0, 0.0)),
        topo.add_node(&mut ids, Point3::new(5.0, 1.0, 0.0)),
    ];
    let arc = topo
        .add_edge(&mut ids, rim, EdgeShape::CircleArc { center, axis: Some(Vector3::z()) })
        .expect("nodes exist");
    let stray = topo.add_node(&mut ids, Point3::new(9.0, 9.0, 9.0));
    topo.update_visibility();

    let node_visible = |id| topo.node(id).expect("node").state.visible;
    let edge_visible = |id| topo.edge(id).expect("edge").state.visible;
    assert!(topo.faces().iter().all(|f| f.state.visible));
    assert!(!edge_visible(loose_edge));
    assert!(!edge_visible(arc));
    for node in loose.into_iter().chain(rim).chain([center, stray]) {
        assert!(!node_visible(node));
    }
    // the quad corners end visible edges
    let visible_nodes = topo.nodes().iter().filter(|n| n.state.visible).count();
    assert_eq!(visible_nodes, 4);
}

#[test]
fn wireframes_keep_their_edges_but_not_arc_centers() {
    let mut ids = IdAllocator::new();
    let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
    let mut curve = curve_object(&mut ids, "curve", &points).expect("curve");
    let topo = curve.topology_mut();
    let center = topo.add_node(&mut ids, Point3::new(2.0, 0.0, 0.0));
    let rim = [
        topo.add_node(&mut ids, Point3::new(3.0, 0.0, 0.0)),
        topo.add_node(&mut ids, Point3::new(2.0, 1.0, 0.0)),
    ];
    topo.add_edge(&mut ids, rim, EdgeShape::CircleArc { center, axis: None })
        .expect("nodes exist");
    topo.update_visibility();

    assert!(topo.edges().iter().all(|e| e.state.visible));
    assert!(!topo.node(center).expect("node").state.visible);
    assert_eq!(topo.nodes().iter().filter(|n| n.state.visible).count(), 5);
}

#[test]
fn pick_finds_the_nearest_face_and_snaps_to_corners() {
    let mut ids = IdAllocator::new();
    let cube = box_object(&mut ids, "box", 1.0, 1.0, 1.0).expect("box");
    let mesh = cube.ensure_render_mesh().expect("visible");
    let top = cube.topology().faces()[5].id;

    let hit = mesh
        .pick(&Point3::new(0.5, 0.25, 5.0), &-Vector3::z(), 1e-3)
        .expect("ray hits the box");
    assert_eq!(hit.face, top);
    assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-9);
    assert_relative_eq!(hit.point, Point3::new(0.5, 0.25, 1.0), epsilon = 1e-9);
    assert_eq!(hit.node, None);

    let near_corner = 1.0 - 1e-4;
    let hit = mesh
        .pick(&Point3::new(near_corner, near_corner, 5.0), &-Vector3::z(), 1e-2)
        .expect("ray hits the box");
    let corner = cube.topology().nodes()[6].id;
    assert_eq!(hit.node, Some(corner));

    assert!(mesh.pick(&Point3::new(5.0, 5.0, 5.0), &-Vector3::z(), 1e-2).is_none());
}

#[test]
fn external_patches_replace_the_builtin_tessellation() {
    let mut ids = IdAllocator::new();
    let (topo, face, _) = unit_quad_face(&mut ids);
    let nodes = topo.face_nodes(face).expect("face");
    let edges: Vec<_> = topo.edges().iter().map(|e| e.id).collect();

    let patch = SurfacePatch {
        face,
        positions: nodes.iter().map(|&n| topo.position(n).expect("node")).collect(),
        triangles: vec![[0, 1, 2], [0, 2, 3]],
        corners: nodes.iter().copied().enumerate().collect(),
        boundary: (0..4).map(|k| (vec![k, (k + 1) % 4], edges[k])).collect(),
    };
    let object = ExternalObject::new("cad", topo.clone(), vec![patch.clone()]);
    let out = object.tessellate(&TessellationOptions::default());
    assert!(out.is_complete());
    assert_eq!(out.mesh.triangles.len(), 2);
    assert_eq!(out.mesh.node_vertices().count(), 4);
    assert_eq!(out.mesh.edge_partitions().len(), 4);

    let broken = SurfacePatch { triangles: vec![[0, 1, 9]], ..patch };
    let object = ExternalObject::new("cad", topo.clone(), vec![broken]);
    let out = object.tessellate(&TessellationOptions::default());
    assert_eq!(out.failures.len(), 1);
    assert!(matches!(out.failures[0].error, TessellationError::InvalidTopology { .. }));

    let fallback = ExternalObject::new("cad", topo, Vec::new());
    assert_eq!(fallback.tessellate(&TessellationOptions::default()).mesh.triangles.len(), 200);
}

#[test]
fn readers_never_see_a_partial_mesh() {
    let mut ids = IdAllocator::new();
    let small = box_object(&mut ids, "small", 1.0, 1.0, 1.0)
        .expect("box")
        .tessellate(&TessellationOptions::default().with_quad_divisions(1))
        .mesh;
    let large = box_object(&mut ids, "large", 1.0, 1.0, 1.0)
        .expect("box")
        .tessellate(&TessellationOptions::default().with_quad_divisions(8))
        .mesh;
    let sizes = [small.triangles.len(), large.triangles.len()];

    let cell = RenderMeshCell::new();
    cell.replace(small.clone());
    std::thread::scope(|scope| {
        scope.spawn(|| {
            for k in 0..200 {
                let next: RenderMesh = if k % 2 == 0 { large.clone() } else { small.clone() };
                cell.replace(next);
            }
        });
        for _ in 0..200 {
            let snapshot = cell.load().expect("always built");
            assert!(sizes.contains(&snapshot.triangles.len()));
            let area: Real = surface_area(&snapshot);
            assert_relative_eq!(area, 6.0, epsilon = 1e-9);
        }
    });
}
