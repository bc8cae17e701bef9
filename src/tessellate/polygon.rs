use super::{MeshBatch, TessellationOptions};
use crate::curve::Curve;
use crate::errors::TessellationError;
use crate::float_types::{EPSILON, PI, Real};
use crate::topology::{EdgeId, Face, NodeId, Topology};
use crate::triangulate::{newell_normal, triangulate_loop};
use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};

/// Rotation taking `normal` onto +Z.
fn plane_rotation(normal: &Vector3<Real>) -> UnitQuaternion<Real> {
    UnitQuaternion::rotation_between(normal, &Vector3::z())
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI))
}

/// Polygon faces: sample the loop, flatten it into its own plane, ear-clip,
/// and lift the triangles back onto the exact 3D samples.
pub(super) fn tessellate(
    topology: &Topology,
    face: &Face,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let mut boundary: Vec<Point3<Real>> = Vec::new();
    let mut tags: Vec<Option<NodeId>> = Vec::new();
    // segment k runs from boundary[k] to boundary[k + 1]
    let mut segment_edges: Vec<EdgeId> = Vec::new();

    for edge_use in &face.edges {
        let curve = topology.edge_curve(edge_use.edge)?;
        let (first, _) = topology.edge_use_nodes(edge_use)?;
        let samples = curve.sample(options.curve_segments, edge_use.winding);
        // the last sample is the first sample of the next edge
        for (k, p) in samples[..samples.len() - 1].iter().enumerate() {
            boundary.push(*p);
            tags.push(if k == 0 { Some(first) } else { None });
            segment_edges.push(edge_use.edge);
        }
    }

    let normal = newell_normal(&boundary);
    if normal.norm_squared() <= EPSILON {
        return Err(TessellationError::degenerate(
            format!("polygon face {} has no well-defined plane", face.id),
            boundary.first().copied(),
        ));
    }

    let rotation = plane_rotation(&normal);
    let origin = boundary[0];
    let flat: Vec<Point2<Real>> = boundary
        .iter()
        .map(|p| {
            let q = rotation * (p - origin);
            Point2::new(q.x, q.y)
        })
        .collect();

    let triangles = triangulate_loop(&flat)?;

    let mut batch = MeshBatch::with_capacity(boundary.len(), triangles.len());
    for (p, tag) in boundary.iter().zip(&tags) {
        batch.push_vertex(*p, *tag);
    }
    for tri in triangles {
        batch.push_triangle(tri, face.id);
    }
    let n = boundary.len();
    for (k, &edge) in segment_edges.iter().enumerate() {
        batch.push_segment([k, (k + 1) % n], edge);
    }
    Ok(batch)
}
