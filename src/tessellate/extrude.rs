use super::{MeshBatch, TessellationOptions};
use crate::curve::Curve;
use crate::errors::TessellationError;
use crate::float_types::Real;
use crate::topology::{Face, Topology};
use nalgebra::Point3;

/// Extruded faces: a bottom row sampled along edge 0 and a top row shifted by
/// the extrusion vector (edge 1), stitched as a strip of triangle pairs.
///
/// ```text
///  n3 ---- e2 ---- n2
///   |               |
///  e3              e1
///   |               |
///  n0 ---- e0 ---- n1
/// ```
pub(super) fn tessellate(
    topology: &Topology,
    face: &Face,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let nodes = topology.face_nodes(face.id)?;
    let [n0, n1, n2, n3] = [nodes[0], nodes[1], nodes[2], nodes[3]];
    let e0 = face.edges[0];

    let lift = topology.position(n2)? - topology.position(n1)?;
    if lift.norm() <= crate::float_types::tolerance() {
        return Err(TessellationError::degenerate(
            format!("extruded face {} has a zero extrusion vector", face.id),
            Some(topology.position(n1)?),
        ));
    }

    let bottom = topology.edge_curve(e0.edge)?.sample(options.curve_segments, e0.winding);
    let n = bottom.len() - 1;
    let top_first = topology.position(n3)?;
    let top_last = topology.position(n2)?;

    let mut batch = MeshBatch::with_capacity(2 * (n + 1), 2 * n);
    for (i, p) in bottom.iter().enumerate() {
        let tag = match i {
            0 => Some(n0),
            _ if i == n => Some(n1),
            _ => None,
        };
        batch.push_vertex(*p, tag);
    }
    for (i, p) in bottom.iter().enumerate() {
        let (pos, tag): (Point3<Real>, _) = match i {
            0 => (top_first, Some(n3)),
            _ if i == n => (top_last, Some(n2)),
            _ => (p + lift, None),
        };
        batch.push_vertex(pos, tag);
    }

    let top = |i: usize| n + 1 + i;
    for i in 0..n {
        batch.push_triangle([i, i + 1, top(i + 1)], face.id);
        batch.push_triangle([top(i + 1), top(i), i], face.id);
    }

    let bottom_row: Vec<usize> = (0..=n).collect();
    let top_row: Vec<usize> = (0..=n).rev().map(top).collect();
    batch.push_polyline(&bottom_row, e0.edge);
    batch.push_segment([n, top(n)], face.edges[1].edge);
    batch.push_polyline(&top_row, face.edges[2].edge);
    batch.push_segment([top(0), 0], face.edges[3].edge);
    Ok(batch)
}
