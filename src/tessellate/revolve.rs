use super::{MeshBatch, TessellationOptions};
use crate::curve::{Curve, EdgeCurve, Winding};
use crate::errors::TessellationError;
use crate::float_types::Real;
use crate::topology::{EdgeUse, Face, Topology};
use nalgebra::{Rotation3, Unit, Vector3};

/// Axis and signed angle swept by an axis arc when walked along `edge_use`.
fn revolution(
    topology: &Topology,
    edge_use: &EdgeUse,
) -> Result<(Unit<Vector3<Real>>, Real), TessellationError> {
    match topology.edge_curve(edge_use.edge)? {
        EdgeCurve::Circle(arc) => {
            let sweep = match edge_use.winding {
                Winding::Forward => arc.sweep(),
                Winding::Reverse => -arc.sweep(),
            };
            Ok((Unit::new_normalize(arc.normal()), sweep))
        },
        _ => Err(TessellationError::invalid(format!("edge {} is not an axis arc", edge_use.edge))),
    }
}

/// Revolved faces: the profile (edge 0) is swept about the axis of edge 1
/// into a `(P+1) × (M+1)` grid. The first and last columns are the sampled
/// profiles themselves, so the corners land exactly on the loop nodes.
///
/// ```text
///  n3 ---- e2 ---- n2      j (sweep)
///   |               |      ^
///  e3              e1      |
///   |               |      +--> i (profile)
///  n0 ---- e0 ---- n1
/// ```
pub(super) fn tessellate(
    topology: &Topology,
    face: &Face,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let nodes = topology.face_nodes(face.id)?;
    let [e0, e1, e2, e3] = [face.edges[0], face.edges[1], face.edges[2], face.edges[3]];

    let near = topology.edge_curve(e0.edge)?.sample(options.curve_segments, e0.winding);
    // edge 2 runs n2 -> n3; walk it backwards so it pairs with edge 0 sample by sample
    let far = topology.edge_curve(e2.edge)?.sample(options.curve_segments, e2.winding.reversed());
    if near.len() != far.len() {
        return Err(TessellationError::invalid(format!(
            "revolved face {} has profiles with {} and {} samples",
            face.id,
            near.len(),
            far.len()
        )));
    }

    let (axis, sweep) = revolution(topology, &e1)?;
    let p = near.len() - 1;
    let m = options.revolve_segments;
    let idx = |i: usize, j: usize| i * (m + 1) + j;

    let mut batch = MeshBatch::with_capacity((p + 1) * (m + 1), 2 * p * m);
    for i in 0..=p {
        for j in 0..=m {
            let pos = if j == 0 {
                near[i]
            } else if j == m {
                far[i]
            } else {
                Rotation3::from_axis_angle(&axis, sweep * j as Real / m as Real) * near[i]
            };
            let tag = match (i, j) {
                (0, 0) => Some(nodes[0]),
                (i, 0) if i == p => Some(nodes[1]),
                (i, j) if i == p && j == m => Some(nodes[2]),
                (0, j) if j == m => Some(nodes[3]),
                _ => None,
            };
            batch.push_vertex(pos, tag);
        }
    }

    for i in 0..p {
        for j in 0..m {
            let a = idx(i, j);
            let b = idx(i + 1, j);
            let c = idx(i + 1, j + 1);
            let d = idx(i, j + 1);
            batch.push_triangle([a, b, c], face.id);
            batch.push_triangle([c, d, a], face.id);
        }
    }

    let e0_run: Vec<usize> = (0..=p).map(|i| idx(i, 0)).collect();
    let e1_run: Vec<usize> = (0..=m).map(|j| idx(p, j)).collect();
    let e2_run: Vec<usize> = (0..=p).rev().map(|i| idx(i, m)).collect();
    let e3_run: Vec<usize> = (0..=m).rev().map(|j| idx(0, j)).collect();
    batch.push_polyline(&e0_run, e0.edge);
    batch.push_polyline(&e1_run, e1.edge);
    batch.push_polyline(&e2_run, e2.edge);
    batch.push_polyline(&e3_run, e3.edge);
    Ok(batch)
}

/// Revolved wedges: a fan from the apex (node 0, on the axis) over the
/// sampled axis arc (edge 1).
pub(super) fn tessellate_wedge(
    topology: &Topology,
    face: &Face,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let nodes = topology.face_nodes(face.id)?;
    let [e0, e1, e2] = [face.edges[0], face.edges[1], face.edges[2]];

    let arc = topology.edge_curve(e1.edge)?.sample(options.revolve_segments, e1.winding);
    let m = arc.len() - 1;

    let mut batch = MeshBatch::with_capacity(m + 2, m);
    let apex = batch.push_vertex(topology.position(nodes[0])?, Some(nodes[0]));
    for (j, p) in arc.iter().enumerate() {
        let tag = match j {
            0 => Some(nodes[1]),
            _ if j == m => Some(nodes[2]),
            _ => None,
        };
        batch.push_vertex(*p, tag);
    }

    for j in 0..m {
        batch.push_triangle([apex, j + 1, j + 2], face.id);
    }

    let arc_run: Vec<usize> = (1..=m + 1).collect();
    batch.push_segment([apex, 1], e0.edge);
    batch.push_polyline(&arc_run, e1.edge);
    batch.push_segment([m + 1, apex], e2.edge);
    Ok(batch)
}
