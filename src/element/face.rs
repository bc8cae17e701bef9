//! Rendering of exterior face records on their own, without the element walk.

use super::render::{FacetBuffer, FacetOwner};
use super::shape::edge_point;
use super::{FaceShape, FeMesh, flat_normal};
use crate::float_types::Real;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// One normal per face from its first three corners.
    #[default]
    Flat,
    /// The record's per-node normals.
    Smooth,
    /// The record's per-node normals, with the face resampled on a grid of
    /// `divisions` steps per side. Linear triangles are never resampled.
    Subdivided { divisions: usize },
}

/// Append face record `face` of `mesh` to `out`, refined by its own shape.
///
/// Returns `false` and emits nothing when the record is missing or refers to
/// nodes the mesh does not have.
pub fn render_face(mesh: &FeMesh, face: usize, shading: Shading, out: &mut FacetBuffer) -> bool {
    let Some(record) = mesh.faces.get(face) else {
        tracing::warn!(face, records = mesh.faces.len(), "render of missing face record skipped");
        return false;
    };
    if record.nodes.len() != record.shape.node_count() {
        tracing::warn!(face, nodes = record.nodes.len(), shape = ?record.shape, "face record has wrong node count");
        return false;
    }
    let Some(positions) = mesh.positions(&record.nodes) else {
        tracing::warn!(face, "face record refers to missing nodes");
        return false;
    };

    let smooth = !matches!(shading, Shading::Flat) && record.normals.len() == positions.len();
    let normals = if smooth { record.normals.clone() } else { vec![flat_normal(&positions); positions.len()] };
    let (element, local) = record.element;
    let owner = FacetOwner { element, face: local };
    match shading {
        Shading::Subdivided { divisions } if record.shape != FaceShape::Tri3 => {
            out.push_subdivided(record.shape, &positions, &normals, divisions, owner);
        },
        _ => out.push_face(record.shape, &positions, &normals, owner),
    }
    true
}

/// Closed outline of face record `face`, first point not repeated.
///
/// Linear faces give their corners. Higher-order faces sample each edge at
/// `2 * divisions` steps, so curved edges show their curvature. `None` when
/// the record or one of its nodes is missing.
pub fn face_outline(mesh: &FeMesh, face: usize, divisions: usize) -> Option<Vec<Point3<Real>>> {
    let record = mesh.faces.get(face)?;
    if record.nodes.len() != record.shape.node_count() {
        return None;
    }
    let positions = mesh.positions(&record.nodes)?;
    if record.shape.edge_order() == 1 {
        return Some(positions[..record.shape.corner_count()].to_vec());
    }

    let steps = 2 * divisions.max(1);
    let mut outline = Vec::with_capacity(record.shape.edges().len() * steps);
    for edge in record.shape.edges() {
        let points: Vec<Point3<Real>> = edge.iter().map(|&k| positions[k]).collect();
        outline.extend((0..steps).map(|n| edge_point(&points, n as Real / steps as Real)));
    }
    Some(outline)
}
