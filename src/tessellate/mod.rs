//! Face tessellators and the per-object tessellation driver.
//!
//! Each face kind has its own procedure producing a local [`MeshBatch`]. Faces
//! are isolated from each other: a face that fails validation or hits
//! degenerate geometry is reported and skipped, the rest still render.

use crate::errors::{TessellationError, TessellationFailure, TopologyError};
use crate::float_types::Real;
use crate::render_mesh::RenderMesh;
use crate::topology::{EdgeId, FaceId, FaceKind, ItemRef, NodeId, Topology};
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

mod edge;
mod extrude;
mod polygon;
mod quad;
mod revolve;

pub use edge::{node_batch, tessellate_edge};

/// Sampling resolution. Changing it never renumbers topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationOptions {
    /// Segments per curved edge.
    pub curve_segments: usize,
    /// Angular segments of revolved faces.
    pub revolve_segments: usize,
    /// Grid divisions M of bilinear quad faces.
    pub quad_divisions: usize,
}

pub const DEFAULT_CURVE_SEGMENTS: usize = 50;
pub const DEFAULT_QUAD_DIVISIONS: usize = 10;

impl Default for TessellationOptions {
    fn default() -> Self {
        TessellationOptions {
            curve_segments: DEFAULT_CURVE_SEGMENTS,
            revolve_segments: DEFAULT_CURVE_SEGMENTS,
            quad_divisions: DEFAULT_QUAD_DIVISIONS,
        }
    }
}

impl TessellationOptions {
    pub const fn with_curve_segments(mut self, segments: usize) -> Self {
        self.curve_segments = if segments == 0 { 1 } else { segments };
        self
    }

    pub const fn with_revolve_segments(mut self, segments: usize) -> Self {
        self.revolve_segments = if segments == 0 { 1 } else { segments };
        self
    }

    pub const fn with_quad_divisions(mut self, divisions: usize) -> Self {
        self.quad_divisions = if divisions == 0 { 1 } else { divisions };
        self
    }

    /// Same options with every count clamped to at least 1.
    pub fn clamped(self) -> Self {
        self.with_curve_segments(self.curve_segments)
            .with_revolve_segments(self.revolve_segments)
            .with_quad_divisions(self.quad_divisions)
    }
}

/// A vertex of a local batch. Corner vertices carry their node id, sampled
/// interior points carry `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchVertex {
    pub pos: Point3<Real>,
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedTriangle {
    pub indices: [usize; 3],
    pub face: FaceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedSegment {
    pub indices: [usize; 2],
    pub edge: EdgeId,
}

/// Output of one face (or edge) tessellator, indices local to the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBatch {
    pub vertices: Vec<BatchVertex>,
    pub triangles: Vec<TaggedTriangle>,
    pub segments: Vec<TaggedSegment>,
}

impl MeshBatch {
    pub fn new() -> Self {
        MeshBatch::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        MeshBatch {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
            segments: Vec::new(),
        }
    }

    pub fn push_vertex(&mut self, pos: Point3<Real>, node: Option<NodeId>) -> usize {
        self.vertices.push(BatchVertex { pos, node });
        self.vertices.len() - 1
    }

    pub fn push_triangle(&mut self, indices: [usize; 3], face: FaceId) {
        self.triangles.push(TaggedTriangle { indices, face });
    }

    pub fn push_segment(&mut self, indices: [usize; 2], edge: EdgeId) {
        self.segments.push(TaggedSegment { indices, edge });
    }

    /// Push consecutive segments through `indices`, all tagged `edge`.
    pub fn push_polyline(&mut self, indices: &[usize], edge: EdgeId) {
        for pair in indices.windows(2) {
            self.push_segment([pair[0], pair[1]], edge);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Render mesh plus the items that failed to tessellate.
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    pub mesh: RenderMesh,
    pub failures: Vec<TessellationFailure>,
}

impl Tessellation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate and tessellate one face.
pub fn tessellate_face(
    topology: &Topology,
    id: FaceId,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    topology.validate_face(id)?;
    let face = topology.face(id).ok_or(TopologyError::UnknownFace(id))?;
    let options = options.clamped();

    let batch = match face.kind {
        FaceKind::Polygon => polygon::tessellate(topology, face, &options),
        FaceKind::Extrude => extrude::tessellate(topology, face, &options),
        FaceKind::Revolve => revolve::tessellate(topology, face, &options),
        FaceKind::RevolveWedge => revolve::tessellate_wedge(topology, face, &options),
        FaceKind::Quad => quad::tessellate(topology, face, &options),
    }?;

    tracing::debug!(
        face = %id,
        kind = ?face.kind,
        vertices = batch.vertices.len(),
        triangles = batch.triangles.len(),
        "tessellated face"
    );
    Ok(batch)
}

/// Tessellate every face into its own batch, in face order.
///
/// Objects without faces fall back to wireframe batches of their edges, and
/// objects without edges to a single batch of tagged nodes.
pub fn tessellate_batches(
    topology: &Topology,
    options: &TessellationOptions,
) -> (Vec<MeshBatch>, Vec<TessellationFailure>) {
    let (items, results): (Vec<ItemRef>, Vec<Result<MeshBatch, TessellationError>>) = if !topology.faces().is_empty() {
        #[cfg(feature = "parallel")]
        let iter = topology.faces().par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = topology.faces().iter();
        iter.map(|face| (ItemRef::Face(face.id), tessellate_face(topology, face.id, options)))
            .unzip()
    } else if !topology.edges().is_empty() {
        topology
            .edges()
            .iter()
            .map(|edge| (ItemRef::Edge(edge.id), tessellate_edge(topology, edge.id, options)))
            .unzip()
    } else {
        return (vec![node_batch(topology)], Vec::new());
    };

    let mut batches = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (item, result) in items.into_iter().zip(results) {
        match result {
            Ok(batch) => batches.push(batch),
            Err(error) => {
                tracing::warn!(item = ?item, %error, "tessellation failed");
                failures.push(TessellationFailure { item, error });
            },
        }
    }
    (batches, failures)
}

/// Tessellate and assemble a complete render mesh.
pub fn tessellate(topology: &Topology, options: &TessellationOptions) -> Tessellation {
    let (batches, failures) = tessellate_batches(topology, options);
    Tessellation { mesh: RenderMesh::assemble(batches), failures }
}
