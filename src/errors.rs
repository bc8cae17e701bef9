//! Error types for topology editing, tessellation and element rendering

use crate::float_types::Real;
use crate::topology::{EdgeId, FaceId, ItemRef, NodeId, PartId};
use nalgebra::Point3;

/// Errors raised while editing a [`Topology`](crate::topology::Topology)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// (UnknownNode) No node carries this id
    #[error("(UnknownNode) no node with id {0}")]
    UnknownNode(NodeId),
    /// (UnknownEdge) No edge carries this id
    #[error("(UnknownEdge) no edge with id {0}")]
    UnknownEdge(EdgeId),
    /// (UnknownFace) No face carries this id
    #[error("(UnknownFace) no face with id {0}")]
    UnknownFace(FaceId),
    /// (UnknownPart) No part carries this id
    #[error("(UnknownPart) no part with id {0}")]
    UnknownPart(PartId),
    /// (InUse) The entity is still referenced and cannot be removed
    #[error("(InUse) {entity} is still referenced by {referenced_by}")]
    InUse { entity: String, referenced_by: String },
}

/// Errors raised while tessellating a single face or edge
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellationError {
    /// (InvalidTopology) A face or edge violates a structural precondition
    #[error("(InvalidTopology) {reason}")]
    InvalidTopology { reason: String },
    /// (DegenerateGeometry) Coincident points or zero-length vectors make the geometry ill-defined
    #[error("{}", degenerate_message(.reason, .at))]
    DegenerateGeometry { reason: String, at: Option<Point3<Real>> },
}

fn degenerate_message(reason: &str, at: &Option<Point3<Real>>) -> String {
    match at {
        Some(point) => format!("(DegenerateGeometry) {} at: {}", reason, point),
        None => format!("(DegenerateGeometry) {}", reason),
    }
}

impl TessellationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TessellationError::InvalidTopology { reason: reason.into() }
    }

    pub(crate) fn degenerate(reason: impl Into<String>, at: Option<Point3<Real>>) -> Self {
        TessellationError::DegenerateGeometry { reason: reason.into(), at }
    }
}

impl From<TopologyError> for TessellationError {
    fn from(error: TopologyError) -> Self {
        TessellationError::invalid(error.to_string())
    }
}

/// A face (or, for wireframe objects, an edge) that could not be tessellated,
/// reported next to the partial mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TessellationFailure {
    pub item: ItemRef,
    pub error: TessellationError,
}

/// Problems found by [`FeMesh::validate`](crate::element::FeMesh::validate)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// (MissingAdjacency) A neighbor index points past the element array
    #[error("(MissingAdjacency) element {element} face {face} refers to missing neighbor {neighbor}")]
    MissingAdjacency { element: usize, face: usize, neighbor: usize },
    /// (NodeOutOfRange) An element references a node that does not exist
    #[error("(NodeOutOfRange) element {element} refers to missing node {node}")]
    NodeOutOfRange { element: usize, node: usize },
    /// (NodeCount) The element carries the wrong number of nodes for its kind
    #[error("(NodeCount) element {element} has {found} nodes, its kind needs {expected}")]
    NodeCount { element: usize, expected: usize, found: usize },
    /// (FaceRecordOutOfRange) An element refers to a face record that does not exist
    #[error("(FaceRecordOutOfRange) element {element} face {face} refers to missing face record {record}")]
    FaceRecordOutOfRange { element: usize, face: usize, record: usize },
}
