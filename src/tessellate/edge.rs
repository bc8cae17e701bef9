use super::{MeshBatch, TessellationOptions};
use crate::curve::{Curve, Winding};
use crate::errors::{TessellationError, TopologyError};
use crate::topology::{EdgeId, Topology};

/// Wireframe batch of one edge: its sampled curve as a tagged polyline.
pub fn tessellate_edge(
    topology: &Topology,
    id: EdgeId,
    options: &TessellationOptions,
) -> Result<MeshBatch, TessellationError> {
    let edge = topology.edge(id).ok_or(TopologyError::UnknownEdge(id))?;
    let samples = topology
        .edge_curve(id)?
        .sample(options.curve_segments.max(1), Winding::Forward);
    let last = samples.len() - 1;

    let mut batch = MeshBatch::with_capacity(samples.len(), 0);
    let run: Vec<usize> = samples
        .iter()
        .enumerate()
        .map(|(k, p)| {
            let tag = match k {
                0 => Some(edge.nodes[0]),
                _ if k == last => Some(edge.nodes[1]),
                _ => None,
            };
            batch.push_vertex(*p, tag)
        })
        .collect();
    batch.push_polyline(&run, id);
    Ok(batch)
}

/// Point batch of every node, for objects that have neither faces nor edges.
pub fn node_batch(topology: &Topology) -> MeshBatch {
    let mut batch = MeshBatch::with_capacity(topology.nodes().len(), 0);
    for node in topology.nodes() {
        batch.push_vertex(node.position, Some(node.id));
    }
    batch
}
