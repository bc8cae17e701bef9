//! Visibility cascade and selection flags.
//!
//! Visibility is owned by parts. Faces, edges and nodes derive theirs from a
//! fixed three-pass propagation part → face → edge → node. The passes mark
//! into request-scoped arrays indexed by slot, never into the entities.

use super::{EdgeId, FaceId, NodeId, PartId, Topology};
use crate::errors::TopologyError;

/// Reference to any selectable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Node(NodeId),
    Edge(EdgeId),
    Face(FaceId),
    Part(PartId),
}

/// Reference state of a child during one cascade pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unreferenced,
    HiddenOnly,
    Visible,
}

impl Mark {
    fn absorb(&mut self, parent_visible: bool) {
        *self = match (*self, parent_visible) {
            (_, true) | (Mark::Visible, _) => Mark::Visible,
            _ => Mark::HiddenOnly,
        };
    }

    /// Unreferenced entities take `orphan_visible`.
    fn is_visible(self, orphan_visible: bool) -> bool {
        match self {
            Mark::Visible => true,
            Mark::HiddenOnly => false,
            Mark::Unreferenced => orphan_visible,
        }
    }
}

impl Topology {
    /// Recompute face, edge and node visibility from the part flags.
    ///
    /// A face is hidden when its first part is hidden and its second part is
    /// absent or hidden. An edge is visible only when a visible face uses it,
    /// and a node only when it ends a visible edge. Arc centers are not
    /// endpoints. Objects without faces keep their edges, and objects without
    /// edges keep their nodes. The result depends only on the part flags, so
    /// running it twice changes nothing.
    pub fn update_visibility(&mut self) {
        let part_visible = |topo: &Topology, part: Option<PartId>| {
            part.and_then(|p| topo.part(p)).is_some_and(|p| p.state.visible)
        };

        // part -> face
        let face_visible: Vec<bool> = self
            .faces
            .iter()
            .map(|face| part_visible(self, face.parts[0]) || part_visible(self, face.parts[1]))
            .collect();
        for (face, &visible) in self.faces.iter_mut().zip(&face_visible) {
            face.state.visible = visible;
        }

        // face -> edge
        let mut edge_marks = vec![Mark::Unreferenced; self.edges.len()];
        for (face, &visible) in self.faces.iter().zip(&face_visible) {
            for edge_use in &face.edges {
                if let Some(slot) = self.edge_slot(edge_use.edge) {
                    edge_marks[slot].absorb(visible);
                }
            }
        }
        let wireframe = self.faces.is_empty();
        for (edge, mark) in self.edges.iter_mut().zip(&edge_marks) {
            edge.state.visible = mark.is_visible(wireframe);
        }

        // edge -> node
        let mut node_marks = vec![Mark::Unreferenced; self.nodes.len()];
        for edge in &self.edges {
            for &node in &edge.nodes {
                if let Some(slot) = self.node_slot(node) {
                    node_marks[slot].absorb(edge.state.visible);
                }
            }
        }
        let point_cloud = self.edges.is_empty();
        for (node, mark) in self.nodes.iter_mut().zip(&node_marks) {
            node.state.visible = mark.is_visible(point_cloud);
        }

        tracing::trace!(
            faces = face_visible.iter().filter(|&&v| v).count(),
            edges = self.edges.iter().filter(|e| e.state.visible).count(),
            nodes = self.nodes.iter().filter(|n| n.state.visible).count(),
            "visibility cascade"
        );
    }

    fn set_part_visible(&mut self, id: PartId, visible: bool) -> Result<(), TopologyError> {
        let part = self.part_mut(id).ok_or(TopologyError::UnknownPart(id))?;
        part.state.visible = visible;
        self.update_visibility();
        Ok(())
    }

    pub fn show_part(&mut self, id: PartId) -> Result<(), TopologyError> {
        self.set_part_visible(id, true)
    }

    /// Hiding a part also drops its selection.
    pub fn hide_part(&mut self, id: PartId) -> Result<(), TopologyError> {
        if let Some(part) = self.part_mut(id) {
            part.state.selected = false;
        }
        self.set_part_visible(id, false)
    }

    pub fn show_all_parts(&mut self) {
        for part in self.parts.iter_mut() {
            part.state.visible = true;
        }
        self.update_visibility();
    }

    /// Derived visibility of a face. Unknown faces are not visible.
    pub fn is_face_visible(&self, id: FaceId) -> bool {
        self.face(id).is_some_and(|f| f.state.visible)
    }

    pub fn is_part_visible(&self, id: PartId) -> bool {
        self.part(id).is_some_and(|p| p.state.visible)
    }

    /// Set the selection flag of one entity. Selection does not cascade.
    pub fn set_selected(&mut self, item: ItemRef, selected: bool) -> Result<(), TopologyError> {
        let state = match item {
            ItemRef::Node(id) => &mut self.node_mut(id).ok_or(TopologyError::UnknownNode(id))?.state,
            ItemRef::Edge(id) => &mut self.edge_mut(id).ok_or(TopologyError::UnknownEdge(id))?.state,
            ItemRef::Face(id) => &mut self.face_mut(id).ok_or(TopologyError::UnknownFace(id))?.state,
            ItemRef::Part(id) => &mut self.part_mut(id).ok_or(TopologyError::UnknownPart(id))?.state,
        };
        state.selected = selected;
        Ok(())
    }

    pub fn is_selected(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Node(id) => self.node(id).is_some_and(|n| n.state.selected),
            ItemRef::Edge(id) => self.edge(id).is_some_and(|e| e.state.selected),
            ItemRef::Face(id) => self.face(id).is_some_and(|f| f.state.selected),
            ItemRef::Part(id) => self.part(id).is_some_and(|p| p.state.selected),
        }
    }

    pub fn selection(&self) -> Vec<ItemRef> {
        let nodes = self.nodes.iter().filter(|n| n.state.selected).map(|n| ItemRef::Node(n.id));
        let edges = self.edges.iter().filter(|e| e.state.selected).map(|e| ItemRef::Edge(e.id));
        let faces = self.faces.iter().filter(|f| f.state.selected).map(|f| ItemRef::Face(f.id));
        let parts = self.parts.iter().filter(|p| p.state.selected).map(|p| ItemRef::Part(p.id));
        nodes.chain(edges).chain(faces).chain(parts).collect()
    }

    pub fn clear_selection(&mut self) {
        self.nodes.iter_mut().for_each(|n| n.state.selected = false);
        self.edges.iter_mut().for_each(|e| e.state.selected = false);
        self.faces.iter_mut().for_each(|f| f.state.selected = false);
        self.parts.iter_mut().for_each(|p| p.state.selected = false);
    }
}
