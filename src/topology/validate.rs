//! Structural checks run before a face is tessellated.

use super::{EdgeKind, FaceId, FaceKind, ItemRef, Topology};
use crate::errors::{TessellationError, TessellationFailure, TopologyError};

impl Topology {
    /// Check that a face is a closed loop whose edge count and edge types
    /// match its [`FaceKind`].
    pub fn validate_face(&self, id: FaceId) -> Result<(), TessellationError> {
        let face = self.face(id).ok_or(TopologyError::UnknownFace(id))?;

        match face.parts[0] {
            Some(part) if self.part(part).is_some() => {},
            Some(part) => return Err(TopologyError::UnknownPart(part).into()),
            None => {
                return Err(TessellationError::invalid(format!("face {} has no owning part", id)));
            },
        }
        if let Some(part) = face.parts[1] {
            if self.part(part).is_none() {
                return Err(TopologyError::UnknownPart(part).into());
            }
        }

        if face.edges.is_empty() {
            return Err(TessellationError::invalid(format!("face {} has an empty edge loop", id)));
        }

        // closure: the end of edge i must be the start of edge i+1
        let ends = face
            .edges
            .iter()
            .map(|edge_use| self.edge_use_nodes(edge_use))
            .collect::<Result<Vec<_>, _>>()?;
        for (i, &(_, last)) in ends.iter().enumerate() {
            let (next_first, _) = ends[(i + 1) % ends.len()];
            if last != next_first {
                return Err(TessellationError::invalid(format!(
                    "face {} loop is open: edge {} ends at {} but edge {} starts at {}",
                    id,
                    face.edges[i].edge,
                    last,
                    face.edges[(i + 1) % ends.len()].edge,
                    next_first
                )));
            }
        }

        let kinds = face
            .edges
            .iter()
            .map(|edge_use| self.edge(edge_use.edge).map(|e| e.kind()).ok_or(TopologyError::UnknownEdge(edge_use.edge)))
            .collect::<Result<Vec<_>, _>>()?;

        let expect_count = |count: usize| -> Result<(), TessellationError> {
            if kinds.len() == count {
                Ok(())
            } else {
                Err(TessellationError::invalid(format!(
                    "{:?} face {} needs {} edges, found {}",
                    face.kind,
                    id,
                    count,
                    kinds.len()
                )))
            }
        };
        let mismatch = |what: &str| {
            TessellationError::invalid(format!("{:?} face {} {} (edge kinds {:?})", face.kind, id, what, kinds))
        };
        let is_axis_arc = |k: EdgeKind| matches!(k, EdgeKind::YArc | EdgeKind::ZArc);

        match face.kind {
            FaceKind::Polygon => {
                if kinds.contains(&EdgeKind::Polyline) {
                    return Err(mismatch("cannot be bounded by mesh polylines"));
                }
            },
            FaceKind::Extrude => {
                expect_count(4)?;
                if kinds[0] != kinds[2] {
                    return Err(mismatch("needs matching curves on edges 0 and 2"));
                }
                if kinds[1] != EdgeKind::Line || kinds[3] != EdgeKind::Line {
                    return Err(mismatch("needs straight edges 1 and 3"));
                }
            },
            FaceKind::Revolve => {
                expect_count(4)?;
                if kinds[0] != kinds[2] {
                    return Err(mismatch("needs matching profiles on edges 0 and 2"));
                }
                if !is_axis_arc(kinds[1]) || kinds[1] != kinds[3] {
                    return Err(mismatch("needs matching axis arcs on edges 1 and 3"));
                }
            },
            FaceKind::RevolveWedge => {
                expect_count(3)?;
                if kinds[0] != EdgeKind::Line || kinds[2] != EdgeKind::Line {
                    return Err(mismatch("needs straight edges 0 and 2"));
                }
                if !is_axis_arc(kinds[1]) {
                    return Err(mismatch("needs an axis arc on edge 1"));
                }
            },
            FaceKind::Quad => expect_count(4)?,
        }
        Ok(())
    }

    /// Validate every face, collecting all failures.
    pub fn validate(&self) -> Vec<TessellationFailure> {
        self.faces()
            .iter()
            .filter_map(|face| {
                self.validate_face(face.id)
                    .err()
                    .map(|error| TessellationFailure { item: ItemRef::Face(face.id), error })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{EdgeShape, EdgeUse, IdAllocator};
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn open_loop_is_reported() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let part = topo.add_part(&mut ids, "p");
        let a = topo.add_node(&mut ids, Point3::new(0.0, 0.0, 0.0));
        let b = topo.add_node(&mut ids, Point3::new(1.0, 0.0, 0.0));
        let c = topo.add_node(&mut ids, Point3::new(1.0, 1.0, 0.0));
        let ab = topo.add_line(&mut ids, a, b).expect("nodes exist");
        let bc = topo.add_line(&mut ids, b, c).expect("nodes exist");
        let f = topo
            .add_face(&mut ids, FaceKind::Polygon, vec![EdgeUse::forward(ab), EdgeUse::forward(bc)], [Some(part), None])
            .expect("edges exist");
        let err = topo.validate_face(f).expect_err("loop is open");
        assert!(err.to_string().contains("loop is open"));
    }

    #[test]
    fn wedge_requires_axis_arc() {
        let mut ids = IdAllocator::new();
        let mut topo = Topology::new();
        let part = topo.add_part(&mut ids, "p");
        let apex = topo.add_node(&mut ids, Point3::new(0.0, 0.0, 0.0));
        let b = topo.add_node(&mut ids, Point3::new(1.0, 0.0, 0.0));
        let c = topo.add_node(&mut ids, Point3::new(0.0, 0.0, -1.0));
        let e0 = topo.add_line(&mut ids, apex, b).expect("nodes exist");
        let e1 = topo.add_edge(&mut ids, [b, c], EdgeShape::Line).expect("nodes exist");
        let e2 = topo.add_line(&mut ids, c, apex).expect("nodes exist");
        let f = topo
            .add_face(
                &mut ids,
                FaceKind::RevolveWedge,
                vec![EdgeUse::forward(e0), EdgeUse::forward(e1), EdgeUse::forward(e2)],
                [Some(part), None],
            )
            .expect("edges exist");
        assert!(matches!(topo.validate_face(f), Err(TessellationError::InvalidTopology { .. })));
        assert_eq!(topo.validate().len(), 1);
    }
}
