//! Local face tables of the supported element kinds.
//!
//! Each face lists its nodes so that the corners run counter-clockwise seen
//! from outside the element, corners first, then edge nodes in edge order,
//! then any face-center node.

use super::{ElementKind, FaceShape};

/// One local face: its shape and the element-local node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceDef {
    pub shape: FaceShape,
    pub nodes: &'static [usize],
}

const fn q4(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Quad4, nodes }
}
const fn q8(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Quad8, nodes }
}
const fn q9(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Quad9, nodes }
}
const fn t3(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Tri3, nodes }
}
const fn t6(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Tri6, nodes }
}
const fn t7(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Tri7, nodes }
}
const fn t10(nodes: &'static [usize]) -> FaceDef {
    FaceDef { shape: FaceShape::Tri10, nodes }
}

pub const HEX8_FACES: [FaceDef; 6] = [
    q4(&[0, 1, 5, 4]),
    q4(&[1, 2, 6, 5]),
    q4(&[2, 3, 7, 6]),
    q4(&[3, 0, 4, 7]),
    q4(&[3, 2, 1, 0]),
    q4(&[4, 5, 6, 7]),
];

pub const HEX20_FACES: [FaceDef; 6] = [
    q8(&[0, 1, 5, 4, 8, 17, 12, 16]),
    q8(&[1, 2, 6, 5, 9, 18, 13, 17]),
    q8(&[2, 3, 7, 6, 10, 19, 14, 18]),
    q8(&[3, 0, 4, 7, 11, 16, 15, 19]),
    q8(&[3, 2, 1, 0, 10, 9, 8, 11]),
    q8(&[4, 5, 6, 7, 12, 13, 14, 15]),
];

pub const HEX27_FACES: [FaceDef; 6] = [
    q9(&[0, 1, 5, 4, 8, 17, 12, 16, 20]),
    q9(&[1, 2, 6, 5, 9, 18, 13, 17, 21]),
    q9(&[2, 3, 7, 6, 10, 19, 14, 18, 22]),
    q9(&[3, 0, 4, 7, 11, 16, 15, 19, 23]),
    q9(&[3, 2, 1, 0, 10, 9, 8, 11, 24]),
    q9(&[4, 5, 6, 7, 12, 13, 14, 15, 25]),
];

pub const PENTA6_FACES: [FaceDef; 5] = [
    q4(&[0, 1, 4, 3]),
    q4(&[1, 2, 5, 4]),
    q4(&[0, 3, 5, 2]),
    t3(&[0, 2, 1]),
    t3(&[3, 4, 5]),
];

pub const PENTA15_FACES: [FaceDef; 5] = [
    q8(&[0, 1, 4, 3, 6, 13, 9, 12]),
    q8(&[1, 2, 5, 4, 7, 14, 10, 13]),
    q8(&[0, 3, 5, 2, 12, 11, 14, 8]),
    t6(&[0, 2, 1, 8, 7, 6]),
    t6(&[3, 4, 5, 9, 10, 11]),
];

/// Shared by TET4 and TET5; the fifth node of TET5 is interior.
pub const TET4_FACES: [FaceDef; 4] = [
    t3(&[0, 1, 3]),
    t3(&[1, 2, 3]),
    t3(&[2, 0, 3]),
    t3(&[2, 1, 0]),
];

pub const TET10_FACES: [FaceDef; 4] = [
    t6(&[0, 1, 3, 4, 8, 7]),
    t6(&[1, 2, 3, 5, 9, 8]),
    t6(&[2, 0, 3, 6, 7, 9]),
    t6(&[2, 1, 0, 5, 4, 6]),
];

pub const TET15_FACES: [FaceDef; 4] = [
    t7(&[0, 1, 3, 4, 8, 7, 11]),
    t7(&[1, 2, 3, 5, 9, 8, 12]),
    t7(&[2, 0, 3, 6, 7, 9, 13]),
    t7(&[2, 1, 0, 5, 4, 6, 10]),
];

/// Edge nodes come in pairs ordered from the lower to the higher corner:
/// (0,1) 4 5, (1,2) 6 7, (2,0) 8 9, (0,3) 10 11, (1,3) 12 13, (2,3) 14 15;
/// face centers are 16..19.
pub const TET20_FACES: [FaceDef; 4] = [
    t10(&[0, 1, 3, 4, 5, 12, 13, 11, 10, 16]),
    t10(&[1, 2, 3, 6, 7, 14, 15, 13, 12, 17]),
    t10(&[2, 0, 3, 8, 9, 10, 11, 15, 14, 18]),
    t10(&[2, 1, 0, 7, 6, 5, 4, 9, 8, 19]),
];

pub const PYRA5_FACES: [FaceDef; 5] = [
    t3(&[0, 1, 4]),
    t3(&[1, 2, 4]),
    t3(&[2, 3, 4]),
    t3(&[3, 0, 4]),
    q4(&[3, 2, 1, 0]),
];

pub const QUAD4_FACE: [FaceDef; 1] = [q4(&[0, 1, 2, 3])];
pub const QUAD8_FACE: [FaceDef; 1] = [q8(&[0, 1, 2, 3, 4, 5, 6, 7])];
pub const QUAD9_FACE: [FaceDef; 1] = [q9(&[0, 1, 2, 3, 4, 5, 6, 7, 8])];
pub const TRI3_FACE: [FaceDef; 1] = [t3(&[0, 1, 2])];
pub const TRI6_FACE: [FaceDef; 1] = [t6(&[0, 1, 2, 3, 4, 5])];
pub const TRI7_FACE: [FaceDef; 1] = [t7(&[0, 1, 2, 3, 4, 5, 6])];
pub const TRI10_FACE: [FaceDef; 1] = [t10(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9])];

impl ElementKind {
    /// Boundary faces in local order; indexes the element's neighbor table.
    pub const fn faces(self) -> &'static [FaceDef] {
        match self {
            ElementKind::Hex8 => &HEX8_FACES,
            ElementKind::Hex20 => &HEX20_FACES,
            ElementKind::Hex27 => &HEX27_FACES,
            ElementKind::Penta6 => &PENTA6_FACES,
            ElementKind::Penta15 => &PENTA15_FACES,
            ElementKind::Tet4 | ElementKind::Tet5 => &TET4_FACES,
            ElementKind::Tet10 => &TET10_FACES,
            ElementKind::Tet15 => &TET15_FACES,
            ElementKind::Tet20 => &TET20_FACES,
            ElementKind::Pyra5 => &PYRA5_FACES,
            ElementKind::Quad4 => &QUAD4_FACE,
            ElementKind::Quad8 => &QUAD8_FACE,
            ElementKind::Quad9 => &QUAD9_FACE,
            ElementKind::Tri3 => &TRI3_FACE,
            ElementKind::Tri6 => &TRI6_FACE,
            ElementKind::Tri7 => &TRI7_FACE,
            ElementKind::Tri10 => &TRI10_FACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLIDS: [ElementKind; 11] = [
        ElementKind::Hex8,
        ElementKind::Hex20,
        ElementKind::Hex27,
        ElementKind::Penta6,
        ElementKind::Penta15,
        ElementKind::Tet4,
        ElementKind::Tet5,
        ElementKind::Tet10,
        ElementKind::Tet15,
        ElementKind::Tet20,
        ElementKind::Pyra5,
    ];

    #[test]
    fn table_sizes_match_face_shapes() {
        for kind in SOLIDS {
            for face in kind.faces() {
                assert_eq!(face.nodes.len(), face.shape.node_count(), "{:?}", kind);
                assert!(face.nodes.iter().all(|&n| n < kind.node_count()), "{:?}", kind);
            }
        }
    }

    #[test]
    fn every_corner_pair_of_a_solid_face_is_shared_by_exactly_two_faces() {
        for kind in SOLIDS {
            let mut counts = hashbrown::HashMap::new();
            for face in kind.faces() {
                let c = face.shape.corner_count();
                for k in 0..c {
                    let a = face.nodes[k];
                    let b = face.nodes[(k + 1) % c];
                    *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
                }
            }
            assert!(counts.values().all(|&n| n == 2), "{:?}", kind);
        }
    }
}
