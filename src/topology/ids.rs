//! Typed identifiers and the allocator that hands them out.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Stable identifier of a topology node.
    NodeId,
    "N"
);
define_id!(
    /// Stable identifier of a parametric edge.
    EdgeId,
    "E"
);
define_id!(
    /// Stable identifier of a bounded face. Also the tag carried by every render triangle.
    FaceId,
    "F"
);
define_id!(
    /// Stable identifier of a part (a named grouping of faces).
    PartId,
    "P"
);

/// Hands out unique ids per entity kind.
///
/// One allocator is owned by the session/document and passed by `&mut` to every
/// builder, so ids stay unique across all objects built from it. Tests create a
/// fresh allocator (or call [`IdAllocator::reset`]) to get deterministic numbering.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_node: u32,
    next_edge: u32,
    next_face: u32,
    next_part: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Ids start at 1 so that 0 never shows up as a valid id in dumps.
    pub const fn new() -> Self {
        IdAllocator { next_node: 1, next_edge: 1, next_face: 1, next_part: 1 }
    }

    pub fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn edge(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        id
    }

    pub fn face(&mut self) -> FaceId {
        let id = FaceId(self.next_face);
        self.next_face += 1;
        id
    }

    pub fn part(&mut self) -> PartId {
        let id = PartId(self.next_part);
        self.next_part += 1;
        id
    }

    /// Restart every counter at 1.
    pub fn reset(&mut self) {
        *self = IdAllocator::new();
    }
}
