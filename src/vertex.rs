//! Position + normal pairs handed to the display layer.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// A render vertex, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in object space
    /// * `normal` – unit normal, or zero for a degenerate facet; it is
    ///              **copied verbatim**
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }
}
