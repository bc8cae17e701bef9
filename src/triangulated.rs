/// A trait for any render output which can be represented by triangles
use crate::vertex::Vertex;

/// A triangulated 3D surface.
///
/// Both the parametric render mesh and the element facet buffer present
/// themselves this way, so exporters and pickers only need one path.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]` with positions+normals, wound so that the
    /// right-hand rule points outward.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);

    /// Number of triangles `visit_triangles` would produce.
    fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.visit_triangles(|_| count += 1);
        count
    }
}
