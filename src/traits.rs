use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::tessellate::{Tessellation, TessellationOptions, tessellate};
use crate::topology::Topology;
use nalgebra::{Point3, Vector3};

/// Capability interface shared by every geometric object variant.
///
/// An object only has to hand out its boundary topology; tessellation and
/// bounds come for free. Variants backed by an external kernel override
/// [`tessellate`](Self::tessellate) to reuse the kernel's triangulation.
pub trait GeometricObject {
    fn topology(&self) -> &Topology;

    /// Tessellate every face and assemble a fresh render mesh.
    fn tessellate(&self, options: &TessellationOptions) -> Tessellation {
        tessellate(self.topology(), options)
    }

    /// Bounds of the topology nodes. Curved edges may bulge past them.
    fn bounding_box(&self) -> Aabb {
        let nodes = self.topology().nodes();
        if nodes.is_empty() {
            return Aabb::new(Point3::origin(), Point3::origin());
        }
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for node in nodes {
            mins = mins.inf(&node.position);
            maxs = maxs.sup(&node.position);
        }
        Aabb::new(mins, maxs)
    }

    /// Center of [`bounding_box`](Self::bounding_box).
    fn center(&self) -> Point3<Real> {
        let aabb = self.bounding_box();
        Point3::from((aabb.mins.coords + aabb.maxs.coords) * 0.5)
    }

    /// Edge lengths of [`bounding_box`](Self::bounding_box).
    fn extents(&self) -> Vector3<Real> {
        let aabb = self.bounding_box();
        aabb.maxs - aabb.mins
    }
}
