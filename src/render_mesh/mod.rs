//! `RenderMesh`: the display/picking mesh assembled from local face batches.

use crate::float_types::{
    EPSILON, Real,
    parry3d::{
        bounding_volume::Aabb,
        query::{Ray, RayCast},
        shape::Triangle,
    },
};
use crate::tessellate::MeshBatch;
use crate::topology::{EdgeId, FaceId, NodeId, Topology};
use crate::triangulated::Triangulated3D;
use crate::vertex::Vertex;
use nalgebra::{Isometry3, Point3, Vector3};
use std::ops::Range;
use std::sync::OnceLock;

mod handle;

pub use handle::RenderMeshCell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTriangle {
    pub indices: [usize; 3],
    pub face: FaceId,
    /// Flat normal by the right-hand rule, zero for a degenerate triangle.
    pub normal: Vector3<Real>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderEdge {
    pub indices: [usize; 2],
    pub edge: EdgeId,
}

/// A contiguous run `[start, start + count)` of primitives sharing one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<I> {
    pub id: I,
    pub start: usize,
    pub count: usize,
}

impl<I> Partition<I> {
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Result of [`RenderMesh::pick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub face: FaceId,
    pub triangle: usize,
    pub point: Point3<Real>,
    pub distance: Real,
    /// Corner node close enough to the hit point, if any.
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    /// Positions and averaged vertex normals.
    pub vertices: Vec<Vertex>,
    /// Originating node of each vertex; `None` for sampled interior points.
    pub node_tags: Vec<Option<NodeId>>,
    /// Sorted by face id.
    pub triangles: Vec<RenderTriangle>,
    /// Sorted by edge id.
    pub edges: Vec<RenderEdge>,
    face_partitions: Vec<Partition<FaceId>>,
    edge_partitions: Vec<Partition<EdgeId>>,
    bounding_box: OnceLock<Aabb>,
}

/// Unit normal of a wound triangle, or zero when it has no area.
pub fn triangle_normal(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Vector3<Real> {
    let n = (b - a).cross(&(c - a));
    let len2 = n.norm_squared();
    if len2 <= EPSILON { Vector3::zeros() } else { n / len2.sqrt() }
}

/// Group a slice already sorted by key into contiguous partitions.
fn partitions<T, I: Copy + PartialEq>(items: &[T], key: impl Fn(&T) -> I) -> Vec<Partition<I>> {
    let mut out: Vec<Partition<I>> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let id = key(item);
        match out.last_mut() {
            Some(last) if last.id == id => last.count += 1,
            _ => out.push(Partition { id, start: i, count: 1 }),
        }
    }
    out
}

impl RenderMesh {
    /// Concatenate local batches into one mesh.
    ///
    /// Every batch keeps its own vertices: boundary samples shared by two faces
    /// are *not* merged, so normals stay flat-per-face across seams. After the
    /// offset remap the assembler computes flat triangle normals, unweighted
    /// averaged vertex normals, and the face/edge partition index.
    pub fn assemble(batches: impl IntoIterator<Item = MeshBatch>) -> RenderMesh {
        let mut positions: Vec<Point3<Real>> = Vec::new();
        let mut node_tags = Vec::new();
        let mut triangles: Vec<RenderTriangle> = Vec::new();
        let mut edges: Vec<RenderEdge> = Vec::new();

        for batch in batches {
            let offset = positions.len();
            for v in &batch.vertices {
                positions.push(v.pos);
                node_tags.push(v.node);
            }
            for t in &batch.triangles {
                let indices = t.indices.map(|i| i + offset);
                let normal = triangle_normal(&positions[indices[0]], &positions[indices[1]], &positions[indices[2]]);
                triangles.push(RenderTriangle { indices, face: t.face, normal });
            }
            for s in &batch.segments {
                edges.push(RenderEdge { indices: s.indices.map(|i| i + offset), edge: s.edge });
            }
        }

        // unweighted average of the adjacent flat normals
        let mut sums = vec![Vector3::<Real>::zeros(); positions.len()];
        for t in &triangles {
            for &i in &t.indices {
                sums[i] += t.normal;
            }
        }
        let vertices = positions
            .iter()
            .zip(sums)
            .map(|(pos, sum)| {
                let len2 = sum.norm_squared();
                let normal = if len2 <= EPSILON { Vector3::zeros() } else { sum / len2.sqrt() };
                Vertex::new(*pos, normal)
            })
            .collect();

        // stable, so triangles of one face keep their emission order
        triangles.sort_by_key(|t| t.face);
        edges.sort_by_key(|e| e.edge);
        let face_partitions = partitions(&triangles, |t| t.face);
        let edge_partitions = partitions(&edges, |e| e.edge);

        RenderMesh {
            vertices,
            node_tags,
            triangles,
            edges,
            face_partitions,
            edge_partitions,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn face_partitions(&self) -> &[Partition<FaceId>] {
        &self.face_partitions
    }

    pub fn edge_partitions(&self) -> &[Partition<EdgeId>] {
        &self.edge_partitions
    }

    /// Range of triangles tagged `face`.
    pub fn face_range(&self, face: FaceId) -> Option<Range<usize>> {
        self.face_partitions
            .binary_search_by_key(&face, |p| p.id)
            .ok()
            .map(|slot| self.face_partitions[slot].range())
    }

    /// Range of edge segments tagged `edge`.
    pub fn edge_range(&self, edge: EdgeId) -> Option<Range<usize>> {
        self.edge_partitions
            .binary_search_by_key(&edge, |p| p.id)
            .ok()
            .map(|slot| self.edge_partitions[slot].range())
    }

    pub fn triangles_of_face(&self, face: FaceId) -> &[RenderTriangle] {
        match self.face_range(face) {
            Some(range) => &self.triangles[range],
            None => &[],
        }
    }

    pub fn edges_of_edge(&self, edge: EdgeId) -> &[RenderEdge] {
        match self.edge_range(edge) {
            Some(range) => &self.edges[range],
            None => &[],
        }
    }

    /// Triangles of the faces the topology currently reports visible.
    pub fn visible_triangles<'a>(&'a self, topology: &'a Topology) -> impl Iterator<Item = &'a RenderTriangle> + 'a {
        self.face_partitions
            .iter()
            .filter(move |p| topology.is_face_visible(p.id))
            .flat_map(move |p| self.triangles[p.range()].iter())
    }

    /// Vertices that sit on a topology node.
    pub fn node_vertices(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.node_tags
            .iter()
            .enumerate()
            .filter_map(|(i, tag)| tag.map(|node| (i, node)))
    }

    /// Flat `[x, y, z, ...]` positions for upload.
    pub fn vertex_buffer(&self) -> Vec<Real> {
        self.vertices.iter().flat_map(|v| [v.pos.x, v.pos.y, v.pos.z]).collect()
    }

    /// Flat `[nx, ny, nz, ...]` vertex normals for upload.
    pub fn normal_buffer(&self) -> Vec<Real> {
        self.vertices.iter().flat_map(|v| [v.normal.x, v.normal.y, v.normal.z]).collect()
    }

    /// Triangle indices, three per triangle, in partition order.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|t| t.indices.map(|i| i as u32))
            .collect()
    }

    /// Returns an [`Aabb`] enclosing every vertex. Computed once per mesh.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            if self.vertices.is_empty() {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Closest triangle hit by the ray `origin + t·direction`, `t ≥ 0`.
    ///
    /// When the hit point lies within `snap_radius` of a tagged corner of the
    /// hit triangle, that node is reported as well.
    pub fn pick(&self, origin: &Point3<Real>, direction: &Vector3<Real>, snap_radius: Real) -> Option<PickHit> {
        self.pick_where(origin, direction, snap_radius, |_| true)
    }

    /// Like [`pick`](Self::pick), restricted to faces visible in `topology`.
    pub fn pick_visible(
        &self,
        topology: &Topology,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
        snap_radius: Real,
    ) -> Option<PickHit> {
        self.pick_where(origin, direction, snap_radius, |face| topology.is_face_visible(face))
    }

    fn pick_where(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
        snap_radius: Real,
        accept: impl Fn(FaceId) -> bool,
    ) -> Option<PickHit> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity();

        let mut best: Option<(usize, Real)> = None;
        for (i, tri) in self.triangles.iter().enumerate() {
            if !accept(tri.face) || tri.normal == Vector3::zeros() {
                continue;
            }
            let [a, b, c] = tri.indices.map(|k| self.vertices[k].pos);
            if let Some(hit) = Triangle::new(a, b, c).cast_ray_and_get_normal(&iso, &ray, Real::MAX, true) {
                if best.is_none_or(|(_, toi)| hit.time_of_impact < toi) {
                    best = Some((i, hit.time_of_impact));
                }
            }
        }

        let (triangle, toi) = best?;
        let tri = &self.triangles[triangle];
        let point = ray.point_at(toi);
        let node = tri
            .indices
            .iter()
            .filter_map(|&k| self.node_tags[k].map(|node| (node, (self.vertices[k].pos - point).norm())))
            .filter(|&(_, d)| d <= snap_radius)
            .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(node, _)| node);

        Some(PickHit {
            face: tri.face,
            triangle,
            point,
            distance: toi * direction.norm(),
            node,
        })
    }
}

impl Triangulated3D for RenderMesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for tri in &self.triangles {
            f(tri.indices.map(|i| self.vertices[i]));
        }
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
