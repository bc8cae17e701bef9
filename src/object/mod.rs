//! Geometric object variants and their cached render meshes.

use crate::element::FeMesh;
use crate::errors::{TessellationError, TessellationFailure, TopologyError};
use crate::float_types::Real;
use crate::render_mesh::{RenderMesh, RenderMeshCell};
use crate::tessellate::{MeshBatch, Tessellation, TessellationOptions, tessellate_face};
use crate::topology::{EdgeId, FaceId, ItemRef, NodeId, PartId, Topology};
use crate::traits::GeometricObject;
use nalgebra::Point3;
use std::sync::Arc;

pub mod shapes;

/// An object described by its own parametric boundary topology.
///
/// The render mesh is a derived cache: every topology edit drops it, and
/// [`update`](GObject::update) rebuilds it in full and swaps it in.
#[derive(Debug, Clone)]
pub struct GObject {
    pub name: String,
    topology: Topology,
    options: TessellationOptions,
    visible: bool,
    render: RenderMeshCell,
    fe_mesh: Option<FeMesh>,
}

impl GeometricObject for GObject {
    fn topology(&self) -> &Topology {
        &self.topology
    }
}

impl GObject {
    pub fn new(name: impl Into<String>, mut topology: Topology) -> Self {
        topology.update_visibility();
        GObject {
            name: name.into(),
            topology,
            options: TessellationOptions::default(),
            visible: true,
            render: RenderMeshCell::new(),
            fe_mesh: None,
        }
    }

    pub fn with_options(mut self, options: TessellationOptions) -> Self {
        self.set_options(options);
        self
    }

    pub const fn options(&self) -> &TessellationOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TessellationOptions) {
        self.options = options.clamped();
        self.render.invalidate();
    }

    /// Mutable access for the editing layer. Drops the cached render mesh.
    pub fn topology_mut(&mut self) -> &mut Topology {
        self.render.invalidate();
        &mut self.topology
    }

    pub fn set_node_position(&mut self, id: NodeId, position: Point3<Real>) -> Result<(), TopologyError> {
        self.topology_mut().set_node_position(id, position)
    }

    /// Rebuild the render mesh off to the side and swap it in.
    ///
    /// Returns the faces (or edges) that failed; the mesh holds everything else.
    pub fn update(&self) -> Vec<TessellationFailure> {
        let Tessellation { mesh, failures } = self.tessellate(&self.options);
        tracing::info!(
            object = %self.name,
            vertices = mesh.vertices.len(),
            triangles = mesh.triangles.len(),
            failures = failures.len(),
            "render mesh rebuilt"
        );
        self.render.replace(mesh);
        failures
    }

    /// Current snapshot, or `None` when hidden or not built yet.
    pub fn render_mesh(&self) -> Option<Arc<RenderMesh>> {
        if !self.visible {
            return None;
        }
        self.render.load()
    }

    /// Current snapshot, building it first if needed. `None` when hidden.
    pub fn ensure_render_mesh(&self) -> Option<Arc<RenderMesh>> {
        if !self.visible {
            return None;
        }
        if !self.render.is_built() {
            self.update();
        }
        self.render.load()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Attach the discretized body. Its element parts index this object's parts.
    pub fn set_fe_mesh(&mut self, mesh: FeMesh) {
        self.fe_mesh = Some(mesh);
        self.sync_elements();
    }

    pub const fn fe_mesh(&self) -> Option<&FeMesh> {
        self.fe_mesh.as_ref()
    }

    pub fn fe_mesh_mut(&mut self) -> Option<&mut FeMesh> {
        self.fe_mesh.as_mut()
    }

    fn sync_elements(&mut self) {
        if let Some(mesh) = self.fe_mesh.as_mut() {
            mesh.update_element_visibility(&self.topology);
        }
    }

    /// Visibility changes are applied at draw time; the mesh stays valid.
    pub fn show_part(&mut self, id: PartId) -> Result<(), TopologyError> {
        self.topology.show_part(id)?;
        self.sync_elements();
        Ok(())
    }

    pub fn hide_part(&mut self, id: PartId) -> Result<(), TopologyError> {
        self.topology.hide_part(id)?;
        self.sync_elements();
        Ok(())
    }

    pub fn show_all_parts(&mut self) {
        self.topology.show_all_parts();
        self.sync_elements();
    }

    /// A face is drawn when the object is shown and the face's parts allow it.
    pub fn is_face_visible(&self, id: FaceId) -> bool {
        self.visible && self.topology.is_face_visible(id)
    }

    pub fn select(&mut self, item: ItemRef) -> Result<(), TopologyError> {
        self.topology.set_selected(item, true)
    }

    pub fn clear_selection(&mut self) {
        self.topology.clear_selection();
    }
}

/// Triangulation of one face handed over by an external CAD kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatch {
    pub face: FaceId,
    pub positions: Vec<Point3<Real>>,
    pub triangles: Vec<[usize; 3]>,
    /// Patch vertices that coincide with topology nodes.
    pub corners: Vec<(usize, NodeId)>,
    /// Polylines through patch vertices tracing the face's edges.
    pub boundary: Vec<(Vec<usize>, EdgeId)>,
}

impl SurfacePatch {
    fn into_batch(self) -> Result<MeshBatch, TessellationError> {
        let n = self.positions.len();
        let out_of_range = self
            .triangles
            .iter()
            .flatten()
            .chain(self.corners.iter().map(|(i, _)| i))
            .chain(self.boundary.iter().flat_map(|(run, _)| run.iter()))
            .find(|&&i| i >= n);
        if let Some(&i) = out_of_range {
            return Err(TessellationError::invalid(format!(
                "patch for face {} refers to vertex {} of {}",
                self.face, i, n
            )));
        }

        let mut batch = MeshBatch::with_capacity(n, self.triangles.len());
        for p in &self.positions {
            batch.push_vertex(*p, None);
        }
        for (i, node) in &self.corners {
            batch.vertices[*i].node = Some(*node);
        }
        for tri in self.triangles {
            batch.push_triangle(tri, self.face);
        }
        for (run, edge) in &self.boundary {
            batch.push_polyline(run, *edge);
        }
        Ok(batch)
    }
}

/// Adapter for objects whose geometry lives in an external CAD kernel.
///
/// The kernel supplies the same boundary topology shape plus a triangulation
/// per face. Faces the kernel did not triangulate fall back to the built-in
/// face tessellators.
#[derive(Debug, Clone)]
pub struct ExternalObject {
    pub name: String,
    topology: Topology,
    patches: Vec<SurfacePatch>,
}

impl ExternalObject {
    pub fn new(name: impl Into<String>, mut topology: Topology, patches: Vec<SurfacePatch>) -> Self {
        topology.update_visibility();
        ExternalObject { name: name.into(), topology, patches }
    }

    pub fn patches(&self) -> &[SurfacePatch] {
        &self.patches
    }
}

impl GeometricObject for ExternalObject {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn tessellate(&self, options: &TessellationOptions) -> Tessellation {
        let mut batches = Vec::with_capacity(self.topology.faces().len());
        let mut failures = Vec::new();

        for face in self.topology.faces() {
            let result = match self.patches.iter().find(|p| p.face == face.id) {
                Some(patch) => patch.clone().into_batch(),
                None => tessellate_face(&self.topology, face.id, options),
            };
            match result {
                Ok(batch) => batches.push(batch),
                Err(error) => {
                    tracing::warn!(object = %self.name, face = %face.id, %error, "external face skipped");
                    failures.push(TessellationFailure { item: ItemRef::Face(face.id), error });
                },
            }
        }

        Tessellation { mesh: RenderMesh::assemble(batches), failures }
    }
}
