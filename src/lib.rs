//! Procedural **surface tessellation** of parametric boundary models and
//! boundary-face rendering of **finite-element meshes**.
//!
//! A [`Topology`](topology::Topology) holds nodes, parametric edges (lines,
//! circular and general arcs, axis arcs, polylines) and bounded faces
//! (polygon, extrude, revolve, revolve-wedge, bilinear quad). Each face is
//! tessellated on its own into a [`MeshBatch`](tessellate::MeshBatch), and the
//! batches are concatenated into a [`RenderMesh`](render_mesh::RenderMesh)
//! whose triangles and line segments carry the id of the face or edge they
//! came from. Faces that fail are reported next to the partial mesh.
//!
//! The [`element`] module renders a discretized [`FeMesh`](element::FeMesh)
//! face by face, culling faces shared with visible neighbors and refining
//! higher-order faces.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to tessellate faces in parallel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod curve;
pub mod element;
pub mod errors;
pub mod float_types;
pub mod object;
pub mod render_mesh;
pub mod tessellate;
pub mod topology;
pub mod traits;
pub mod triangulate;
pub mod triangulated;
pub mod vertex;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{ElementError, TessellationError, TessellationFailure, TopologyError};
pub use object::{ExternalObject, GObject, SurfacePatch};
pub use render_mesh::{RenderMesh, RenderMeshCell};
pub use tessellate::{Tessellation, TessellationOptions};
pub use topology::{IdAllocator, Topology};
pub use traits::GeometricObject;
pub use triangulated::Triangulated3D;
pub use vertex::Vertex;
