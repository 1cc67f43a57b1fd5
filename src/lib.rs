/*!
This is a halfedge based library for flipping edges of triangulations of the
sphere, reducing them to a canonical form, and finding sequences of flips that
turn one triangulation into another.

# Overview

+ A halfedge datastructure ([`Mesh`]) represents the topology of a
  triangulation, i.e. the connectivity of vertices, edges and faces. Elements
  are referred to by their indices ([`VH`], [`HH`], [`EH`], [`FH`]). Every
  halfedge has a face, and one face is designated as the outer face. Edges
  touching the outer face are boundary edges and are never flipped.

+ [`Mesh::flip_edge`] replaces the diagonal of the quadrilateral formed by the
  two triangles sharing an edge. The edge keeps its index, so a sequence of
  flipped edges recorded on one mesh can be replayed on any copy of it.

+ [`tri_to_canonical`] flips a triangulation with a triangular outer face
  `(a, b, c)` until `a`, and by default also `b`, is adjacent to every other
  vertex. The flipped edges are returned in order.

+ [`calculate_flip_path`] brings two triangulations with the same number of
  vertices to their canonical forms and joins the two paths, giving a
  sequence of flips from one to the other.

+ Meshes are built from face lists with [`Mesh::from_polygons`] and
  [`Mesh::from_disk`], generated with the primitives in this crate, or loaded
  from OBJ files when the `obj` feature is enabled.
*/

mod check;
mod edit;
mod element;
mod error;
mod iterator;
mod primitive;
mod topol;

pub mod canonical;
pub mod path;

#[cfg(feature = "obj")]
mod obj;

pub use canonical::{
    is_canonical, is_canonical_with, is_double_canonical, tri_to_canonical,
    tri_to_canonical_with, CanonicalConfig, Canonicalizer, PhaseStats,
};
pub use element::{Handle, EH, FH, HH, VH};
pub use error::{DegenerateMesh, Error, InvalidFlip, InvariantViolation};
pub use path::{apply_path, calculate_flip_path, path_anchors, undo_path, FlipPath};
pub use topol::Mesh;
