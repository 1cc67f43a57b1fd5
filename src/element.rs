use crate::{iterator, topol::Mesh};
use std::fmt::{Debug, Display};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VH {
    idx: u32,
}

/**
 * Halfedge handle. The two halfedges of edge `e` are `2e` and `2e + 1`.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HH {
    idx: u32,
}

/**
 * Edge handle. Flips rewrite an edge in place, so the handle of a flipped
 * edge stays valid.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EH {
    idx: u32,
}

/**
 * Face handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FH {
    idx: u32,
}

macro_rules! impl_handle {
    ($type:ident, $name:literal) => {
        impl Handle for $type {
            fn index(&self) -> u32 {
                self.idx
            }
        }

        impl From<u32> for $type {
            fn from(idx: u32) -> Self {
                $type { idx }
            }
        }

        impl From<&u32> for $type {
            fn from(idx: &u32) -> Self {
                $type { idx: *idx }
            }
        }

        impl From<&mut u32> for $type {
            fn from(idx: &mut u32) -> Self {
                $type { idx: *idx }
            }
        }

        impl Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $name, self.idx)
            }
        }

        impl Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $name, self.idx)
            }
        }
    };
}

impl_handle!(VH, "VH");
impl_handle!(HH, "HH");
impl_handle!(EH, "EH");
impl_handle!(FH, "FH");

impl VH {
    pub fn halfedge(self, mesh: &Mesh) -> Option<HH> {
        mesh.vertex_halfedge(self)
    }

    /// Check if this vertex is valid for the `mesh`.
    ///
    /// The index has to be less than the number of vertices in the mesh.
    pub fn is_valid(self, mesh: &Mesh) -> bool {
        mesh.is_valid_vertex(self)
    }

    /// Check if this vertex is on the outer face of the `mesh`.
    pub fn is_boundary(self, mesh: &Mesh) -> bool {
        mesh.is_boundary_vertex(self)
    }

    /// The number of edges incident on this vertex.
    pub fn valence(self, mesh: &Mesh) -> usize {
        iterator::voh_ccw_iter(mesh, self).count()
    }
}

impl HH {
    /// The vertex this halfedge points away from.
    pub fn tail(self, mesh: &Mesh) -> VH {
        mesh.origin(self)
    }

    /// The vertex this halfedge points towards.
    pub fn head(self, mesh: &Mesh) -> VH {
        mesh.head(self)
    }

    pub fn opposite(self) -> HH {
        (self.idx ^ 1).into()
    }

    pub fn edge(self) -> EH {
        (self.idx >> 1).into()
    }

    pub fn prev(self, mesh: &Mesh) -> HH {
        mesh.prev_halfedge(self)
    }

    pub fn next(self, mesh: &Mesh) -> HH {
        mesh.next_halfedge(self)
    }

    pub fn face(self, mesh: &Mesh) -> FH {
        mesh.halfedge_face(self)
    }

    /// Rotate to the next outgoing halfedge around the tail vertex.
    pub fn rotate(self, mesh: &Mesh) -> HH {
        mesh.cw_rotated_halfedge(self)
    }

    /// Check if this halfedge is valid for the `mesh`.
    ///
    /// The index has to be less than the number of halfedges in the mesh.
    pub fn is_valid(self, mesh: &Mesh) -> bool {
        mesh.is_valid_halfedge(self)
    }

    /// Check if this halfedge lies on the outer face of `mesh`.
    pub fn is_boundary(self, mesh: &Mesh) -> bool {
        mesh.is_boundary_halfedge(self)
    }
}

impl EH {
    pub fn halfedges(self) -> (HH, HH) {
        let hi = self.idx << 1;
        (hi.into(), (hi | 1).into())
    }

    pub fn halfedge(self, flag: bool) -> HH {
        ((self.idx << 1) | if flag { 1 } else { 0 }).into()
    }

    /// Check if this edge is valid for the `mesh`.
    pub fn is_valid(self, mesh: &Mesh) -> bool {
        mesh.is_valid_edge(self)
    }

    /// Check if the edge is a boundary edge.
    ///
    /// An edge is on the boundary if either of its halfedges lies on the outer
    /// face. Boundary edges cannot be flipped.
    pub fn is_boundary(self, mesh: &Mesh) -> bool {
        mesh.is_boundary_edge(self)
    }
}

impl FH {
    pub fn halfedge(self, mesh: &Mesh) -> HH {
        mesh.face_halfedge(self)
    }

    /// Check if this face is valid for the `mesh`.
    pub fn is_valid(self, mesh: &Mesh) -> bool {
        mesh.is_valid_face(self)
    }

    /// Check if this is the designated outer face of `mesh`.
    pub fn is_outer(self, mesh: &Mesh) -> bool {
        mesh.outer_face() == self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Vertex {
    pub(crate) halfedge: Option<HH>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Halfedge {
    pub(crate) face: FH,
    pub(crate) origin: VH,
    pub(crate) next: HH,
    pub(crate) prev: HH,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) halfedges: [Halfedge; 2],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Face {
    pub(crate) halfedge: HH,
}
