use thiserror::Error;

use crate::element::{EH, FH, HH, VH};

/// Reasons a mesh is too small or too irregular to canonicalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DegenerateMesh {
    #[error("the outer face has {0} vertices, at least 2 are required")]
    TooFewBoundaryVertices(usize),
    #[error("the mesh has {0} vertices, at least 4 are required")]
    TooFewVertices(usize),
    #[error("the outer face has {0} vertices, it must be a triangle")]
    NonTriangularOuterFace(usize),
}

/// Reasons an edge cannot be flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidFlip {
    #[error("{0} is not an edge of the mesh")]
    InvalidEdge(EH),
    #[error("{0} lies on the outer face")]
    BoundaryEdge(EH),
    #[error("both sides of {0} belong to the same face")]
    SameFace(EH),
    #[error("{0} is not a triangle")]
    NonTriangularFace(FH),
    #[error("flipping {edge} would duplicate the edge between {from} and {to}")]
    DuplicateEdge { edge: EH, from: VH, to: VH },
}

/// A corrupted mesh or a defect in an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no flippable edge makes progress towards {anchor}, {remaining} vertices remain")]
    NoProgressingEdge { anchor: VH, remaining: usize },
    #[error("canonicalization around {anchor} exceeded {limit} iterations")]
    IterationLimit { anchor: VH, limit: usize },
    #[error("the rotation around {0} does not close")]
    OpenVertexRing(VH),
    #[error("{0} is not a valid halfedge")]
    InvalidHalfedge(HH),
    #[error("{0} starts and ends at the same vertex")]
    DegenerateHalfedge(HH),
    #[error("the next / prev links of {0} are inconsistent")]
    InvalidHalfedgeLink(HH),
    #[error("the loop through {0} is not a simple cycle")]
    InvalidLoopTopology(HH),
    #[error("{0} does not share the face of its loop")]
    InconsistentFaceInLoop(HH),
    #[error("the outgoing halfedges of {0} are inconsistent")]
    InvalidOutgoingHalfedges(VH),
    #[error("{0} refers to {1}, which does not belong to it")]
    InvalidFaceHalfedgeLink(FH, HH),
    #[error("inner face {0} is not a triangle")]
    NonTriangularFace(FH),
    #[error("Euler characteristic is {0}, expected 2")]
    EulerCharacteristic(i64),
    #[error("the canonical form around {0} is malformed")]
    MalformedCanonicalForm(VH),
}

#[derive(Debug, Error)]
pub enum Error {
    // Construction.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex { face: usize, vertex: u32 },
    #[error("face {0} has fewer than 3 vertices or repeats a vertex")]
    DegenerateFace(usize),
    #[error("the halfedge from {0} to {1} is used by more than one face")]
    ComplexHalfedge(VH, VH),
    #[error("{0} has no incident faces")]
    IsolatedVertex(VH),
    #[error("the mesh has {0} unmatched halfedges but is required to be closed")]
    OpenMesh(usize),
    #[error("the boundary of the mesh is not a single loop")]
    MultipleBoundaryLoops,
    #[error("outer face index {0} is out of range")]
    InvalidOuterFace(usize),
    // Algorithms.
    #[error("degenerate mesh: {0}")]
    Degenerate(#[from] DegenerateMesh),
    #[error("invalid flip: {0}")]
    InvalidFlip(#[from] InvalidFlip),
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),
    #[error("triangulations have {0} and {1} vertices")]
    MismatchedVertexCount(usize, usize),
    // Obj.
    #[error("failed to load obj: {0}")]
    ObjLoadFailed(String),
}
