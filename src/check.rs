use crate::{
    element::{Handle, HH},
    error::{Error, InvariantViolation},
    topol::Mesh,
};

/// Links between halfedges must be valid and mutually consistent. Once this
/// holds, `next` is a permutation with `prev` as its inverse, so every loop and
/// vertex circulation terminates.
fn check_halfedges(mesh: &Mesh) -> Result<(), Error> {
    for h in mesh.halfedges() {
        let hedge = mesh.halfedge(h);
        if !mesh.is_valid_halfedge(hedge.next) || !mesh.is_valid_halfedge(hedge.prev) {
            return Err(InvariantViolation::InvalidHalfedge(h).into());
        }
        if !mesh.is_valid_vertex(hedge.origin) {
            return Err(InvariantViolation::InvalidHalfedge(h).into());
        }
        if !mesh.is_valid_face(hedge.face) {
            return Err(InvariantViolation::InconsistentFaceInLoop(h).into());
        }
        if h.tail(mesh) == h.head(mesh) {
            return Err(InvariantViolation::DegenerateHalfedge(h).into());
        }
    }
    for h in mesh.halfedges() {
        let hedge = mesh.halfedge(h);
        if hedge.prev.next(mesh) != h
            || hedge.next.prev(mesh) != h
            || h.head(mesh) != hedge.next.tail(mesh)
        {
            return Err(InvariantViolation::InvalidHalfedgeLink(h).into());
        }
    }
    Ok(())
}

/// Each vertex must see all of its outgoing halfedges in one circulation.
fn check_vertices(mesh: &Mesh, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    for v in mesh.vertices() {
        let h = v
            .halfedge(mesh)
            .ok_or(InvariantViolation::InvalidOutgoingHalfedges(v))?;
        if !h.is_valid(mesh) {
            return Err(InvariantViolation::InvalidHalfedge(h).into());
        }
        for h in mesh.voh_ccw_iter(v) {
            if h.tail(mesh) != v || std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(InvariantViolation::InvalidOutgoingHalfedges(v).into());
            }
        }
        if mesh.voh_cw_iter(v).count() != mesh.voh_ccw_iter(v).count() {
            return Err(InvariantViolation::InvalidOutgoingHalfedges(v).into());
        }
    }
    // A halfedge missed by the circulation of its tail means the tail has more
    // than one fan of faces.
    match mesh.halfedges().find(|h| !hvisited[h.index() as usize]) {
        Some(h) => Err(InvariantViolation::InvalidOutgoingHalfedges(h.tail(mesh)).into()),
        None => Ok(()),
    }
}

/// Each face owns exactly one loop, and every inner face is a triangle.
fn check_faces(mesh: &Mesh, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    if !mesh.is_valid_face(mesh.outer_face()) {
        return Err(InvariantViolation::InvalidFaceHalfedgeLink(
            mesh.outer_face(),
            HH::from(u32::MAX),
        )
        .into());
    }
    for f in mesh.faces() {
        let h = f.halfedge(mesh);
        if !h.is_valid(mesh) || h.face(mesh) != f {
            return Err(InvariantViolation::InvalidFaceHalfedgeLink(f, h).into());
        }
        let mut valence = 0usize;
        for h in mesh.loop_ccw_iter(h) {
            if h.face(mesh) != f {
                return Err(InvariantViolation::InconsistentFaceInLoop(h).into());
            }
            hvisited[h.index() as usize] = true;
            valence += 1;
        }
        if valence < 3 || (valence != 3 && !f.is_outer(mesh)) {
            return Err(InvariantViolation::NonTriangularFace(f).into());
        }
    }
    match mesh.halfedges().find(|h| !hvisited[h.index() as usize]) {
        Some(h) => Err(InvariantViolation::InvalidLoopTopology(h).into()),
        None => Ok(()),
    }
}

fn check_edges(mesh: &Mesh) -> Result<(), Error> {
    let edges = mesh.edge_set();
    match edges.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(Error::ComplexHalfedge(pair[0].0.into(), pair[0].1.into())),
        None => Ok(()),
    }
}

fn check_euler(mesh: &Mesh) -> Result<(), Error> {
    let chi = mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
    if chi != 2 {
        return Err(InvariantViolation::EulerCharacteristic(chi).into());
    }
    Ok(())
}

impl Mesh {
    /// Check the topology of the mesh.
    ///
    /// Returns an error describing the first inconsistency found. A mesh that
    /// passes is a simple triangulated sphere whose outer face may be any
    /// polygon.
    pub fn check(&self) -> Result<(), Error> {
        check_halfedges(self)?;
        // To keep track of visited halfedges.
        let mut hvisited = vec![false; self.num_halfedges()].into_boxed_slice();
        check_vertices(self, &mut hvisited)?;
        check_faces(self, &mut hvisited)?;
        check_edges(self)?;
        check_euler(self)?;
        Ok(())
    }
}
