use crate::{
    canonical::{tri_to_canonical, Canonicalizer},
    element::{Handle, EH, VH},
    error::{Error, InvariantViolation},
    topol::Mesh,
};

/// A sequence of flips that turns one triangulation into another.
///
/// The first part of the path brings the source to its canonical form. The
/// second part leads from there to the target, with edges expressed as edge
/// indices of the source's canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipPath {
    flips: Vec<EH>,
    split: usize,
    vertex_map: Vec<VH>,
}

impl FlipPath {
    pub fn flips(&self) -> &[EH] {
        &self.flips
    }

    pub fn len(&self) -> usize {
        self.flips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flips.is_empty()
    }

    /// Number of flips that bring the source to its canonical form.
    pub fn split(&self) -> usize {
        self.split
    }

    pub fn to_canonical(&self) -> &[EH] {
        &self.flips[..self.split]
    }

    pub fn from_canonical(&self) -> &[EH] {
        &self.flips[self.split..]
    }

    /// For each vertex of the target, the vertex of the source that plays its
    /// role after the path is applied.
    pub fn vertex_map(&self) -> &[VH] {
        &self.vertex_map
    }

    /// The source vertex playing the role of the target vertex `v`, or `None`
    /// if `v` is not a vertex of the target.
    pub fn map_vertex(&self, v: VH) -> Option<VH> {
        self.vertex_map.get(v.index() as usize).copied()
    }

    pub fn into_flips(self) -> Vec<EH> {
        self.flips
    }
}

/// Vertices of a double wheel in a canonical order: the two anchors, then the
/// path of remaining vertices starting at the third vertex of the outer face.
fn wheel_order(mesh: &Mesh) -> Result<Vec<VH>, Error> {
    let boundary = mesh.boundary_vertices()?;
    let (a, b) = (boundary[0], boundary[1]);
    let nverts = mesh.num_vertices();
    let mut visited = vec![false; nverts];
    let mut order = Vec::with_capacity(nverts);
    for v in [a, b] {
        visited[v.index() as usize] = true;
        order.push(v);
    }
    let mut current = boundary.get(2).copied();
    while let Some(v) = current {
        visited[v.index() as usize] = true;
        order.push(v);
        current = mesh
            .neighbors(v)?
            .into_iter()
            .find(|n| !visited[n.index() as usize]);
    }
    if order.len() != nverts {
        return Err(InvariantViolation::MalformedCanonicalForm(a).into());
    }
    Ok(order)
}

/// Compute a sequence of flips that turns `a` into `b`.
///
/// Both inputs are left untouched. Each is brought to its canonical form on a
/// copy, the two canonical forms are matched vertex by vertex, and the flips
/// that brought `b` to its canonical form are replayed backwards on `a`'s
/// canonical form. Applying the result to a copy of `a` gives a triangulation
/// isomorphic to `b` under [`FlipPath::vertex_map`].
pub fn calculate_flip_path(a: &Mesh, b: &Mesh) -> Result<FlipPath, Error> {
    if a.num_vertices() != b.num_vertices() {
        return Err(Error::MismatchedVertexCount(
            a.num_vertices(),
            b.num_vertices(),
        ));
    }
    let mut canon_a = a.duplicate();
    let mut flips = tri_to_canonical(&mut canon_a)?;
    let split = flips.len();
    let mut canon_b = b.duplicate();
    let path_b = tri_to_canonical(&mut canon_b)?;
    let order_a = wheel_order(&canon_a)?;
    let order_b = wheel_order(&canon_b)?;
    let mut vertex_map = vec![VH::from(0); b.num_vertices()];
    for (va, vb) in order_a.iter().zip(order_b.iter()) {
        vertex_map[vb.index() as usize] = *va;
    }
    // Walk both canonical forms back in lockstep, so each flip of `b` can be
    // located in `a` by its end points.
    flips.reserve(path_b.len());
    for &eb in path_b.iter().rev() {
        let (u, w) = canon_b.edge_vertices(eb);
        let (mu, mw) = (
            vertex_map[u.index() as usize],
            vertex_map[w.index() as usize],
        );
        let ea = canon_a
            .find_halfedge(mu, mw)
            .ok_or(InvariantViolation::MalformedCanonicalForm(mu))?
            .edge();
        canon_a.flip_edge(ea)?;
        canon_b.flip_edge(eb)?;
        flips.push(ea);
    }
    tracing::debug!(
        "Flip path of {} flips: {} to canonical form, {} back out",
        flips.len(),
        split,
        path_b.len()
    );
    Ok(FlipPath {
        flips,
        split,
        vertex_map,
    })
}

/// Flip the given edges in order.
pub fn apply_path(mesh: &mut Mesh, flips: &[EH]) -> Result<(), Error> {
    for &e in flips {
        mesh.flip_edge(e)?;
    }
    Ok(())
}

/// Flip the given edges in reverse order, undoing [`apply_path`].
pub fn undo_path(mesh: &mut Mesh, flips: &[EH]) -> Result<(), Error> {
    for &e in flips.iter().rev() {
        mesh.flip_edge(e)?;
    }
    Ok(())
}

/// The anchors used for `mesh` by [`calculate_flip_path`].
pub fn path_anchors(mesh: &Mesh) -> Result<(VH, VH), Error> {
    let canon = Canonicalizer::new(mesh, Default::default())?;
    Ok((canon.primary_anchor(), canon.secondary_anchor()))
}

#[cfg(test)]
mod test {
    use crate::{
        canonical::tri_to_canonical,
        element::{Handle, EH, VH},
        error::{Error, InvalidFlip},
        topol::Mesh,
    };

    use super::{apply_path, calculate_flip_path, path_anchors, undo_path};

    fn mapped_edge_set(mesh: &Mesh, map: &[VH]) -> Vec<(u32, u32)> {
        let mut out: Vec<_> = mesh
            .edge_set()
            .into_iter()
            .map(|(u, v)| {
                let (u, v) = (map[u as usize].index(), map[v as usize].index());
                if u < v { (u, v) } else { (v, u) }
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn t_path_between_stacked() {
        let a = Mesh::stacked(&[0, 1, 2, 3, 4, 5]).expect("Cannot create stacked triangulation");
        let b = Mesh::stacked(&[6, 6, 1, 0, 9, 2]).expect("Cannot create stacked triangulation");
        let path = calculate_flip_path(&a, &b).expect("Cannot compute flip path");
        let len_a = tri_to_canonical(&mut a.duplicate())
            .expect("Cannot canonicalize")
            .len();
        let len_b = tri_to_canonical(&mut b.duplicate())
            .expect("Cannot canonicalize")
            .len();
        assert_eq!(path.len(), len_a + len_b);
        assert_eq!(path.split(), len_a);
        assert_eq!(path.to_canonical().len() + path.from_canonical().len(), path.len());
        let mut mesh = a.duplicate();
        for &e in path.flips() {
            assert!(!mesh.is_boundary_edge(e));
            mesh.flip_edge(e).expect("Cannot flip edge");
        }
        mesh.check().expect("Topology check failed");
        assert_eq!(mesh.edge_set(), mapped_edge_set(&b, path.vertex_map()));
    }

    #[test]
    fn t_vertex_map_is_permutation() {
        let a = Mesh::stacked(&[3, 1, 4, 1, 5]).expect("Cannot create stacked triangulation");
        let b = Mesh::stacked(&[2, 7, 1, 8, 2]).expect("Cannot create stacked triangulation");
        let path = calculate_flip_path(&a, &b).expect("Cannot compute flip path");
        let mut seen: Vec<u32> = path.vertex_map().iter().map(|v| v.index()).collect();
        seen.sort();
        assert_eq!(seen, (0..a.num_vertices() as u32).collect::<Vec<_>>());
        let (pa, sa) = path_anchors(&a).expect("Cannot read anchors");
        let (pb, sb) = path_anchors(&b).expect("Cannot read anchors");
        assert_eq!(path.map_vertex(pb), Some(pa));
        assert_eq!(path.map_vertex(sb), Some(sa));
        assert_eq!(path.map_vertex(VH::from(a.num_vertices() as u32)), None);
    }

    #[test]
    fn t_self_path_round_trip() {
        let a = Mesh::stacked(&[1, 1, 2, 3, 5, 8, 13]).expect("Cannot create stacked triangulation");
        let path = calculate_flip_path(&a, &a).expect("Cannot compute flip path");
        assert_eq!(path.len() % 2, 0);
        let mut mesh = a.duplicate();
        apply_path(&mut mesh, path.flips()).expect("Cannot apply path");
        assert_eq!(mesh.edge_set(), mapped_edge_set(&a, path.vertex_map()));
        undo_path(&mut mesh, path.flips()).expect("Cannot undo path");
        mesh.check().expect("Topology check failed");
        assert_eq!(mesh.edge_set(), a.edge_set());
    }

    #[test]
    fn t_canonical_inputs() {
        let a = Mesh::tetrahedron().expect("Cannot create tetrahedron");
        let path = calculate_flip_path(&a, &a).expect("Cannot compute flip path");
        assert!(path.is_empty());
        assert_eq!(path.split(), 0);
    }

    #[test]
    fn t_mismatched_vertex_count() {
        let a = Mesh::tetrahedron().expect("Cannot create tetrahedron");
        let b = Mesh::octahedron().expect("Cannot create octahedron");
        assert!(matches!(
            calculate_flip_path(&a, &b),
            Err(Error::MismatchedVertexCount(4, 6))
        ));
    }

    #[test]
    fn t_apply_foreign_path() {
        let mut mesh = Mesh::tetrahedron().expect("Cannot create tetrahedron");
        let before = mesh.clone();
        assert!(matches!(
            apply_path(&mut mesh, &[EH::from(100)]),
            Err(Error::InvalidFlip(InvalidFlip::InvalidEdge(e))) if e.index() == 100
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_inputs_untouched() {
        let a = Mesh::octahedron().expect("Cannot create octahedron");
        let b = Mesh::stacked(&[0, 0]).expect("Cannot create stacked triangulation");
        let (ca, cb) = (a.clone(), b.clone());
        let path = calculate_flip_path(&a, &b).expect("Cannot compute flip path");
        assert_eq!(a, ca);
        assert_eq!(b, cb);
        let mut mesh = a.duplicate();
        apply_path(&mut mesh, path.flips()).expect("Cannot apply path");
        assert_eq!(mesh.edge_set(), mapped_edge_set(&b, path.vertex_map()));
    }
}
