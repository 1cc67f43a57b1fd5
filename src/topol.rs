use std::collections::HashMap;

use crate::{
    element::{Edge, Face, Halfedge, Handle, Vertex, EH, FH, HH, VH},
    error::{DegenerateMesh, Error, InvariantViolation},
    iterator,
};

/// Halfedge mesh of a triangulated sphere with one designated outer face.
///
/// Vertices, edges and faces are stored in flat arrays and referred to by
/// index. Both halfedges of an edge live in the same [`Edge`] record, so the
/// opposite of halfedge `h` is always `h ^ 1`. Every halfedge has a face,
/// including the ones on the outer face. Every face other than the outer face
/// is expected to be a triangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    outer: FH,
}

impl Mesh {
    fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        Mesh {
            vertices: Vec::with_capacity(nverts),
            edges: Vec::with_capacity(nedges),
            faces: Vec::with_capacity(nfaces),
            outer: 0.into(),
        }
    }

    /// Build a closed mesh from a list of polygons.
    ///
    /// Every edge must be shared by exactly two faces with opposite
    /// orientations. The face at index `outer` becomes the outer face.
    pub fn from_polygons<F: AsRef<[u32]>>(
        num_vertices: usize,
        faces: &[F],
        outer: usize,
    ) -> Result<Self, Error> {
        build(num_vertices, faces, Some(outer))
    }

    /// Build a mesh from the faces of a disk.
    ///
    /// The boundary of the disk must be a single loop. It is closed with a new
    /// face, which is appended after the given faces and becomes the outer
    /// face.
    pub fn from_disk<F: AsRef<[u32]>>(num_vertices: usize, faces: &[F]) -> Result<Self, Error> {
        build(num_vertices, faces, None)
    }

    /// Create an independent copy of this mesh.
    ///
    /// The copy shares no storage with this mesh and uses the same indices for
    /// all elements, so a flip path recorded on one can be replayed on the
    /// other.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub(crate) fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    pub(crate) fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn face_mut(&mut self, f: FH) -> &mut Face {
        &mut self.faces[f.index() as usize]
    }

    pub fn is_valid_vertex(&self, v: VH) -> bool {
        (v.index() as usize) < self.num_vertices()
    }

    pub fn is_valid_halfedge(&self, h: HH) -> bool {
        (h.index() as usize) < self.num_halfedges()
    }

    pub fn is_valid_edge(&self, e: EH) -> bool {
        (e.index() as usize) < self.num_edges()
    }

    pub fn is_valid_face(&self, f: FH) -> bool {
        (f.index() as usize) < self.num_faces()
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    /// The vertex `h` points away from.
    pub fn origin(&self, h: HH) -> VH {
        self.halfedge(h).origin
    }

    /// The vertex `h` points towards.
    pub fn head(&self, h: HH) -> VH {
        self.halfedge(h.opposite()).origin
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn opposite_halfedge(&self, h: HH) -> HH {
        h.opposite()
    }

    pub fn halfedge_face(&self, h: HH) -> FH {
        self.halfedge(h).face
    }

    pub fn halfedge_edge(&self, h: HH) -> EH {
        h.edge()
    }

    pub fn edge_halfedge(&self, e: EH, flag: bool) -> HH {
        e.halfedge(flag)
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.faces[f.index() as usize].halfedge
    }

    pub fn outer_face(&self) -> FH {
        self.outer
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.halfedge_face(h) == self.outer
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        let (h, oh) = e.halfedges();
        self.is_boundary_halfedge(h) || self.is_boundary_halfedge(oh)
    }

    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        iterator::voh_ccw_iter(self, v).any(|h| self.is_boundary_halfedge(h))
    }

    /// The next outgoing halfedge around the tail of `h`, i.e. `next(twin(h))`.
    pub fn cw_rotated_halfedge(&self, h: HH) -> HH {
        self.halfedge(h.opposite()).next
    }

    /// The previous outgoing halfedge around the tail of `h`, i.e. `twin(prev(h))`.
    pub fn ccw_rotated_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev.opposite()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_halfedges(&self) -> usize {
        self.num_edges() * 2
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<> {
        (0..(self.num_vertices() as u32)).map(|i| i.into())
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<> {
        (0..(self.num_halfedges() as u32)).map(|i| i.into())
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        (0..(self.num_edges() as u32)).map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        (0..(self.num_faces() as u32)).map(|i| i.into())
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_ccw_iter(self, from).find(|h| self.head(*h) == to)
    }

    pub fn is_adjacent(&self, u: VH, v: VH) -> bool {
        self.find_halfedge(u, v).is_some()
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        iterator::voh_ccw_iter(self, v).count()
    }

    pub fn face_valence(&self, f: FH) -> usize {
        iterator::fh_ccw_iter(self, f).count()
    }

    /// The two vertices of an edge, tail first.
    pub fn edge_vertices(&self, e: EH) -> (VH, VH) {
        let h = e.halfedge(false);
        (self.origin(h), self.head(h))
    }

    /// The faces on either side of an edge.
    pub fn incident_faces(&self, e: EH) -> [FH; 2] {
        let (h, oh) = e.halfedges();
        [self.halfedge_face(h), self.halfedge_face(oh)]
    }

    /// The vertices of a face in loop order, starting at the tail of the
    /// face's halfedge.
    pub fn face_vertices(&self, f: FH) -> Vec<VH> {
        iterator::fv_ccw_iter(self, f).collect()
    }

    /// The vertices across the edge on either side, i.e. the apexes of the two
    /// triangles sharing the edge.
    pub fn opposite_vertices(&self, e: EH) -> (VH, VH) {
        let (h, oh) = e.halfedges();
        (
            self.head(self.next_halfedge(h)),
            self.head(self.next_halfedge(oh)),
        )
    }

    /// Vertices of the outer face, in loop order.
    pub fn boundary_vertices(&self) -> Result<Vec<VH>, Error> {
        let verts = self.face_vertices(self.outer);
        if verts.len() < 2 {
            return Err(DegenerateMesh::TooFewBoundaryVertices(verts.len()).into());
        }
        Ok(verts)
    }

    /// The vertices adjacent to `v`.
    ///
    /// The vertex's outgoing halfedges are visited by rotating with
    /// `next(twin(h))`. A rotation that does not return to the start within
    /// as many steps as there are vertices means the mesh is corrupt.
    pub fn neighbors(&self, v: VH) -> Result<Vec<VH>, Error> {
        let start = self
            .vertex_halfedge(v)
            .ok_or(InvariantViolation::OpenVertexRing(v))?;
        let mut out = Vec::new();
        let mut h = start;
        for _ in 0..self.num_vertices() {
            if self.origin(h) != v {
                break;
            }
            out.push(self.head(h));
            h = self.cw_rotated_halfedge(h);
            if h == start {
                return Ok(out);
            }
        }
        Err(InvariantViolation::OpenVertexRing(v).into())
    }

    /// All edges as sorted vertex pairs, smaller index first. Two meshes over
    /// the same vertices have the same adjacency iff their edge sets are equal.
    pub fn edge_set(&self) -> Vec<(u32, u32)> {
        let mut out: Vec<_> = self
            .edges()
            .map(|e| {
                let (u, v) = self.edge_vertices(e);
                let (u, v) = (u.index(), v.index());
                if u < v { (u, v) } else { (v, u) }
            })
            .collect();
        out.sort();
        out
    }

    pub(crate) fn link_halfedges(&mut self, prev: HH, next: HH) {
        self.halfedge_mut(prev).next = next;
        self.halfedge_mut(next).prev = prev;
    }

    pub(crate) fn add_vertex(&mut self) -> VH {
        let vi = self.vertices.len() as u32;
        self.vertices.push(Vertex { halfedge: None });
        vi.into()
    }

    pub(crate) fn new_edge(&mut self, from: VH, to: VH) -> EH {
        let ei = self.edges.len() as u32;
        let h: HH = (ei << 1).into();
        let oh = h.opposite();
        self.edges.push(Edge {
            halfedges: [
                Halfedge {
                    face: self.outer,
                    origin: from,
                    next: oh,
                    prev: oh,
                },
                Halfedge {
                    face: self.outer,
                    origin: to,
                    next: h,
                    prev: h,
                },
            ],
        });
        ei.into()
    }

    pub(crate) fn new_face(&mut self, halfedge: HH) -> FH {
        let fi = self.faces.len() as u32;
        self.faces.push(Face { halfedge });
        fi.into()
    }
}

fn build<F: AsRef<[u32]>>(
    num_vertices: usize,
    faces: &[F],
    outer: Option<usize>,
) -> Result<Mesh, Error> {
    let nhalfedges: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = Mesh::with_capacity(num_vertices, nhalfedges / 2 + 1, faces.len() + 1);
    for _ in 0..num_vertices {
        mesh.add_vertex();
    }
    // Halfedges that belong to one of the given faces, keyed by their ends.
    let mut lookup: HashMap<(u32, u32), HH> = HashMap::with_capacity(nhalfedges);
    let mut filled: Vec<bool> = Vec::with_capacity(nhalfedges + 2);
    let mut loop_halfedges: Vec<HH> = Vec::new();
    for (fi, face) in faces.iter().enumerate() {
        let verts = face.as_ref();
        if verts.len() < 3 {
            return Err(Error::DegenerateFace(fi));
        }
        if let Some(&vertex) = verts.iter().find(|v| **v as usize >= num_vertices) {
            return Err(Error::InvalidVertexIndex { face: fi, vertex });
        }
        if (1..verts.len()).any(|i| verts[..i].contains(&verts[i])) {
            return Err(Error::DegenerateFace(fi));
        }
        let f = mesh.new_face(0.into());
        loop_halfedges.clear();
        for (i, &from) in verts.iter().enumerate() {
            let to = verts[(i + 1) % verts.len()];
            if lookup.contains_key(&(from, to)) {
                return Err(Error::ComplexHalfedge(from.into(), to.into()));
            }
            let h = match lookup.get(&(to, from)) {
                Some(oh) => oh.opposite(),
                None => {
                    let e = mesh.new_edge(from.into(), to.into());
                    filled.extend_from_slice(&[false, false]);
                    e.halfedge(false)
                }
            };
            lookup.insert((from, to), h);
            filled[h.index() as usize] = true;
            let hedge = mesh.halfedge_mut(h);
            hedge.origin = from.into();
            hedge.face = f;
            loop_halfedges.push(h);
        }
        for i in 0..loop_halfedges.len() {
            mesh.link_halfedges(loop_halfedges[i], loop_halfedges[(i + 1) % loop_halfedges.len()]);
        }
        mesh.face_mut(f).halfedge = loop_halfedges[0];
        for &h in &loop_halfedges {
            let v = mesh.origin(h);
            if mesh.vertex_halfedge(v).is_none() {
                mesh.vertex_mut(v).halfedge = Some(h);
            }
        }
    }
    let open: Vec<HH> = mesh.halfedges().filter(|h| !filled[h.index() as usize]).collect();
    match outer {
        Some(_) if !open.is_empty() => return Err(Error::OpenMesh(open.len())),
        Some(fi) if fi >= faces.len() => return Err(Error::InvalidOuterFace(fi)),
        Some(fi) => mesh.outer = (fi as u32).into(),
        None => close_boundary(&mut mesh, &open)?,
    }
    if let Some(v) = mesh.vertices().find(|v| mesh.vertex_halfedge(*v).is_none()) {
        return Err(Error::IsolatedVertex(v));
    }
    mesh.check()?;
    Ok(mesh)
}

/// Close the open halfedges into a single loop and make it the outer face.
fn close_boundary(mesh: &mut Mesh, open: &[HH]) -> Result<(), Error> {
    let Some(&first) = open.first() else {
        return Err(Error::MultipleBoundaryLoops);
    };
    let mut outgoing: HashMap<VH, HH> = HashMap::with_capacity(open.len());
    for &h in open {
        if outgoing.insert(mesh.origin(h), h).is_some() {
            // Two boundary loops touch at this vertex.
            return Err(Error::MultipleBoundaryLoops);
        }
    }
    let f = mesh.new_face(first);
    mesh.outer = f;
    for &h in open {
        let next = *outgoing
            .get(&mesh.head(h))
            .ok_or(Error::MultipleBoundaryLoops)?;
        mesh.link_halfedges(h, next);
        mesh.halfedge_mut(h).face = f;
    }
    if iterator::fh_ccw_iter(mesh, f).take(open.len() + 1).count() != open.len() {
        return Err(Error::MultipleBoundaryLoops);
    }
    Ok(())
}
