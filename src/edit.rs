use crate::{
    element::{EH, FH, VH},
    error::{Error, InvalidFlip},
    topol::Mesh,
};

impl Mesh {
    /// Check if it is safe to flip an edge.
    ///
    /// The edge must exist and must not touch the outer face. It must also
    /// separate two distinct triangles whose apexes are not already
    /// connected. This does not modify the mesh.
    pub fn check_edge_flip(&self, e: EH) -> Result<(), InvalidFlip> {
        if !self.is_valid_edge(e) {
            return Err(InvalidFlip::InvalidEdge(e));
        }
        if self.is_boundary_edge(e) {
            return Err(InvalidFlip::BoundaryEdge(e));
        }
        let [f0, f1] = self.incident_faces(e);
        if f0 == f1 {
            return Err(InvalidFlip::SameFace(e));
        }
        if let Some(f) = [f0, f1].into_iter().find(|f| self.face_valence(*f) != 3) {
            return Err(InvalidFlip::NonTriangularFace(f));
        }
        let (c, d) = self.opposite_vertices(e);
        if c == d || self.is_adjacent(c, d) {
            return Err(InvalidFlip::DuplicateEdge {
                edge: e,
                from: c,
                to: d,
            });
        }
        Ok(())
    }

    /// Flip an edge shared by two triangles.
    ///
    /// For the halfedge `h = a -> b` in triangle `(a, b, c)` and its opposite
    /// `t = b -> a` in triangle `(b, a, d)`, the edge is rewritten in place so
    /// that `h = c -> d` in triangle `(c, d, b)` and `t = d -> c` in triangle
    /// `(d, c, a)`. The edge keeps its index, so flipping it again restores the
    /// original connectivity. The mesh is not modified if the flip is invalid.
    pub fn flip_edge(&mut self, e: EH) -> Result<(), Error> {
        self.check_edge_flip(e)?;
        let (h, t) = e.halfedges();
        let (h1, h2) = (self.next_halfedge(h), self.prev_halfedge(h));
        let (t1, t2) = (self.next_halfedge(t), self.prev_halfedge(t));
        let (f1, f2) = (self.halfedge_face(h), self.halfedge_face(t));
        let (a, b) = (self.origin(h), self.origin(t));
        let (c, d) = (self.origin(h2), self.origin(t2));
        // Rewire halfedge -> vertex.
        self.halfedge_mut(h).origin = c;
        self.halfedge_mut(t).origin = d;
        // Rewire halfedge -> halfedge.
        self.link_halfedges(h, t2);
        self.link_halfedges(t2, h1);
        self.link_halfedges(h1, h);
        self.link_halfedges(t, h2);
        self.link_halfedges(h2, t1);
        self.link_halfedges(t1, t);
        // Rewire halfedge -> face.
        self.halfedge_mut(t2).face = f1;
        self.halfedge_mut(h2).face = f2;
        self.face_mut(f1).halfedge = h;
        self.face_mut(f2).halfedge = t;
        // Rewire vertex -> halfedge.
        self.vertex_mut(a).halfedge = Some(t1);
        self.vertex_mut(b).halfedge = Some(h1);
        self.vertex_mut(c).halfedge = Some(h);
        self.vertex_mut(d).halfedge = Some(t);
        tracing::trace!("Flipped {e}: removed {a}-{b}, inserted {c}-{d}");
        Ok(())
    }

    /// Insert a new vertex inside a triangle and connect it to the three
    /// corners. The original face keeps the triangle on its first halfedge.
    pub fn split_face(&mut self, f: FH) -> Result<VH, Error> {
        if !self.is_valid_face(f) || self.face_valence(f) != 3 {
            return Err(InvalidFlip::NonTriangularFace(f).into());
        }
        let h0 = self.face_halfedge(f);
        let h1 = self.next_halfedge(h0);
        let h2 = self.next_halfedge(h1);
        let (p, q, r) = (self.origin(h0), self.origin(h1), self.origin(h2));
        let x = self.add_vertex();
        let (xp, px) = self.new_edge(x, p).halfedges();
        let (xq, qx) = self.new_edge(x, q).halfedges();
        let (xr, rx) = self.new_edge(x, r).halfedges();
        let fq = self.new_face(h1);
        let fr = self.new_face(h2);
        for (face, [e0, e1, e2]) in [(f, [h0, qx, xp]), (fq, [h1, rx, xq]), (fr, [h2, px, xr])] {
            self.link_halfedges(e0, e1);
            self.link_halfedges(e1, e2);
            self.link_halfedges(e2, e0);
            for h in [e0, e1, e2] {
                self.halfedge_mut(h).face = face;
            }
        }
        self.vertex_mut(x).halfedge = Some(xp);
        Ok(x)
    }
}
