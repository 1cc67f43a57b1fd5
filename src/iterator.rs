use crate::{
    element::{EH, FH, HH, VH},
    topol::Mesh,
};

/// Circulates the outgoing halfedges of a vertex.
///
/// Counter-clockwise rotation steps to `twin(prev(h))` and clockwise rotation
/// steps to `next(twin(h))`. Both are relative to faces listed in
/// counter-clockwise order.
struct OutgoingHalfedgeIter<'a, const CCW: bool> {
    mesh: &'a Mesh,
    hstart: Option<HH>,
    hcurrent: Option<HH>,
}

impl Iterator for OutgoingHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.mesh.ccw_rotated_halfedge(current);
        self.hcurrent = match self.hstart {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

impl Iterator for OutgoingHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.mesh.cw_rotated_halfedge(current);
        self.hcurrent = match self.hstart {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

/// Walks the loop of halfedges bounding a face.
struct LoopHalfedgeIter<'a, const CCW: bool> {
    mesh: &'a Mesh,
    hstart: HH,
    hcurrent: Option<HH>,
}

impl Iterator for LoopHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.mesh.next_halfedge(current);
        self.hcurrent = if next == self.hstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

impl Iterator for LoopHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.mesh.prev_halfedge(current);
        self.hcurrent = if next == self.hstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

pub(crate) fn voh_ccw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = mesh.vertex_halfedge(v);
    OutgoingHalfedgeIter::<true> {
        mesh,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn voh_cw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = mesh.vertex_halfedge(v);
    OutgoingHalfedgeIter::<false> {
        mesh,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn vih_ccw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_ccw_iter(mesh, v).map(|h| h.opposite())
}

pub(crate) fn vv_ccw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_ccw_iter(mesh, v).map(|h| mesh.head(h))
}

pub(crate) fn vv_cw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_cw_iter(mesh, v).map(|h| mesh.head(h))
}

pub(crate) fn ve_ccw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = EH> + use<'_> {
    voh_ccw_iter(mesh, v).map(|h| h.edge())
}

pub(crate) fn vf_ccw_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_ccw_iter(mesh, v).map(|h| mesh.halfedge_face(h))
}

pub(crate) fn loop_ccw_iter(mesh: &Mesh, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<true> {
        mesh,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn loop_cw_iter(mesh: &Mesh, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<false> {
        mesh,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn fh_ccw_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    loop_ccw_iter(mesh, mesh.face_halfedge(f))
}

/// Vertices of a face, starting at the tail of the face's halfedge.
pub(crate) fn fv_ccw_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(mesh, f).map(|h| mesh.origin(h))
}

pub(crate) fn fe_ccw_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = EH> + use<'_> {
    fh_ccw_iter(mesh, f).map(|h| h.edge())
}

pub(crate) fn ff_ccw_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = FH> + use<'_> {
    fh_ccw_iter(mesh, f).map(|h| mesh.halfedge_face(h.opposite()))
}

impl Mesh {
    pub fn voh_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        voh_ccw_iter(self, v)
    }

    pub fn voh_cw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        voh_cw_iter(self, v)
    }

    pub fn vih_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        vih_ccw_iter(self, v)
    }

    pub fn vv_ccw_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        vv_ccw_iter(self, v)
    }

    pub fn vv_cw_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        vv_cw_iter(self, v)
    }

    pub fn ve_ccw_iter(&self, v: VH) -> impl Iterator<Item = EH> + use<'_> {
        ve_ccw_iter(self, v)
    }

    pub fn vf_ccw_iter(&self, v: VH) -> impl Iterator<Item = FH> + use<'_> {
        vf_ccw_iter(self, v)
    }

    pub fn loop_ccw_iter(&self, h: HH) -> impl Iterator<Item = HH> + use<'_> {
        loop_ccw_iter(self, h)
    }

    pub fn loop_cw_iter(&self, h: HH) -> impl Iterator<Item = HH> + use<'_> {
        loop_cw_iter(self, h)
    }

    pub fn fh_ccw_iter(&self, f: FH) -> impl Iterator<Item = HH> + use<'_> {
        fh_ccw_iter(self, f)
    }

    pub fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        fv_ccw_iter(self, f)
    }

    pub fn fe_ccw_iter(&self, f: FH) -> impl Iterator<Item = EH> + use<'_> {
        fe_ccw_iter(self, f)
    }

    pub fn ff_ccw_iter(&self, f: FH) -> impl Iterator<Item = FH> + use<'_> {
        ff_ccw_iter(self, f)
    }
}
