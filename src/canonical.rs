/*!
Reduce a triangulation to a canonical form using edge flips.

The outer face must be a triangle `(a, b, c)`. The primary phase flips edges
until the primary anchor `a` is adjacent to every other vertex. The secondary
phase then does the same for `b`, without touching any edge incident on `a` or
`b`. The result is the unique "double wheel" on `V` vertices: `a` and `b` are
adjacent to everything, and the remaining vertices form a path between them
starting at `c`.

The flips are recorded in order, so reversing them leads from the canonical
form back to the input.
*/

use crate::{
    element::{Handle, EH, VH},
    error::{DegenerateMesh, Error, InvariantViolation},
    topol::Mesh,
};

/// Which boundary vertices anchor the canonical form, and whether the
/// secondary anchor is also made dominant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Index into the outer face's vertex loop of the primary anchor. The
    /// secondary anchor is the vertex after it. Taken modulo 3.
    pub anchor: usize,
    /// Run the secondary phase.
    pub secondary: bool,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        CanonicalConfig {
            anchor: 0,
            secondary: true,
        }
    }
}

impl CanonicalConfig {
    /// Only make the primary anchor adjacent to every vertex.
    pub fn primary_only() -> Self {
        CanonicalConfig {
            secondary: false,
            ..Default::default()
        }
    }
}

/// Flip counts of one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseStats {
    /// Flips that made a new vertex adjacent to the anchor.
    pub direct: usize,
    /// Flips that removed a chord between two neighbours of the anchor.
    pub separating: usize,
}

impl PhaseStats {
    pub fn total(&self) -> usize {
        self.direct + self.separating
    }
}

/// Drives the flips that bring a mesh to its canonical form.
///
/// Vertex tags live here rather than on the mesh. A vertex is tagged when it
/// is the current anchor or adjacent to it.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    config: CanonicalConfig,
    primary: VH,
    secondary: VH,
    tags: Vec<bool>,
    stats: [PhaseStats; 2],
    // Bound on direct flips and on consecutive separating flips in a phase.
    limit: usize,
}

impl Canonicalizer {
    pub fn new(mesh: &Mesh, config: CanonicalConfig) -> Result<Self, Error> {
        let boundary = mesh.boundary_vertices()?;
        if mesh.num_vertices() < 4 {
            return Err(DegenerateMesh::TooFewVertices(mesh.num_vertices()).into());
        }
        if boundary.len() != 3 {
            return Err(DegenerateMesh::NonTriangularOuterFace(boundary.len()).into());
        }
        let k = config.anchor % 3;
        Ok(Canonicalizer {
            config,
            primary: boundary[k],
            secondary: boundary[(k + 1) % 3],
            tags: vec![false; mesh.num_vertices()],
            stats: [PhaseStats::default(); 2],
            limit: mesh.num_vertices(),
        })
    }

    pub fn primary_anchor(&self) -> VH {
        self.primary
    }

    pub fn secondary_anchor(&self) -> VH {
        self.secondary
    }

    pub fn primary_stats(&self) -> PhaseStats {
        self.stats[0]
    }

    pub fn secondary_stats(&self) -> PhaseStats {
        self.stats[1]
    }

    /// Flip `mesh` into its canonical form, returning the flipped edges in
    /// order.
    pub fn run(&mut self, mesh: &mut Mesh) -> Result<Vec<EH>, Error> {
        if mesh.num_vertices() != self.tags.len() {
            return Err(Error::MismatchedVertexCount(
                self.tags.len(),
                mesh.num_vertices(),
            ));
        }
        let mut path = Vec::new();
        self.stats[0] = self.run_phase(mesh, self.primary, &mut path)?;
        if self.config.secondary {
            self.stats[1] = self.run_phase(mesh, self.secondary, &mut path)?;
        }
        tracing::debug!(
            "Canonical form around {} and {}: {} flips ({:?}, {:?})",
            self.primary,
            self.secondary,
            path.len(),
            self.stats[0],
            self.stats[1]
        );
        Ok(path)
    }

    fn tag(&mut self, mesh: &Mesh, anchor: VH, v: VH) -> bool {
        let tagged = v == anchor || mesh.is_adjacent(anchor, v);
        self.tags[v.index() as usize] = tagged;
        tagged
    }

    fn tagged(&self, v: VH) -> bool {
        self.tags[v.index() as usize]
    }

    /// Flip edges until every vertex is adjacent to `anchor`.
    fn run_phase(
        &mut self,
        mesh: &mut Mesh,
        anchor: VH,
        path: &mut Vec<EH>,
    ) -> Result<PhaseStats, Error> {
        self.tags.fill(false);
        self.tags[anchor.index() as usize] = true;
        for v in mesh.neighbors(anchor)? {
            self.tags[v.index() as usize] = true;
        }
        let mut remaining = self.tags.iter().filter(|t| !**t).count();
        let limit = self.limit;
        let mut stats = PhaseStats::default();
        let mut stalls = 0usize;
        tracing::debug!("Canonicalizing around {anchor}: {remaining} vertices to connect");
        while remaining > 0 {
            let (e, direct) = self.find_flip(mesh, anchor, remaining)?;
            let (u, w) = mesh.edge_vertices(e);
            let (c, d) = mesh.opposite_vertices(e);
            mesh.flip_edge(e)?;
            path.push(e);
            let before = remaining;
            for v in [u, w, c, d] {
                let was = self.tagged(v);
                match (was, self.tag(mesh, anchor, v)) {
                    (false, true) => remaining -= 1,
                    (true, false) => remaining += 1,
                    _ => {}
                }
            }
            if remaining < before {
                stats.direct += 1;
                stalls = 0;
            } else {
                stats.separating += 1;
                stalls += 1;
            }
            tracing::debug!(
                "Flipped {e} ({}): removed {u}-{w}, inserted {c}-{d}, {remaining} remaining",
                if direct { "direct" } else { "separating" }
            );
            if stats.direct > limit || stalls > limit {
                return Err(InvariantViolation::IterationLimit { anchor, limit }.into());
            }
        }
        if mesh.vertex_valence(anchor) + 1 != mesh.num_vertices() {
            return Err(InvariantViolation::MalformedCanonicalForm(anchor).into());
        }
        Ok(stats)
    }

    /// Find the next edge to flip.
    ///
    /// Candidates avoid both anchors and the outer face, join two tagged
    /// vertices and have an untagged vertex across. Edges are scanned in index
    /// order. The first candidate whose other apex is the anchor is taken,
    /// since flipping it connects the anchor to a new vertex. Otherwise the
    /// first candidate is taken, which is a chord between two neighbours of the
    /// anchor.
    fn find_flip(&self, mesh: &Mesh, anchor: VH, remaining: usize) -> Result<(EH, bool), Error> {
        let mut fallback = None;
        for e in mesh.edges() {
            let (u, w) = mesh.edge_vertices(e);
            if [u, w]
                .iter()
                .any(|v| *v == self.primary || *v == self.secondary)
            {
                continue;
            }
            if !self.tagged(u) || !self.tagged(w) || mesh.is_boundary_edge(e) {
                continue;
            }
            let (c, d) = mesh.opposite_vertices(e);
            let (free_c, free_d) = (!self.tagged(c), !self.tagged(d));
            if !free_c && !free_d {
                continue;
            }
            if mesh.check_edge_flip(e).is_err() {
                continue;
            }
            if (free_c && d == anchor) || (free_d && c == anchor) {
                return Ok((e, true));
            }
            fallback.get_or_insert(e);
        }
        match fallback {
            Some(e) => Ok((e, false)),
            None => Err(InvariantViolation::NoProgressingEdge { anchor, remaining }.into()),
        }
    }
}

/// Flip `mesh` into its canonical form with the default configuration.
///
/// Returns the flipped edges in order. On error the mesh may be partially
/// flipped.
pub fn tri_to_canonical(mesh: &mut Mesh) -> Result<Vec<EH>, Error> {
    tri_to_canonical_with(mesh, CanonicalConfig::default())
}

pub fn tri_to_canonical_with(mesh: &mut Mesh, config: CanonicalConfig) -> Result<Vec<EH>, Error> {
    Canonicalizer::new(mesh, config)?.run(mesh)
}

fn dominates(mesh: &Mesh, v: Option<&VH>) -> bool {
    v.is_some_and(|v| {
        mesh.neighbors(*v)
            .is_ok_and(|nbs| nbs.len() + 1 == mesh.num_vertices())
    })
}

/// Check if `mesh` is in the canonical form [`tri_to_canonical_with`] produces
/// for `config`.
///
/// The anchors are picked from the outer face the same way as in
/// [`Canonicalizer::new`]. The secondary anchor is only checked when
/// `config.secondary` is set.
pub fn is_canonical_with(mesh: &Mesh, config: CanonicalConfig) -> bool {
    let Ok(boundary) = mesh.boundary_vertices() else {
        return false;
    };
    let k = config.anchor % 3;
    dominates(mesh, boundary.get(k))
        && (!config.secondary || dominates(mesh, boundary.get((k + 1) % 3)))
}

/// Check if the first vertex of the outer face is adjacent to every other
/// vertex.
pub fn is_canonical(mesh: &Mesh) -> bool {
    is_canonical_with(mesh, CanonicalConfig::primary_only())
}

/// Check if the first two vertices of the outer face are both adjacent to
/// every other vertex.
pub fn is_double_canonical(mesh: &Mesh) -> bool {
    is_canonical_with(mesh, CanonicalConfig::default())
}

#[cfg(test)]
mod test {
    use crate::{
        element::{Handle, VH},
        error::{DegenerateMesh, Error, InvariantViolation},
        topol::{test::hexagon_fan, Mesh},
    };

    use super::{
        is_canonical, is_canonical_with, is_double_canonical, tri_to_canonical,
        tri_to_canonical_with, CanonicalConfig, Canonicalizer,
    };

    #[test]
    fn t_tetrahedron_is_canonical() {
        let mut mesh = Mesh::tetrahedron().expect("Cannot create tetrahedron");
        assert!(is_double_canonical(&mesh));
        let path = tri_to_canonical(&mut mesh).expect("Cannot canonicalize");
        assert!(path.is_empty());
    }

    #[test]
    fn t_octahedron() {
        let mut mesh = Mesh::octahedron().expect("Cannot create octahedron");
        assert!(!is_canonical(&mesh));
        let mut canon = Canonicalizer::new(&mesh, CanonicalConfig::default())
            .expect("Cannot set up canonicalization");
        assert_eq!(canon.primary_anchor(), VH::from(0));
        assert_eq!(canon.secondary_anchor(), VH::from(4));
        let path = canon.run(&mut mesh).expect("Cannot canonicalize");
        mesh.check().expect("Topology check failed");
        assert_eq!(path.len(), 2);
        assert_eq!(canon.primary_stats().direct, 1);
        assert_eq!(canon.secondary_stats().direct, 1);
        assert!(is_double_canonical(&mesh));
        assert_eq!(mesh.vertex_valence(0.into()), 5);
        assert_eq!(mesh.vertex_valence(4.into()), 5);
    }

    #[test]
    fn t_stacked_eight_vertices() {
        let mesh = Mesh::stacked(&[0, 3, 1, 7]).expect("Cannot create stacked triangulation");
        let a = mesh.vertex_valence(0.into());
        let mut first = mesh.duplicate();
        let mut canon = Canonicalizer::new(&first, CanonicalConfig::primary_only())
            .expect("Cannot set up canonicalization");
        let path = canon.run(&mut first).expect("Cannot canonicalize");
        first.check().expect("Topology check failed");
        assert!(is_canonical(&first));
        assert_eq!(
            first
                .neighbors(0.into())
                .expect("Cannot walk around vertex")
                .len(),
            7
        );
        assert_eq!(canon.primary_stats().direct, 8 - 1 - a);
        assert_eq!(canon.secondary_stats().total(), 0);
        assert!(canon.primary_stats().direct <= 8 - 3);
        // Deterministic.
        let mut second = mesh.duplicate();
        let again = tri_to_canonical_with(&mut second, CanonicalConfig::primary_only())
            .expect("Cannot canonicalize");
        assert_eq!(path, again);
        assert_eq!(first, second);
    }

    #[test]
    fn t_double_wheel() {
        for choices in [
            vec![0usize, 0, 0, 0, 0],
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![5, 5, 2, 9, 1, 0, 4, 4, 3],
        ] {
            let mut mesh = Mesh::stacked(&choices).expect("Cannot create stacked triangulation");
            let n = mesh.num_vertices();
            tri_to_canonical(&mut mesh).expect("Cannot canonicalize");
            mesh.check().expect("Topology check failed");
            assert!(is_double_canonical(&mesh));
            // Every other vertex sees both anchors, plus at most two path
            // neighbours.
            let degrees: Vec<usize> = mesh
                .vertices()
                .filter(|v| v.index() > 1)
                .map(|v| mesh.vertex_valence(v))
                .collect();
            assert_eq!(degrees.iter().filter(|d| **d == 3).count(), 2);
            assert_eq!(degrees.iter().filter(|d| **d == 4).count(), n - 4);
        }
    }

    #[test]
    fn t_other_anchor() {
        let mut mesh = Mesh::stacked(&[2, 2, 2]).expect("Cannot create stacked triangulation");
        let config = CanonicalConfig {
            anchor: 1,
            secondary: true,
        };
        let canon = Canonicalizer::new(&mesh, config).expect("Cannot set up canonicalization");
        assert_eq!(canon.primary_anchor(), VH::from(1));
        assert_eq!(canon.secondary_anchor(), VH::from(2));
        let mut single = mesh.duplicate();
        let primary = CanonicalConfig {
            secondary: false,
            ..config
        };
        tri_to_canonical_with(&mut single, primary).expect("Cannot canonicalize");
        assert!(is_canonical_with(&single, primary));
        tri_to_canonical_with(&mut mesh, config).expect("Cannot canonicalize");
        assert!(is_canonical_with(&mesh, config));
        assert_eq!(mesh.vertex_valence(1.into()), 6);
        assert_eq!(mesh.vertex_valence(2.into()), 6);
        // The default queries look at the first two boundary vertices.
        assert_eq!(
            is_double_canonical(&mesh),
            is_canonical_with(&mesh, CanonicalConfig::default())
        );
    }

    #[test]
    fn t_iteration_limit() {
        let mut mesh = Mesh::octahedron().expect("Cannot create octahedron");
        let mut canon = Canonicalizer::new(&mesh, CanonicalConfig::default())
            .expect("Cannot set up canonicalization");
        // The first flip around the primary anchor is a direct flip.
        canon.limit = 0;
        assert!(matches!(
            canon.run(&mut mesh),
            Err(Error::InvariantViolation(InvariantViolation::IterationLimit {
                anchor,
                limit: 0
            })) if anchor == VH::from(0)
        ));
        mesh.check().expect("Topology check failed");
    }

    #[test]
    fn t_no_progressing_edge() {
        let mesh = Mesh::octahedron().expect("Cannot create octahedron");
        let mut canon = Canonicalizer::new(&mesh, CanonicalConfig::default())
            .expect("Cannot set up canonicalization");
        // Only the anchor is tagged, so no edge joins two tagged vertices.
        let anchor = canon.primary_anchor();
        canon.tags[anchor.index() as usize] = true;
        assert!(matches!(
            canon.find_flip(&mesh, anchor, 5),
            Err(Error::InvariantViolation(InvariantViolation::NoProgressingEdge {
                anchor: a,
                remaining: 5
            })) if a == anchor
        ));
    }

    #[test]
    fn t_degenerate() {
        let mut tri = Mesh::from_disk(3, &[[0u32, 1, 2]]).expect("Cannot build triangle");
        assert!(matches!(
            tri_to_canonical(&mut tri),
            Err(Error::Degenerate(DegenerateMesh::TooFewVertices(3)))
        ));
        let mut fan = hexagon_fan();
        assert!(matches!(
            tri_to_canonical(&mut fan),
            Err(Error::Degenerate(DegenerateMesh::NonTriangularOuterFace(6)))
        ));
    }
}
