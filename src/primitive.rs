use crate::{element::FH, error::Error, topol::Mesh};

/// Platonic solids with triangular faces. The first face of each becomes the
/// outer face.
impl Mesh {
    /// Create a tetrahedron. The outer face is `(0, 1, 2)`.
    pub fn tetrahedron() -> Result<Self, Error> {
        Mesh::from_polygons(4, &[[0u32, 1, 2], [0, 2, 3], [0, 3, 1], [3, 2, 1]], 0)
    }

    /// Create an octahedron. The outer face is `(0, 4, 3)`.
    pub fn octahedron() -> Result<Self, Error> {
        Mesh::from_polygons(
            6,
            &[
                [0u32, 4, 3],
                [1, 4, 0],
                [2, 4, 1],
                [3, 4, 2],
                [3, 5, 0],
                [0, 5, 1],
                [1, 5, 2],
                [2, 5, 3],
            ],
            0,
        )
    }

    /// Create an icosahedron. The outer face is `(2, 1, 0)`.
    pub fn icosahedron() -> Result<Self, Error> {
        Mesh::from_polygons(
            12,
            &[
                [2u32, 1, 0],
                [1, 2, 3],
                [5, 4, 3],
                [4, 8, 3],
                [7, 6, 0],
                [6, 9, 0],
                [11, 10, 4],
                [10, 11, 6],
                [9, 5, 2],
                [5, 9, 11],
                [8, 7, 1],
                [7, 8, 10],
                [2, 5, 3],
                [8, 1, 3],
                [9, 2, 0],
                [1, 7, 0],
                [11, 9, 6],
                [7, 10, 6],
                [5, 11, 4],
                [10, 8, 4],
            ],
            0,
        )
    }
}

/// Stacked triangulations.
impl Mesh {
    /// Grow a triangulation from a tetrahedron by repeatedly splitting inner
    /// faces.
    ///
    /// Each choice picks one of the inner faces present at that step, modulo
    /// their count, and inserts a new vertex into it. The outer face stays
    /// `(0, 1, 2)`, and the result has `4 + choices.len()` vertices.
    pub fn stacked(choices: &[usize]) -> Result<Self, Error> {
        let mut mesh = Mesh::tetrahedron()?;
        let mut inner: Vec<FH> = Vec::with_capacity(choices.len() * 2 + 3);
        for &choice in choices {
            inner.clear();
            inner.extend(mesh.faces().filter(|f| !f.is_outer(&mesh)));
            mesh.split_face(inner[choice % inner.len()])?;
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod test {
    use crate::{element::Handle, topol::Mesh};

    #[test]
    fn t_tetrahedron() {
        let tet = Mesh::tetrahedron().expect("Cannot create a tetrahedron");
        assert_eq!(4, tet.num_vertices());
        assert_eq!(12, tet.num_halfedges());
        assert_eq!(6, tet.num_edges());
        assert_eq!(4, tet.num_faces());
    }

    #[test]
    fn t_octahedron() {
        let oct = Mesh::octahedron().expect("Cannot create octahedron");
        assert_eq!(oct.num_vertices(), 6);
        assert_eq!(oct.num_halfedges(), 24);
        assert_eq!(oct.num_edges(), 12);
        assert_eq!(oct.num_faces(), 8);
        for v in oct.vertices() {
            assert_eq!(oct.vertex_valence(v), 4);
        }
        assert_eq!(
            oct.boundary_vertices()
                .expect("Cannot read boundary")
                .iter()
                .map(|v| v.index())
                .collect::<Vec<_>>(),
            [0, 4, 3]
        );
    }

    #[test]
    fn t_icosahedron() {
        let ico = Mesh::icosahedron().expect("Cannot create icosahedron");
        assert_eq!(12, ico.num_vertices());
        assert_eq!(60, ico.num_halfedges());
        assert_eq!(30, ico.num_edges());
        assert_eq!(20, ico.num_faces());
        for v in ico.vertices() {
            assert_eq!(ico.vertex_valence(v), 5);
        }
    }

    #[test]
    fn t_stacked() {
        let mesh = Mesh::stacked(&[0, 3, 1, 7]).expect("Cannot create stacked triangulation");
        mesh.check().expect("Topology check failed");
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges(), 3 * 8 - 6);
        assert_eq!(mesh.num_faces(), 2 * 8 - 4);
        assert_eq!(
            mesh.boundary_vertices()
                .expect("Cannot read boundary")
                .iter()
                .map(|v| v.index())
                .collect::<Vec<_>>(),
            [0, 1, 2]
        );
        // Every inserted vertex starts with three neighbours, so at least one
        // vertex keeps that valence.
        assert!(mesh.vertices().any(|v| mesh.vertex_valence(v) == 3));
    }
}
