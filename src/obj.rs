use std::{io::BufRead, path::Path};

use crate::{error::Error, topol::Mesh};

fn build_from_models(models: Vec<tobj::Model>, outer: Option<usize>) -> Result<Mesh, Error> {
    let mut voffset = 0u32;
    let mut faces: Vec<Vec<u32>> = Vec::new();
    for model in models {
        let mesh = model.mesh;
        if mesh.positions.len() % 3 != 0 {
            return Err(Error::ObjLoadFailed(format!(
                "{} coordinates is not a multiple of 3",
                mesh.positions.len()
            )));
        }
        let nverts = (mesh.positions.len() / 3) as u32;
        let offset = |i: &u32| i + voffset;
        if mesh.face_arities.is_empty() {
            faces.extend(
                mesh.indices
                    .chunks_exact(3)
                    .map(|tri| tri.iter().map(offset).collect()),
            );
        } else {
            let mut start = 0usize;
            for size in mesh.face_arities {
                let size = size as usize;
                let indices = mesh.indices.get(start..(start + size)).ok_or_else(|| {
                    Error::ObjLoadFailed(format!("face arity {size} runs past the index buffer"))
                })?;
                start += size;
                faces.push(indices.iter().map(offset).collect());
            }
        }
        voffset += nverts;
    }
    match outer {
        Some(outer) => Mesh::from_polygons(voffset as usize, &faces, outer),
        None => Mesh::from_disk(voffset as usize, &faces),
    }
}

impl Mesh {
    /// Load the connectivity of an OBJ file. Vertex positions are ignored.
    ///
    /// With `outer` set, the faces must form a closed surface and the face at
    /// that index becomes the outer face. Otherwise the faces must form a disk,
    /// whose boundary is closed into a new outer face.
    pub fn load_obj(path: &Path, outer: Option<usize>) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) =
            tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        build_from_models(models, outer)
    }

    /// Same as [`Mesh::load_obj`], reading from a buffer. Material libraries
    /// are not loaded.
    pub fn load_obj_buf<B: BufRead>(reader: &mut B, outer: Option<usize>) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) = tobj::load_obj_buf(reader, &options, |_| Ok(Default::default()))
            .map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        build_from_models(models, outer)
    }
}

#[cfg(test)]
mod test {
    use std::{io::Cursor, path::Path};

    use crate::{error::Error, topol::Mesh};

    const TETRAHEDRON: &str = "\
v 0 0 1
v -0.47 0.82 -0.33
v -0.47 -0.82 -0.33
v 0.94 0 -0.33
f 1 2 3
f 1 3 4
f 1 4 2
f 4 3 2
";

    const QUAD_STRIP: &str = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
f 1 2 5
f 1 5 4
f 2 3 6 5
";

    #[test]
    fn t_load_closed() {
        let mesh = Mesh::load_obj_buf(&mut Cursor::new(TETRAHEDRON), Some(3))
            .expect("Cannot load obj");
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.outer_face(), 3.into());
        mesh.check().expect("Topology check failed");
    }

    #[test]
    fn t_load_disk_with_quad() {
        // The quad is an inner face, which the topology check rejects.
        assert!(matches!(
            Mesh::load_obj_buf(&mut Cursor::new(QUAD_STRIP), None),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn t_load_open_as_closed() {
        let strip = QUAD_STRIP.replace("f 2 3 6 5", "f 2 3 6\nf 2 6 5");
        let mesh = Mesh::load_obj_buf(&mut Cursor::new(strip.as_str()), None)
            .expect("Cannot load obj");
        assert_eq!(mesh.num_faces(), 5);
        assert_eq!(mesh.face_valence(mesh.outer_face()), 6);
        assert!(matches!(
            Mesh::load_obj_buf(&mut Cursor::new(strip.as_str()), Some(0)),
            Err(Error::OpenMesh(6))
        ));
    }

    #[test]
    fn t_missing_file() {
        assert!(matches!(
            Mesh::load_obj(Path::new("does/not/exist.obj"), None),
            Err(Error::ObjLoadFailed(_))
        ));
    }
}
