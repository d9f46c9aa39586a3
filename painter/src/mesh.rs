use std::collections::BTreeSet;

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::{Color, Point3};

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[usize; 3]>,
    pub colors: Option<Vec<Color>>,
}

impl Mesh {
    // Color of vertices which were never painted when others were.
    pub const UNSET_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

    pub fn validate(&self) -> Result<()> {
        let num_vertices = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(v) = face.iter().find(|&&v| v >= num_vertices) {
                let desc =
                    format!("face {} references unknown vertex {}", i, v);
                return Err(Error::new(InconsistentState, desc));
            }
        }
        if let Some(colors) = &self.colors {
            if colors.len() != num_vertices {
                let desc = format!(
                    "mesh has {} vertex colors for {} vertices",
                    colors.len(),
                    num_vertices
                );
                return Err(Error::new(InconsistentState, desc));
            }
        }
        Ok(())
    }

    pub fn set_vertex_colors(
        &mut self,
        indices: &[usize],
        colors: &[Color],
    ) -> Result<()> {
        if indices.len() != colors.len() {
            let desc = format!(
                "mismatched vertex color batch ({} indices, {} colors)",
                indices.len(),
                colors.len()
            );
            return Err(Error::new(InconsistentState, desc));
        }
        let num_vertices = self.vertices.len();
        if let Some(&i) = indices.iter().find(|&&i| i >= num_vertices) {
            let desc = format!("vertex color for unknown vertex {}", i);
            return Err(Error::new(InconsistentState, desc));
        }

        let unset = Color::from(Self::UNSET_COLOR);
        let target = self
            .colors
            .get_or_insert_with(|| vec![unset; num_vertices]);
        for (&i, &c) in indices.iter().zip(colors.iter()) {
            target[i] = c;
        }
        Ok(())
    }

    pub fn flood_vertex_colors(&mut self, color: Color) {
        self.colors = Some(vec![color; self.vertices.len()]);
    }
}

#[derive(Clone, Debug)]
pub struct MeshTopology {
    pub faces_around_vertex: Vec<Vec<usize>>,
}

impl MeshTopology {
    pub fn new(mesh: &Mesh) -> MeshTopology {
        let mut faces_around_vertex = vec![Vec::new(); mesh.vertices.len()];
        for (f_idx, &f) in mesh.faces.iter().enumerate() {
            for v in f {
                faces_around_vertex[v].push(f_idx);
            }
        }
        MeshTopology {
            faces_around_vertex,
        }
    }

    // One ring of faces sharing at least a vertex with the given ones.
    pub fn grow_faces(
        &self,
        mesh: &Mesh,
        faces: &BTreeSet<usize>,
    ) -> BTreeSet<usize> {
        let mut grown = faces.clone();
        for &f_idx in faces {
            for &v in &mesh.faces[f_idx] {
                grown.extend(self.faces_around_vertex[v].iter().cloned());
            }
        }
        grown
    }

    pub fn face_vertices(mesh: &Mesh, faces: &BTreeSet<usize>) -> Vec<usize> {
        let vertices: BTreeSet<usize> = faces
            .iter()
            .flat_map(|&f_idx| mesh.faces[f_idx].iter().cloned())
            .collect();
        vertices.into_iter().collect()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    // A strip of unit quads along X, two triangles each, facing +Z.
    pub fn quad_strip(num_quads: usize) -> Mesh {
        let mut vertices = Vec::new();
        for i in 0..=num_quads {
            vertices.push(Point3::new(i as f64, 0.0, 0.0));
            vertices.push(Point3::new(i as f64, 1.0, 0.0));
        }
        let mut faces = Vec::new();
        for i in 0..num_quads {
            let (a, b, c, d) = (2 * i, 2 * i + 2, 2 * i + 3, 2 * i + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
        Mesh {
            vertices,
            faces,
            colors: None,
        }
    }

    #[test]
    fn test_grow_faces_adds_one_ring() {
        let mesh = quad_strip(4);
        let topo = MeshTopology::new(&mesh);

        let start = BTreeSet::from([0]);
        let ring1 = topo.grow_faces(&mesh, &start);
        // Face 0 shares vertices with faces of quads 0 and 1.
        assert_eq!(ring1, BTreeSet::from([0, 1, 2, 3]));

        let ring2 = topo.grow_faces(&mesh, &ring1);
        assert_eq!(ring2, (0..6).collect::<BTreeSet<usize>>());
    }

    #[test]
    fn test_face_vertices() {
        let mesh = quad_strip(2);
        let faces = BTreeSet::from([1, 2]);
        assert_eq!(
            MeshTopology::face_vertices(&mesh, &faces),
            [0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_set_vertex_colors() {
        let mut mesh = quad_strip(1);
        let red = Color::new(1.0, 0.0, 0.0);
        mesh.set_vertex_colors(&[2], &[red]).unwrap();

        let colors = mesh.colors.as_ref().unwrap();
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[2], red);
        assert_eq!(colors[0], Color::from(Mesh::UNSET_COLOR));

        let err = mesh.set_vertex_colors(&[4], &[red]).unwrap_err();
        assert_eq!(err.kind, InconsistentState);
        assert!(mesh.set_vertex_colors(&[0, 1], &[red]).is_err());
    }

    #[test]
    fn test_validate() {
        let mut mesh = quad_strip(1);
        assert!(mesh.validate().is_ok());
        mesh.faces.push([0, 1, 9]);
        assert_eq!(mesh.validate().unwrap_err().kind, InconsistentState);
    }
}
