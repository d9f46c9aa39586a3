// In-memory host: triangle meshes, keyframed cameras and a screen-space face
// selection working the way interactive 3D editors do it.

mod camera;

use std::collections::{BTreeMap, BTreeSet};
use std::io;

use indexmap::IndexMap;
use kiddo::distance::squared_euclidean;
use kiddo::KdTree;
use log::debug;
use rayon::prelude::*;
use serde::Deserialize;

use base::defs::{Error, ErrorKind::*, Result};

use crate::export_obj::export_obj;
use crate::host::{Scene, SelectionMode, ViewportContext};
use crate::mesh::{Mesh, MeshTopology};
use crate::misc::{
    containment_check, max, orientation, Color, Frame, MeshId, Point3,
    ProjectedPoint, Vector2,
};

pub use camera::{CameraKey, CameraPose, CameraTrack, Projector};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

struct MeshEntry {
    mesh: Mesh,
    topology: MeshTopology,
}

// Selected faces per mesh.
type Selection = BTreeMap<MeshId, BTreeSet<usize>>;

pub struct SoftwareScene {
    viewport: Viewport,
    meshes: IndexMap<String, MeshEntry>,
    cameras: IndexMap<String, CameraTrack>,
    active_camera: Option<usize>,
    frame: Frame,
    mode: SelectionMode,
    use_depth: bool,
    selection: Selection,
    history: Vec<Selection>,
}

impl SoftwareScene {
    pub fn new(viewport: Viewport) -> Result<Self> {
        if viewport.width == 0 || viewport.height == 0 {
            let desc = format!(
                "bad viewport size {}x{}",
                viewport.width, viewport.height
            );
            return Err(Error::new(MalformedData, desc));
        }
        Ok(Self {
            viewport,
            meshes: IndexMap::new(),
            cameras: IndexMap::new(),
            active_camera: None,
            frame: 0,
            mode: SelectionMode::Object,
            use_depth: false,
            selection: Selection::new(),
            history: Vec::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) -> Result<MeshId> {
        if self.meshes.contains_key(name) {
            let desc = format!("duplicate mesh '{}'", name);
            return Err(Error::new(MalformedData, desc));
        }
        mesh.validate()?;
        let topology = MeshTopology::new(&mesh);
        let (id, _) = self
            .meshes
            .insert_full(name.to_string(), MeshEntry { mesh, topology });
        Ok(id)
    }

    pub fn add_camera(&mut self, name: &str, track: CameraTrack) -> Result<()> {
        if self.cameras.contains_key(name) {
            let desc = format!("duplicate camera '{}'", name);
            return Err(Error::new(MalformedData, desc));
        }
        self.cameras.insert(name.to_string(), track);
        Ok(())
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get_index(id).map(|(_, e)| &e.mesh)
    }

    pub fn mesh_name(&self, id: MeshId) -> Option<&str> {
        self.meshes.get_index(id).map(|(n, _)| n.as_str())
    }

    pub fn write_obj(
        &self,
        id: MeshId,
        writer: &mut dyn io::Write,
    ) -> Result<()> {
        export_obj(&self.entry(id)?.mesh, writer)
    }

    // Number of selection changes not yet flushed.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn entry(&self, id: MeshId) -> Result<&MeshEntry> {
        self.meshes.get_index(id).map(|(_, e)| e).ok_or_else(|| {
            Error::new(InconsistentState, format!("unknown mesh #{}", id))
        })
    }

    fn entry_mut(&mut self, id: MeshId) -> Result<&mut MeshEntry> {
        self.meshes.get_index_mut(id).map(|(_, e)| e).ok_or_else(|| {
            Error::new(InconsistentState, format!("unknown mesh #{}", id))
        })
    }

    fn active_track(&self) -> Result<&CameraTrack> {
        self.active_camera
            .and_then(|i| self.cameras.get_index(i))
            .map(|(_, t)| t)
            .ok_or_else(|| {
                Error::new(InconsistentState, "no active camera".to_string())
            })
    }

    fn push_selection(&mut self, selection: Selection) {
        let prev = std::mem::replace(&mut self.selection, selection);
        self.history.push(prev);
    }

    // Faces whose projected centroid falls into the viewport and which face
    // the active camera with all their vertices in front of it.
    fn hit_faces(&self, id: MeshId) -> Result<BTreeSet<usize>> {
        let mesh = &self.entry(id)?.mesh;
        let track = self.active_track()?;
        let pose = track.pose(self.frame);
        let projector = Projector::new(
            &pose,
            track.fov_y(),
            self.viewport.width as f64,
            self.viewport.height as f64,
        );

        let projected: Vec<ProjectedPoint> = mesh
            .vertices
            .par_iter()
            .map(|v| projector.project(v))
            .collect();

        let mut in_front = Vec::new();
        let mut hit = Vec::new();
        for (f_idx, face) in mesh.faces.iter().enumerate() {
            if face.iter().any(|&v| projected[v].depth <= 0.0) {
                continue;
            }
            in_front.push(f_idx);

            let [a, b, c] = face.map(|v| mesh.vertices[v]);
            let normal = (b - a).cross(&(c - a));
            let centroid =
                Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let centroid_2d = face_centroid(&projected, face);
            if normal.dot(&(pose.eye - centroid)) > 0.0
                && projector.contains(centroid_2d)
            {
                hit.push(f_idx);
            }
        }

        let faces: BTreeSet<usize> = if self.use_depth {
            let occluded = occluded_faces(mesh, &projected, &in_front, &hit)?;
            hit.into_iter().filter(|f| !occluded.contains(f)).collect()
        } else {
            hit.into_iter().collect()
        };
        debug!(
            "{} faces of '{}' hit at frame {}",
            faces.len(),
            self.mesh_name(id).unwrap_or_default(),
            self.frame
        );
        Ok(faces)
    }
}

fn face_centroid(projected: &[ProjectedPoint], face: &[usize; 3]) -> Vector2 {
    face.iter().map(|&v| projected[v].point).sum::<Vector2>() / 3.0
}

// Candidates whose centroid is covered by a nearer triangle. Candidate
// centroids are indexed by a 2D kd-tree, and every face in front of the
// camera looks up the ones it may cover.
fn occluded_faces(
    mesh: &Mesh,
    projected: &[ProjectedPoint],
    occluders: &[usize],
    candidates: &[usize],
) -> Result<BTreeSet<usize>> {
    let kd_err = |e: kiddo::ErrorKind| {
        let desc = format!("failed to query centroid kd-tree: {:?}", e);
        Error::new(InconsistentState, desc)
    };

    let centroids: Vec<(Vector2, f64)> = candidates
        .iter()
        .map(|&f_idx| {
            let face = &mesh.faces[f_idx];
            let depth =
                face.iter().map(|&v| projected[v].depth).sum::<f64>() / 3.0;
            (face_centroid(projected, face), depth)
        })
        .collect();

    let mut kdtree = KdTree::new();
    for (i, (c, _)) in centroids.iter().enumerate() {
        if c.x.is_finite() && c.y.is_finite() {
            kdtree.add(&[c.x, c.y], i).map_err(kd_err)?;
        }
    }

    let mut occluded = BTreeSet::new();
    for &f_idx in occluders {
        let face = &mesh.faces[f_idx];
        let [p0, p1, p2] = face.map(|v| projected[v]);
        let (v0, mut v1, mut v2) = (p0.point, p1.point, p2.point);
        let o = orientation(v0, v1, v2);
        if o == 0.0 || !o.is_finite() {
            continue;
        }
        if o < 0.0 {
            std::mem::swap(&mut v1, &mut v2);
        }

        let v = (v0 + v1 + v2) / 3.0;
        let radius = 1.1
            * max([
                (v0 - v).norm_squared(),
                (v1 - v).norm_squared(),
                (v2 - v).norm_squared(),
            ]);
        for (_dist, &i) in kdtree
            .within_unsorted(&[v.x, v.y], radius, &squared_euclidean)
            .map_err(kd_err)?
        {
            let (ci, di) = centroids[i];
            if p0.depth < di
                && p1.depth < di
                && p2.depth < di
                && containment_check(ci, [v0, v1, v2])
            {
                occluded.insert(candidates[i]);
            }
        }
    }
    Ok(occluded)
}

impl Scene for SoftwareScene {
    // Exact name, or a name prefix followed by '*'.
    fn resolve_meshes(&self, target: &str) -> Vec<MeshId> {
        if let Some(prefix) = target.strip_suffix('*') {
            self.meshes
                .keys()
                .enumerate()
                .filter(|(_, name)| name.starts_with(prefix))
                .map(|(i, _)| i)
                .collect()
        } else {
            self.meshes.get_index_of(target).into_iter().collect()
        }
    }

    fn world_positions(&self, mesh: MeshId) -> Result<Vec<Point3>> {
        Ok(self.entry(mesh)?.mesh.vertices.clone())
    }

    fn set_vertex_colors(
        &mut self,
        mesh: MeshId,
        indices: &[usize],
        colors: &[Color],
    ) -> Result<()> {
        self.entry_mut(mesh)?.mesh.set_vertex_colors(indices, colors)
    }

    fn flood_vertex_colors(
        &mut self,
        mesh: MeshId,
        color: Color,
    ) -> Result<()> {
        self.entry_mut(mesh)?.mesh.flood_vertex_colors(color);
        Ok(())
    }
}

impl ViewportContext for SoftwareScene {
    fn has_camera(&self, camera: &str) -> bool {
        self.cameras.contains_key(camera)
    }

    fn set_active_camera(&mut self, camera: &str) -> Result<()> {
        let idx = self.cameras.get_index_of(camera).ok_or_else(|| {
            Error::new(InvalidTarget, format!("unknown camera '{}'", camera))
        })?;
        self.active_camera = Some(idx);
        Ok(())
    }

    fn set_current_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    fn current_frame(&self) -> Frame {
        self.frame
    }

    fn camera_position(&self) -> Result<Point3> {
        Ok(self.active_track()?.pose(self.frame).eye)
    }

    fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    fn set_selection_mode(&mut self, mode: SelectionMode, use_depth: bool) {
        self.mode = mode;
        self.use_depth = use_depth;
    }

    // In object mode a single hit face selects the whole mesh.
    fn hit_test_screen_region(&mut self, mesh: MeshId) -> Result<()> {
        let mut faces = self.hit_faces(mesh)?;
        if self.mode == SelectionMode::Object && !faces.is_empty() {
            faces = (0..self.entry(mesh)?.mesh.faces.len()).collect();
        }

        let mut selection = Selection::new();
        if !faces.is_empty() {
            selection.insert(mesh, faces);
        }
        self.push_selection(selection);
        Ok(())
    }

    fn grow_selection(&mut self) -> Result<()> {
        let mut grown = Selection::new();
        for (&id, faces) in &self.selection {
            let entry = self.entry(id)?;
            grown.insert(id, entry.topology.grow_faces(&entry.mesh, faces));
        }
        self.push_selection(grown);
        Ok(())
    }

    fn selected_vertices(&self, mesh: MeshId) -> Result<Vec<usize>> {
        let entry = self.entry(mesh)?;
        Ok(match self.selection.get(&mesh) {
            Some(faces) => MeshTopology::face_vertices(&entry.mesh, faces),
            None => Vec::new(),
        })
    }

    fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.push_selection(Selection::new());
        }
    }

    fn flush_history(&mut self) {
        debug!("flushing {} selection changes", self.history.len());
        self.history.clear();
    }
}
