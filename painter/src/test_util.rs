// In-memory host recording how the painting core drives it.

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

use base::defs::{Error, ErrorKind::*, Result};
use base::util::test::MethodMock;

use crate::host::{Scene, SelectionMode, ViewportContext};
use crate::misc::{Color, Frame, MeshId, Point3, Vector3};
use crate::progress::{CancelToken, Phase, Progress};

pub struct FakeHost {
    pub meshes: Vec<(String, Vec<Point3>)>,
    // Camera position is `origin + velocity * frame`.
    pub cameras: HashMap<String, (Point3, Vector3)>,
    // Vertices hit per (camera, frame), `default_visible` otherwise.
    pub visible: HashMap<(String, Frame), Vec<usize>>,
    pub default_visible: Vec<usize>,

    pub active_camera: Option<String>,
    pub frame: Frame,
    pub mode: SelectionMode,
    pub use_depth: bool,
    pub selection: BTreeSet<usize>,

    pub fail_hit_test: bool,
    pub cancel_after_hits: Option<(CancelToken, usize)>,

    pub position_queries: Cell<usize>,
    pub depth_hit_tests: usize,
    pub hit_frames: Vec<Frame>,
    pub grow_calls: usize,
    pub flushes: usize,
    pub color_writes: MethodMock<(MeshId, Vec<usize>, Vec<Color>), ()>,
    pub floods: Vec<(MeshId, Color)>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            cameras: HashMap::new(),
            visible: HashMap::new(),
            default_visible: Vec::new(),
            active_camera: None,
            frame: 0,
            mode: SelectionMode::Object,
            use_depth: false,
            selection: BTreeSet::new(),
            fail_hit_test: false,
            cancel_after_hits: None,
            position_queries: Cell::new(0),
            depth_hit_tests: 0,
            hit_frames: Vec::new(),
            grow_calls: 0,
            flushes: 0,
            color_writes: MethodMock::new(),
            floods: Vec::new(),
        }
    }

    pub fn with_mesh(name: &str, positions: Vec<Point3>) -> Self {
        let mut host = Self::new();
        host.add_mesh(name, positions);
        host
    }

    pub fn add_mesh(&mut self, name: &str, positions: Vec<Point3>) {
        self.meshes.push((name.to_string(), positions));
    }

    pub fn add_camera(&mut self, name: &str, position: Point3) {
        self.add_moving_camera(name, position, Vector3::zeros());
    }

    pub fn add_moving_camera(
        &mut self,
        name: &str,
        origin: Point3,
        velocity: Vector3,
    ) {
        self.cameras.insert(name.to_string(), (origin, velocity));
    }

    fn num_vertices(&self, mesh: MeshId) -> Result<usize> {
        self.meshes
            .get(mesh)
            .map(|m| m.1.len())
            .ok_or_else(|| Error::new(InvalidTarget, "no mesh".to_string()))
    }
}

impl Scene for FakeHost {
    fn resolve_meshes(&self, target: &str) -> Vec<MeshId> {
        (0..self.meshes.len())
            .filter(|&i| self.meshes[i].0 == target)
            .collect()
    }

    fn world_positions(&self, mesh: MeshId) -> Result<Vec<Point3>> {
        self.position_queries.set(self.position_queries.get() + 1);
        Ok(self.meshes[mesh].1.clone())
    }

    fn set_vertex_colors(
        &mut self,
        mesh: MeshId,
        indices: &[usize],
        colors: &[Color],
    ) -> Result<()> {
        self.color_writes
            .args
            .push((mesh, indices.to_vec(), colors.to_vec()));
        Ok(())
    }

    fn flood_vertex_colors(
        &mut self,
        mesh: MeshId,
        color: Color,
    ) -> Result<()> {
        self.num_vertices(mesh)?;
        self.floods.push((mesh, color));
        Ok(())
    }
}

impl ViewportContext for FakeHost {
    fn has_camera(&self, camera: &str) -> bool {
        self.cameras.contains_key(camera)
    }

    fn set_active_camera(&mut self, camera: &str) -> Result<()> {
        if !self.has_camera(camera) {
            let desc = format!("unknown camera '{}'", camera);
            return Err(Error::new(InvalidTarget, desc));
        }
        self.active_camera = Some(camera.to_string());
        Ok(())
    }

    fn set_current_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    fn current_frame(&self) -> Frame {
        self.frame
    }

    fn camera_position(&self) -> Result<Point3> {
        let name = self.active_camera.as_ref().ok_or_else(|| {
            Error::new(InconsistentState, "no active camera".to_string())
        })?;
        let (origin, velocity) = self.cameras[name];
        Ok(origin + velocity * self.frame as f64)
    }

    fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    fn set_selection_mode(&mut self, mode: SelectionMode, use_depth: bool) {
        self.mode = mode;
        self.use_depth = use_depth;
    }

    fn hit_test_screen_region(&mut self, _mesh: MeshId) -> Result<()> {
        if self.fail_hit_test {
            let desc = "hit test failed".to_string();
            return Err(Error::new(InconsistentState, desc));
        }
        assert_eq!(self.mode, SelectionMode::Face);
        if self.use_depth {
            self.depth_hit_tests += 1;
        }
        self.hit_frames.push(self.frame);

        let camera = self.active_camera.clone().unwrap_or_default();
        self.selection = self
            .visible
            .get(&(camera, self.frame))
            .unwrap_or(&self.default_visible)
            .iter()
            .cloned()
            .collect();

        if let Some((cancel, hits)) = &self.cancel_after_hits {
            if self.hit_frames.len() >= *hits {
                cancel.cancel();
            }
        }
        Ok(())
    }

    // Every selected vertex pulls in its successor.
    fn grow_selection(&mut self) -> Result<()> {
        self.grow_calls += 1;
        let num_vertices = self.meshes[0].1.len();
        let grown: Vec<usize> = self
            .selection
            .iter()
            .map(|&i| i + 1)
            .filter(|&i| i < num_vertices)
            .collect();
        self.selection.extend(grown);
        Ok(())
    }

    fn selected_vertices(&self, _mesh: MeshId) -> Result<Vec<usize>> {
        Ok(self.selection.iter().cloned().collect())
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn flush_history(&mut self) {
        self.flushes += 1;
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub reports: Vec<(Phase, usize, usize)>,
}

impl Progress for RecordingProgress {
    fn report(&mut self, phase: Phase, current: usize, total: usize) {
        self.reports.push((phase, current, total));
    }
}
