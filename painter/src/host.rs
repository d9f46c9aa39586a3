// Capabilities the painting core needs from the application hosting the
// scene. The core never touches host state except through these traits.

use base::defs::Result;

use crate::misc::{Color, Frame, MeshId, Point3};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectionMode {
    Object,
    Face,
}

pub trait Scene {
    // Every mesh the identifier resolves to (possibly none or several).
    fn resolve_meshes(&self, target: &str) -> Vec<MeshId>;

    // World-space vertex positions in topology order.
    fn world_positions(&self, mesh: MeshId) -> Result<Vec<Point3>>;

    // Applies a whole color batch in one write.
    fn set_vertex_colors(
        &mut self,
        mesh: MeshId,
        indices: &[usize],
        colors: &[Color],
    ) -> Result<()>;

    fn flood_vertex_colors(&mut self, mesh: MeshId, color: Color) -> Result<()>;
}

pub trait ViewportContext {
    fn has_camera(&self, camera: &str) -> bool;

    fn set_active_camera(&mut self, camera: &str) -> Result<()>;

    fn set_current_frame(&mut self, frame: Frame);

    fn current_frame(&self) -> Frame;

    // World position of the active camera at the current frame.
    fn camera_position(&self) -> Result<Point3>;

    fn selection_mode(&self) -> SelectionMode;

    fn set_selection_mode(&mut self, mode: SelectionMode, use_depth: bool);

    // Replaces the selection with the faces of the mesh hit by a rectangle
    // covering the whole viewport.
    fn hit_test_screen_region(&mut self, mesh: MeshId) -> Result<()>;

    // Grows the selected region by one ring of adjacent faces.
    fn grow_selection(&mut self) -> Result<()>;

    // Vertices of the selected faces which belong to the mesh.
    fn selected_vertices(&self, mesh: MeshId) -> Result<Vec<usize>>;

    fn clear_selection(&mut self);

    // Drops undo/history state accumulated by selection changes.
    fn flush_history(&mut self);
}
