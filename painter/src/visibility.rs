use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use log::debug;

use base::defs::Result;

use crate::host::{SelectionMode, ViewportContext};
use crate::misc::MeshId;

pub type VisibilityMask = BTreeSet<usize>;

// Largest number of growth passes a scan accepts.
pub const MAX_MARGIN: usize = 5;

// Switches the viewport into depth-aware face selection for its lifetime.
// On drop the selection is cleared and the previous mode restored, whatever
// path the holder leaves by.
#[must_use = "if unused the selection scope will immediately end"]
pub struct SelectionScope<'a, V: ViewportContext + ?Sized> {
    viewport: &'a mut V,
    mode: SelectionMode,
}

impl<'a, V: ViewportContext + ?Sized> SelectionScope<'a, V> {
    pub fn enter(viewport: &'a mut V) -> Self {
        let mode = viewport.selection_mode();
        viewport.set_selection_mode(SelectionMode::Face, true);
        Self { viewport, mode }
    }
}

impl<'a, V: ViewportContext + ?Sized> Deref for SelectionScope<'a, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.viewport
    }
}

impl<'a, V: ViewportContext + ?Sized> DerefMut for SelectionScope<'a, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.viewport
    }
}

impl<'a, V: ViewportContext + ?Sized> Drop for SelectionScope<'a, V> {
    fn drop(&mut self) {
        self.viewport.clear_selection();
        self.viewport.set_selection_mode(self.mode, false);
    }
}

// Vertices of the mesh visible through the active camera: faces hit by a
// full-viewport rectangle, grown `margin` times, converted to vertices.
pub fn sample_visible_vertices<V: ViewportContext + ?Sized>(
    viewport: &mut V,
    mesh: MeshId,
    margin: usize,
) -> Result<VisibilityMask> {
    let mut scope = SelectionScope::enter(viewport);

    scope.hit_test_screen_region(mesh)?;
    for _ in 0..margin {
        scope.grow_selection()?;
    }

    let mask: VisibilityMask =
        scope.selected_vertices(mesh)?.into_iter().collect();
    debug!(
        "{} vertices visible at frame {}",
        mask.len(),
        scope.current_frame()
    );
    Ok(mask)
}
