use std::ops::Index;

use log::{debug, info};

use base::defs::{Error, ErrorKind::*, Result};

use crate::host::Scene;
use crate::misc::{MeshId, Point3};

// World-space vertex positions captured once before a scan. Indices stay
// valid for the whole scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexPositionTable {
    positions: Vec<Point3>,
}

impl VertexPositionTable {
    pub fn new(positions: Vec<Point3>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point3> {
        self.positions.get(index)
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.positions
    }
}

impl Index<usize> for VertexPositionTable {
    type Output = Point3;

    fn index(&self, index: usize) -> &Point3 {
        &self.positions[index]
    }
}

pub fn resolve_target<S: Scene + ?Sized>(
    scene: &S,
    target: &str,
) -> Result<MeshId> {
    let meshes = scene.resolve_meshes(target);
    match meshes.as_slice() {
        [mesh] => Ok(*mesh),
        [] => Err(Error::new(
            InvalidTarget,
            format!("no mesh matches target '{}'", target),
        )),
        _ => Err(Error::new(
            InvalidTarget,
            format!(
                "{} meshes match target '{}' (exactly one expected)",
                meshes.len(),
                target
            ),
        )),
    }
}

pub fn capture<S: Scene + ?Sized>(
    scene: &S,
    target: &str,
) -> Result<(MeshId, VertexPositionTable)> {
    let mesh = resolve_target(scene, target)?;
    debug!("capturing vertex positions of '{}'", target);
    let positions = scene.world_positions(mesh)?;
    info!("captured {} vertex positions of '{}'", positions.len(), target);
    Ok((mesh, VertexPositionTable::new(positions)))
}
