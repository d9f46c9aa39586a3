use std::path::PathBuf;

use log::info;
use structopt::StructOpt;

use base::defs::{Error, ErrorKind::*, Result};
use base::util::cli;

use crate::export_obj::ObjOutput;
use crate::host::Scene;
use crate::misc::{color, Color, MeshId};
use crate::scene_file::load_scene;
use crate::snapshot::resolve_target;

#[derive(StructOpt)]
#[structopt(about = "Paint every vertex of a mesh with one color")]
pub struct FloodCommand {
    #[structopt(help = "Input scene .json file")]
    scene_path: PathBuf,

    #[structopt(help = "Mesh to paint", long, short = "t")]
    target: String,

    #[structopt(help = "Color in 'R,G,B' format", long, short = "c")]
    color: cli::Array<f64, 3>,

    #[structopt(flatten)]
    output: ObjOutput,
}

impl FloodCommand {
    pub fn run(&self) -> Result<()> {
        let (mut scene, _) = load_scene(&self.scene_path)?;
        let color = color(self.color.0);
        let mesh = flood_vertices(&mut scene, &self.target, color)?;
        let mut writer = self.output.get()?;
        scene.write_obj(mesh, writer.as_mut())
    }
}

pub fn check_color(c: Color) -> Result<Color> {
    if c.iter().all(|v| v.is_finite()) {
        Ok(c)
    } else {
        let desc = format!("bad color ({}, {}, {})", c[0], c[1], c[2]);
        Err(Error::new(MalformedData, desc))
    }
}

// Sets every vertex of the target to `color`, whatever it held before.
pub fn flood_vertices<S: Scene + ?Sized>(
    scene: &mut S,
    target: &str,
    color: Color,
) -> Result<MeshId> {
    let color = check_color(color)?;
    let mesh = resolve_target(scene, target)?;
    scene.flood_vertex_colors(mesh, color)?;
    info!(
        "flooded '{}' with ({:.3}, {:.3}, {:.3})",
        target, color[0], color[1], color[2]
    );
    Ok(mesh)
}
