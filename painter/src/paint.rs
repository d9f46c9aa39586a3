use std::path::PathBuf;

use log::{info, warn};
use structopt::StructOpt;

use base::defs::{Error, ErrorKind::*, Result};
use base::util::cli::{parse_key_val, Array as CliArray};

use crate::color_map::{assign_vertex_colors, ColorOutcome};
use crate::export_obj::ObjOutput;
use crate::flood::check_color;
use crate::host::{Scene, ViewportContext};
use crate::misc::{color, Frame, MeshId};
use crate::progress::{CancelToken, LogProgress, Progress, Status};
use crate::ramp::{ColorRamp, Interpolation, RampPreset, RampStop};
use crate::request::{CameraShot, ScanRequest};
use crate::scan::{ScanOutcome, Scanner};
use crate::scene_file::load_scene;
use crate::snapshot::capture;

#[derive(StructOpt)]
#[structopt(about = "Paint mesh vertices by their proximity to cameras")]
pub struct PaintCommand {
    #[structopt(help = "Input scene .json file")]
    scene_path: PathBuf,

    #[structopt(help = "Mesh to paint", long, short = "t")]
    target: String,

    #[structopt(
        help = concat!("Camera shot in form 'camera=first,last' ",
            "(shots of the scene if omitted)"),
        long = "shot",
        number_of_values = 1,
        parse(try_from_str = parse_key_val),
        short = "s"
    )]
    shots: Vec<(String, CliArray<Frame, 2>)>,

    #[structopt(
        help = "Number of face rings to add around visible faces",
        default_value = "0",
        long,
        short = "m"
    )]
    margin: usize,

    #[structopt(
        help = "Color ramp preset ('Custom', 'Zbrush Remesh' or 'Heat Map')",
        long,
        short = "p"
    )]
    ramp_preset: Option<RampPreset>,

    #[structopt(
        help = "Color ramp stop in form 'position=r,g,b'",
        conflicts_with = "ramp-preset",
        long = "ramp-stop",
        number_of_values = 1,
        parse(try_from_str = parse_key_val)
    )]
    ramp_stops: Vec<(f64, CliArray<f64, 3>)>,

    #[structopt(help = "Smooth color ramp interpolation", long)]
    smooth: bool,

    #[structopt(
        help = "Color of vertices never seen by cameras in 'R,G,B' format",
        long,
        short = "u"
    )]
    unseen_color: Option<CliArray<f64, 3>>,

    #[structopt(flatten)]
    output: ObjOutput,
}

impl PaintCommand {
    pub fn run(&self) -> Result<()> {
        let (mut scene, scene_shots) = load_scene(&self.scene_path)?;

        let shots = if self.shots.is_empty() {
            scene_shots
        } else {
            self.shots
                .iter()
                .map(|(cam, range)| {
                    CameraShot::from_inclusive(cam, range.0[0], range.0[1])
                })
                .collect::<Result<Vec<_>>>()?
        };

        let unseen_color = self
            .unseen_color
            .map(|c| check_color(color(c.0)))
            .transpose()?;

        let request = ScanRequest::builder(&self.target)
            .shots(shots)
            .margin(self.margin)
            .ramp(self.ramp()?)
            .unseen_color(unseen_color)
            .build()?;

        let outcome = paint(
            &mut scene,
            &request,
            &mut LogProgress::default(),
            &CancelToken::new(),
        )?;

        let mut writer = self.output.get()?;
        scene.write_obj(outcome.mesh, writer.as_mut())
    }

    fn ramp(&self) -> Result<ColorRamp> {
        let ramp = if self.ramp_stops.is_empty() {
            let preset = self.ramp_preset.unwrap_or(RampPreset::Custom);
            ColorRamp::from_preset(preset)
        } else {
            let stops = self
                .ramp_stops
                .iter()
                .map(|(pos, rgb)| RampStop::new(*pos, rgb.0))
                .collect();
            ColorRamp::new(stops)?
        };

        Ok(if self.smooth {
            ramp.with_interpolation(Interpolation::Smooth)
        } else {
            ramp
        })
    }
}

#[derive(Clone, Debug)]
pub struct PaintOutcome {
    pub mesh: MeshId,
    pub scan: ScanOutcome,
    // Absent if the scan was cancelled before anything was seen.
    pub colors: Option<ColorOutcome>,
    pub status: Status,
}

// Scans the target through the requested shots and colors it by the
// minimum camera distance of every vertex. Vertices never seen keep their
// color, or get `unseen_color` when requested.
//
// Cancelling during the scan still paints what was seen so far; the token
// is then reset so that the painting itself can be cancelled separately.
pub fn paint<H: Scene + ViewportContext + ?Sized>(
    host: &mut H,
    request: &ScanRequest,
    progress: &mut dyn Progress,
    cancel: &CancelToken,
) -> Result<PaintOutcome> {
    let unknown = request.shots.iter().find(|s| !host.has_camera(&s.camera));
    if let Some(shot) = unknown {
        let desc = format!("unknown camera '{}'", shot.camera);
        return Err(Error::new(InvalidTarget, desc));
    }

    info!("painting '{}'...", request.target);
    let (mesh, positions) = capture(&*host, &request.target)?;

    let mut scanner =
        Scanner::new(&mut *host, mesh, &positions, request.margin);
    let scan = scanner.run(&request.shots, progress, cancel)?;

    if scan.distances.is_empty() {
        if scan.status == Status::Cancelled {
            warn!("scan cancelled before any vertex was seen");
            return Ok(PaintOutcome {
                mesh,
                scan,
                colors: None,
                status: Status::Cancelled,
            });
        }
        let desc = format!("no vertex of '{}' is visible", request.target);
        return Err(Error::new(NoVisibleVertices, desc));
    }

    if let Some(unseen) = request.unseen_color {
        host.flood_vertex_colors(mesh, unseen)?;
    }

    cancel.reset();
    let colors = assign_vertex_colors(
        &mut *host,
        mesh,
        &scan.distances,
        &request.ramp,
        progress,
        cancel,
    )?;

    let status = if scan.status == Status::Cancelled {
        Status::Cancelled
    } else {
        colors.status
    };
    info!("painting of '{}' {}", request.target, status);

    Ok(PaintOutcome {
        mesh,
        scan,
        colors: Some(colors),
        status,
    })
}
