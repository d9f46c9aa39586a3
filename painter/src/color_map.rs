use log::info;

use base::defs::{Error, ErrorKind::*, Result};

use crate::accumulate::DistanceMap;
use crate::host::Scene;
use crate::misc::{Color, MeshId};
use crate::progress::{CancelToken, Phase, Progress, Status};
use crate::ramp::ColorRamp;

// Second ramp coordinate used for lookups, irrelevant for 1D ramps.
const RAMP_V: f64 = 0.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorBatch {
    pub indices: Vec<usize>,
    pub colors: Vec<Color>,
}

#[derive(Clone, Debug)]
pub struct ColorOutcome {
    pub batch: ColorBatch,
    pub status: Status,
}

// Maps every distance to [0, 1] relative to the observed extremes. All
// values become 0 when the extremes coincide.
pub fn normalize(distances: &DistanceMap) -> Result<Vec<(usize, f64)>> {
    let (min, max) = match (distances.min_entry(), distances.max_entry()) {
        (Some((_, min)), Some((_, max))) => (min, max),
        _ => {
            let desc = "no visible vertices to color".to_string();
            return Err(Error::new(NoVisibleVertices, desc));
        }
    };

    let range = max - min;
    Ok(distances
        .iter()
        .map(|(i, d)| {
            let t = if range > 0.0 {
                ((d - min) / range).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (i, t)
        })
        .collect())
}

// Looks colors up without touching the scene. On cancellation the batch
// holds the entries processed so far.
pub fn map_colors(
    distances: &DistanceMap,
    ramp: &ColorRamp,
    progress: &mut dyn Progress,
    cancel: &CancelToken,
) -> Result<ColorOutcome> {
    let normalized = normalize(distances)?;
    let total = normalized.len();

    let mut batch = ColorBatch {
        indices: Vec::with_capacity(total),
        colors: Vec::with_capacity(total),
    };
    let mut status = Status::Done;

    for (n, (i, t)) in normalized.into_iter().enumerate() {
        batch.indices.push(i);
        batch.colors.push(ramp.sample(t, RAMP_V));

        if cancel.is_cancelled() {
            status = Status::Cancelled;
            break;
        }
        progress.report(Phase::Color, n + 1, total);
    }

    Ok(ColorOutcome { batch, status })
}

// Colors the mesh from the distances in a single batch write. A cancelled
// pass still commits the colors it has computed.
pub fn assign_vertex_colors<S: Scene + ?Sized>(
    scene: &mut S,
    mesh: MeshId,
    distances: &DistanceMap,
    ramp: &ColorRamp,
    progress: &mut dyn Progress,
    cancel: &CancelToken,
) -> Result<ColorOutcome> {
    let outcome = map_colors(distances, ramp, progress, cancel)?;
    scene.set_vertex_colors(
        mesh,
        &outcome.batch.indices,
        &outcome.batch.colors,
    )?;
    info!(
        "painted {} of {} vertices ({})",
        outcome.batch.indices.len(),
        distances.len(),
        outcome.status
    );
    Ok(outcome)
}
