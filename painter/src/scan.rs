use log::{debug, info};

use base::defs::Result;

use crate::accumulate::DistanceMap;
use crate::host::ViewportContext;
use crate::misc::{Frame, MeshId};
use crate::progress::{CancelToken, Phase, Progress, Status};
use crate::request::{total_frames, CameraShot};
use crate::snapshot::VertexPositionTable;
use crate::visibility::sample_visible_vertices;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    Idle,
    Scanning { shot: usize, frame: Frame },
    Done,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub distances: DistanceMap,
    pub status: Status,
    // Frames whose visibility made it into `distances`.
    pub frames_scanned: usize,
}

// Walks the shots frame by frame, folding every frame's visible vertices
// into one distance map.
pub struct Scanner<'a, V: ViewportContext + ?Sized> {
    viewport: &'a mut V,
    mesh: MeshId,
    positions: &'a VertexPositionTable,
    margin: usize,
    state: ScanState,
}

impl<'a, V: ViewportContext + ?Sized> Scanner<'a, V> {
    pub fn new(
        viewport: &'a mut V,
        mesh: MeshId,
        positions: &'a VertexPositionTable,
        margin: usize,
    ) -> Self {
        Self {
            viewport,
            mesh,
            positions,
            margin,
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn run(
        &mut self,
        shots: &[CameraShot],
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<ScanOutcome> {
        let total = total_frames(shots);
        info!("scanning {} frames through {} shots", total, shots.len());

        let mut distances = DistanceMap::new();
        let mut current = 0;

        for (shot_idx, shot) in shots.iter().enumerate() {
            let res = self.scan_shot(
                shot_idx,
                shot,
                &mut distances,
                (&mut current, total),
                progress,
                cancel,
            );

            // Selection history piles up with every frame.
            self.viewport.flush_history();
            res?;

            if cancel.is_cancelled() {
                break;
            }
        }

        let status = if cancel.is_cancelled() {
            self.state = ScanState::Cancelled;
            info!(
                "scan cancelled after {} of {} frames ({} vertices seen)",
                current,
                total,
                distances.len()
            );
            Status::Cancelled
        } else {
            self.state = ScanState::Done;
            info!("scan done, {} vertices seen", distances.len());
            Status::Done
        };

        Ok(ScanOutcome {
            distances,
            status,
            frames_scanned: current,
        })
    }

    fn scan_shot(
        &mut self,
        shot_idx: usize,
        shot: &CameraShot,
        distances: &mut DistanceMap,
        (current, total): (&mut usize, usize),
        progress: &mut dyn Progress,
        cancel: &CancelToken,
    ) -> Result<()> {
        debug!(
            "looking through '{}' at frames {:?}",
            shot.camera,
            shot.frames()
        );
        self.viewport.set_active_camera(&shot.camera)?;
        self.viewport.set_current_frame(shot.start);

        for frame in shot.frames() {
            self.state = ScanState::Scanning {
                shot: shot_idx,
                frame,
            };

            let mask = sample_visible_vertices(
                &mut *self.viewport,
                self.mesh,
                self.margin,
            )?;
            let camera = self.viewport.camera_position()?;
            distances.update(&mask, self.positions, &camera)?;

            self.viewport.set_current_frame(frame + 1);
            *current += 1;

            if cancel.is_cancelled() {
                break;
            }
            progress.report(Phase::Distance, *current, total);
        }

        Ok(())
    }
}
