use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use derive_more::Display;
use log::info;

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Phase {
    #[display(fmt = "calculating distances")]
    Distance,
    #[display(fmt = "painting vertices")]
    Color,
}

pub trait Progress {
    // Called once per unit with a monotonically increasing `current`.
    fn report(&mut self, phase: Phase, current: usize, total: usize);
}

pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _phase: Phase, _current: usize, _total: usize) {}
}

// Logs every tenth of a phase.
#[derive(Default)]
pub struct LogProgress {
    last_decile: Option<(Phase, usize)>,
}

impl Progress for LogProgress {
    fn report(&mut self, phase: Phase, current: usize, total: usize) {
        let decile = if total == 0 { 10 } else { current * 10 / total };
        if self.last_decile != Some((phase, decile)) {
            self.last_decile = Some((phase, decile));
            info!("  {}: {}/{}", phase, current, total);
        }
    }
}

// Cooperative cancellation flag, polled by long running operations.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Status {
    #[display(fmt = "done")]
    Done,
    #[display(fmt = "cancelled")]
    Cancelled,
}
