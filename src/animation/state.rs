use std::time::Duration;

use crate::capture::buffer::PixelBuffer;
use crate::fragment::tiles::Tile;

/// Everything one run animates: the captured buffer, its tiles, and the current progress.
///
/// Owned exclusively by the controller; the scheduler advances `progress` and the
/// compositor only reads it.
#[derive(Clone, Debug)]
pub struct AnimationState {
    run: u64,
    started_at: Duration,
    duration: Duration,
    progress: f64,
    buffer: PixelBuffer,
    tiles: Vec<Tile>,
}

impl AnimationState {
    /// Fresh state at progress 0.
    pub fn new(
        run: u64,
        started_at: Duration,
        duration: Duration,
        buffer: PixelBuffer,
        tiles: Vec<Tile>,
    ) -> Self {
        Self {
            run,
            started_at,
            duration,
            progress: 0.0,
            buffer,
            tiles,
        }
    }

    /// Id of the transition run this state belongs to.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Clock reading the run started at.
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    /// Total wall-clock duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Global progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Captured pixels.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Tile partition of [`Self::buffer`].
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// `true` once progress has reached 1.
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub(crate) fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
    }
}
