use std::time::Duration;

use crate::animation::state::AnimationState;
use crate::foundation::math::clamp01;

/// Handle for one requested frame.
///
/// Only the most recently requested ticket is honored; everything else is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameTicket(u64);

impl FrameTicket {
    /// Monotonic id, unique for the scheduler that issued it.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Result of servicing a current ticket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Progress after this tick.
    pub progress: f64,
    /// Follow-up frame, present while progress < 1.
    pub next: Option<FrameTicket>,
}

impl Tick {
    /// `true` when this was the final tick of the run.
    pub fn is_complete(&self) -> bool {
        self.next.is_none()
    }
}

/// `clamp((now - started_at) / duration, 0, 1)`; a zero duration is immediately complete.
pub fn progress_at(started_at: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started_at);
    clamp01(elapsed.as_secs_f64() / duration.as_secs_f64())
}

/// Single frame loop keyed to elapsed time.
///
/// At most one ticket is pending at a time, so two runs can never tick the same surface.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Option<FrameTicket>,
}

impl Scheduler {
    /// Scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame, replacing (and thereby invalidating) any pending one.
    pub fn request(&mut self) -> FrameTicket {
        self.next_id += 1;
        let ticket = FrameTicket(self.next_id);
        self.pending = Some(ticket);
        ticket
    }

    /// Currently pending ticket.
    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// `true` if `ticket` is the pending one.
    pub fn is_current(&self, ticket: FrameTicket) -> bool {
        self.pending == Some(ticket)
    }

    /// Drop the pending ticket; returns it if there was one.
    pub fn cancel(&mut self) -> Option<FrameTicket> {
        let prev = self.pending.take();
        if let Some(t) = prev {
            tracing::debug!(ticket = t.id(), "cancelled pending frame");
        }
        prev
    }

    /// Service `ticket` at clock reading `now`.
    ///
    /// Returns `None` for stale tickets. Otherwise advances `state.progress` (never
    /// backwards) and requests the next frame while progress < 1.
    pub fn tick(
        &mut self,
        ticket: FrameTicket,
        state: &mut AnimationState,
        now: Duration,
    ) -> Option<Tick> {
        if !self.is_current(ticket) {
            tracing::trace!(ticket = ticket.id(), "ignoring stale frame");
            return None;
        }
        self.pending = None;

        let progress = progress_at(state.started_at(), state.duration(), now).max(state.progress());
        state.set_progress(progress);

        let next = (progress < 1.0).then(|| self.request());
        Some(Tick { progress, next })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
