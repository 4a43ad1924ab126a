use std::rc::Rc;
use std::task::{Context, Poll};

use futures::FutureExt as _;

use crate::animation::scheduler::{FrameTicket, Scheduler};
use crate::animation::state::AnimationState;
use crate::capture::buffer::PixelBuffer;
use crate::capture::fallback::FallbackSynthesizer;
use crate::capture::rasterizer::{CaptureFuture, Rasterizer, SceneRasterizer};
use crate::compose::compositor::Compositor;
use crate::foundation::clock::{Clock, MonotonicClock};
use crate::foundation::core::{PixelSize, PresentationMode};
use crate::foundation::error::{RippleError, RippleResult};
use crate::fragment::tiles::fragment;
use crate::raster::surface::Surface;
use crate::region::{ContentRegion, RegionLocator};
use crate::transition::config::TransitionConfig;

/// Observable lifecycle of a transition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No run in flight; live content is shown.
    Idle,
    /// Waiting for the rasterizer (or its fallback) to produce a buffer.
    Capturing,
    /// Building the tile grid. Transient: never observed between calls.
    Fragmenting,
    /// Frames are being composited onto the surface.
    Animating,
}

impl TransitionPhase {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Fragmenting => "fragmenting",
            Self::Animating => "animating",
        }
    }
}

impl std::fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phase transition, delivered to the observer set with
/// [`TransitionController::set_phase_observer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase before the change.
    pub from: TransitionPhase,
    /// Phase after the change.
    pub to: TransitionPhase,
    /// Run the change belongs to.
    pub run: u64,
    /// Presentation mode passed to the trigger.
    pub mode: PresentationMode,
}

/// What the host should display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The live region.
    LiveContent,
    /// The controller's output surface.
    Surface,
}

/// Result of servicing a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Nothing in flight.
    Idle,
    /// Capture has not resolved yet.
    AwaitingCapture,
    /// A frame was composited at this progress.
    Rendered {
        /// Global progress of the frame.
        progress: f64,
    },
    /// The final frame ran; live content is shown again.
    Completed,
    /// Compositing failed; the run was torn down and live content is shown again.
    Aborted,
    /// The ticket belongs to a cancelled or superseded frame.
    Stale,
}

struct PendingCapture {
    region: Rc<dyn ContentRegion>,
    size: PixelSize,
    future: CaptureFuture,
}

enum Stage {
    Idle,
    Capturing(PendingCapture),
    Animating(AnimationState),
}

type PhaseObserver = Box<dyn FnMut(&PhaseChange)>;

/// Drives capture, fragmentation, and per-frame compositing for one content region.
///
/// Single-threaded and cooperative: the host calls [`Self::trigger`] on a presentation switch
/// and then [`Self::pump`] (or [`Self::on_frame`] with the pending ticket) once per display
/// frame until [`Self::wants_frame`] turns false. No error escapes; failures degrade to the
/// fallback synthesizer or to skipping straight to live content.
pub struct TransitionController<R, L, C = MonotonicClock> {
    config: TransitionConfig,
    rasterizer: R,
    fallback: FallbackSynthesizer,
    locator: L,
    clock: C,
    scheduler: Scheduler,
    compositor: Compositor,
    surface: Option<Surface>,
    stage: Stage,
    phase: TransitionPhase,
    mode: PresentationMode,
    run: u64,
    observer: Option<PhaseObserver>,
}

impl<L: RegionLocator> TransitionController<SceneRasterizer, L, MonotonicClock> {
    /// Controller using [`SceneRasterizer`] and wall-clock time, configured from `config`.
    pub fn from_config(config: TransitionConfig, locator: L) -> RippleResult<Self> {
        let rasterizer = SceneRasterizer::new(config.capture_opts()?);
        Self::new(config, rasterizer, locator, MonotonicClock::new())
    }
}

impl<R: Rasterizer, L: RegionLocator, C: Clock> TransitionController<R, L, C> {
    /// Validate `config` and assemble a controller. The fallback synthesizer uses the
    /// configured font, if any.
    pub fn new(config: TransitionConfig, rasterizer: R, locator: L, clock: C) -> RippleResult<Self> {
        config.validate()?;
        let fallback = FallbackSynthesizer::new(config.load_font()?);
        let compositor = Compositor::new(config.motion_params());
        Ok(Self {
            config,
            rasterizer,
            fallback,
            locator,
            clock,
            scheduler: Scheduler::new(),
            compositor,
            surface: None,
            stage: Stage::Idle,
            phase: TransitionPhase::Idle,
            mode: PresentationMode::default(),
            run: 0,
            observer: None,
        })
    }

    /// Replace the fallback synthesizer.
    pub fn with_fallback(mut self, fallback: FallbackSynthesizer) -> Self {
        self.fallback = fallback;
        self
    }

    /// Receive every [`PhaseChange`], including the transient fragmenting phase.
    pub fn set_phase_observer(&mut self, observer: impl FnMut(&PhaseChange) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Active configuration.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Id of the latest run (0 before the first trigger).
    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// Presentation mode of the latest trigger.
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Whether the host should show the surface or its live content.
    pub fn visibility(&self) -> Visibility {
        match self.stage {
            Stage::Animating(_) => Visibility::Surface,
            Stage::Idle | Stage::Capturing(_) => Visibility::LiveContent,
        }
    }

    /// Output surface, allocated on the first animated run.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// State of the running animation.
    pub fn animation(&self) -> Option<&AnimationState> {
        match &self.stage {
            Stage::Animating(state) => Some(state),
            Stage::Idle | Stage::Capturing(_) => None,
        }
    }

    /// Frame the scheduler is waiting for.
    pub fn pending_frame(&self) -> Option<FrameTicket> {
        self.scheduler.pending()
    }

    /// `true` while the host should keep calling [`Self::pump`].
    pub fn wants_frame(&self) -> bool {
        match self.stage {
            Stage::Idle => false,
            Stage::Capturing(_) => true,
            Stage::Animating(_) => self.scheduler.pending().is_some(),
        }
    }

    /// Start (`active = true`) or stop (`active = false`) a transition.
    ///
    /// Any run in flight is cancelled first: its pending frame is invalidated and its capture
    /// or animation state dropped before a new capture begins.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn trigger(&mut self, active: bool, mode: PresentationMode) {
        self.mode = mode;
        self.reset();
        if !active {
            self.set_phase(TransitionPhase::Idle);
            return;
        }

        self.run += 1;
        let Some(region) = self.locator.locate() else {
            let err = RippleError::missing_region("content region is not mounted");
            tracing::warn!(run = self.run, error = %err, "skipping transition");
            self.set_phase(TransitionPhase::Idle);
            return;
        };
        let size = match PixelSize::from_rect(region.bounds()) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(run = self.run, error = %e, "content region has no usable size; skipping transition");
                self.set_phase(TransitionPhase::Idle);
                return;
            }
        };

        self.set_phase(TransitionPhase::Capturing);
        let future = match self.rasterizer.capture(region.clone(), size) {
            Ok(future) => future,
            Err(e) => {
                tracing::warn!(run = self.run, error = %e, "capture failed to start; using fallback");
                let buffer = self.fallback.synthesize(region.as_ref(), size);
                futures::future::ready(Ok(buffer)).boxed_local()
            }
        };
        self.stage = Stage::Capturing(PendingCapture {
            region,
            size,
            future,
        });
        self.poll_capture();
    }

    /// Make progress: resolve a pending capture, then service the pending frame.
    pub fn pump(&mut self) -> FrameOutcome {
        if matches!(self.stage, Stage::Capturing(_)) {
            self.poll_capture();
            if matches!(self.stage, Stage::Capturing(_)) {
                return FrameOutcome::AwaitingCapture;
            }
        }
        match self.scheduler.pending() {
            Some(ticket) => self.on_frame(ticket),
            None => FrameOutcome::Idle,
        }
    }

    /// Service `ticket`: advance progress from the clock and composite one frame.
    ///
    /// Tickets other than the pending one are ignored.
    pub fn on_frame(&mut self, ticket: FrameTicket) -> FrameOutcome {
        let state = match &mut self.stage {
            Stage::Animating(state) => state,
            Stage::Capturing(_) => return FrameOutcome::AwaitingCapture,
            Stage::Idle => return FrameOutcome::Idle,
        };
        let Some(tick) = self.scheduler.tick(ticket, state, self.clock.now()) else {
            return FrameOutcome::Stale;
        };

        let drawn = match self.surface.as_mut() {
            Some(surface) => {
                self.compositor
                    .composite(state.buffer(), state.tiles(), tick.progress, surface)
            }
            None => Err(RippleError::render("no output surface")),
        };
        if let Err(e) = drawn {
            tracing::error!(run = self.run, error = %e, "compositing failed; revealing live content");
            self.reset();
            self.set_phase(TransitionPhase::Idle);
            return FrameOutcome::Aborted;
        }

        if tick.is_complete() {
            tracing::info!(run = self.run, mode = %self.mode, "transition complete");
            self.reset();
            self.set_phase(TransitionPhase::Idle);
            return FrameOutcome::Completed;
        }
        FrameOutcome::Rendered {
            progress: tick.progress,
        }
    }

    fn poll_capture(&mut self) {
        let Stage::Capturing(pending) = &mut self.stage else {
            return;
        };
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        let result = match pending.future.poll_unpin(&mut cx) {
            Poll::Pending => return,
            Poll::Ready(result) => result,
        };
        let Stage::Capturing(pending) = std::mem::replace(&mut self.stage, Stage::Idle) else {
            return;
        };

        let buffer = match result.and_then(|b| check_capture(b, pending.size)) {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!(run = self.run, error = %e, "capture failed; using fallback");
                self.fallback.synthesize(pending.region.as_ref(), pending.size)
            }
        };
        self.begin_animation(buffer);
    }

    fn begin_animation(&mut self, buffer: PixelBuffer) {
        self.set_phase(TransitionPhase::Fragmenting);
        if let Err(e) = self.try_begin_animation(buffer) {
            tracing::error!(run = self.run, error = %e, "could not start animation; revealing live content");
            self.reset();
            self.set_phase(TransitionPhase::Idle);
        }
    }

    fn try_begin_animation(&mut self, buffer: PixelBuffer) -> RippleResult<()> {
        let tiles = fragment(buffer.size(), self.config.fragment_params())?;
        match self.surface.as_mut() {
            Some(surface) => surface.resize(buffer.size())?,
            None => self.surface = Some(Surface::new(buffer.size())?),
        }

        tracing::debug!(
            run = self.run,
            width = buffer.width(),
            height = buffer.height(),
            tiles = tiles.len(),
            "starting animation"
        );
        let state = AnimationState::new(
            self.run,
            self.clock.now(),
            self.config.duration(),
            buffer,
            tiles,
        );
        self.stage = Stage::Animating(state);
        self.scheduler.request();
        self.set_phase(TransitionPhase::Animating);
        Ok(())
    }

    /// Cancel the pending frame, drop capture and animation state, and blank the surface.
    fn reset(&mut self) {
        self.scheduler.cancel();
        self.stage = Stage::Idle;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
    }

    fn set_phase(&mut self, to: TransitionPhase) {
        if self.phase == to {
            return;
        }
        let change = PhaseChange {
            from: self.phase,
            to,
            run: self.run,
            mode: self.mode,
        };
        self.phase = to;
        tracing::debug!(from = %change.from, to = %change.to, mode = %change.mode, run = change.run, "phase change");
        if let Some(observer) = self.observer.as_mut() {
            observer(&change);
        }
    }
}

fn check_capture(buffer: PixelBuffer, expected: PixelSize) -> RippleResult<PixelBuffer> {
    if buffer.size() != expected {
        return Err(RippleError::capture(format!(
            "captured {}x{}, expected {}x{}",
            buffer.width(),
            buffer.height(),
            expected.width,
            expected.height
        )));
    }
    Ok(buffer)
}

impl<R, L, C> std::fmt::Debug for TransitionController<R, L, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("phase", &self.phase)
            .field("run", &self.run)
            .field("mode", &self.mode)
            .field("pending_frame", &self.scheduler.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/controller.rs"]
mod tests;
