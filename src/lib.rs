//! ripplefx is a tile-ripple view-transition compositor.
//!
//! When a host switches how a data list is presented, ripplefx snapshots the on-screen region,
//! shatters the snapshot into a grid of tiles, and plays a center-out wave over an off-screen
//! surface while the new layout settles underneath:
//!
//! - A [`Rasterizer`] captures the region into a [`PixelBuffer`]; on any failure the
//!   [`FallbackSynthesizer`] draws a structurally similar stand-in
//! - [`fragment`] partitions the buffer into [`Tile`]s with distance-based delays
//! - The [`Scheduler`] turns elapsed time into progress and the [`Compositor`] draws each frame
//! - The [`TransitionController`] owns all of it and tells the host what to show
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod capture;
mod compose;
mod foundation;
mod fragment;
mod raster;
mod region;
mod transition;

pub use crate::foundation::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::foundation::core::{
    Affine, MAX_SURFACE_SIDE, PixelSize, Point, PresentationMode, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{RippleError, RippleResult};

pub use crate::region::element::{Bounds, Descendants, Element, ElementRole, ElementStyle};
pub use crate::region::{ContentRegion, RegionLocator, RegionSlot, StaticRegion};

pub use crate::capture::buffer::{PixelBuffer, PixelStats};
pub use crate::capture::color::ColorResolver;
pub use crate::capture::fallback::{FallbackSynthesizer, placeholder_bands};
pub use crate::capture::rasterizer::{CaptureFuture, CaptureOpts, Rasterizer, SceneRasterizer};
pub use crate::capture::text::FontBytes;

pub use crate::fragment::tiles::{FragmentParams, MAX_GRID_SIZE, Tile, fragment};

pub use crate::animation::scheduler::{FrameTicket, Scheduler, Tick, progress_at};
pub use crate::animation::state::AnimationState;

pub use crate::compose::compositor::{
    CompositeStats, Compositor, alpha_correct, extract_tile, placeholder_tile,
};
pub use crate::compose::motion::{MotionParams, TileMotion, fragment_progress, tile_transform};
pub use crate::raster::surface::Surface;

pub use crate::transition::config::TransitionConfig;
pub use crate::transition::controller::{
    FrameOutcome, PhaseChange, TransitionController, TransitionPhase, Visibility,
};
