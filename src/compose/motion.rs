use std::f64::consts::{FRAC_PI_2, PI};

use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::clamp01;
use crate::fragment::tiles::Tile;

/// Shape of each tile's local animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// Share of the global progress range one tile's animation spans.
    pub active_window: f64,
    /// Peak wave offset in pixels.
    pub wave_amplitude: f64,
    /// Rotation amplitude in radians.
    pub rotation_scale: f64,
    /// Scale at fragment progress 0.
    pub scale_start: f64,
    /// Scale lost between fragment progress 0 and 1.
    pub scale_span: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            active_window: 0.6,
            wave_amplitude: 20.0,
            rotation_scale: 0.08,
            scale_start: 1.2,
            scale_span: 0.3,
        }
    }
}

impl MotionParams {
    /// Reject non-finite values and a non-positive active window.
    pub fn validate(&self) -> RippleResult<()> {
        let all = [
            ("active_window", self.active_window),
            ("wave_amplitude", self.wave_amplitude),
            ("rotation_scale", self.rotation_scale),
            ("scale_start", self.scale_start),
            ("scale_span", self.scale_span),
        ];
        if let Some((name, _)) = all.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RippleError::validation(format!("{name} must be finite")));
        }
        if self.active_window <= 0.0 {
            return Err(RippleError::validation("active_window must be > 0"));
        }
        Ok(())
    }
}

/// Local progress of a tile: 0 until `progress` passes `delay`, then a linear ramp that
/// saturates at 1 after `active_window`.
pub fn fragment_progress(progress: f64, delay: f64, active_window: f64) -> f64 {
    if progress <= delay || active_window <= 0.0 {
        return 0.0;
    }
    clamp01((progress - delay) / active_window)
}

/// Per-tile transform inputs, a pure function of fragment progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMotion {
    /// Offset applied on both axes, in pixels.
    pub wave: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Global alpha in `[0, 1]`.
    pub opacity: f64,
    /// Rotation in radians.
    pub rotation: f64,
}

impl TileMotion {
    /// Motion at fragment progress `fp` (clamped into `[0, 1]`).
    pub fn at(fp: f64, params: &MotionParams) -> Self {
        let fp = clamp01(fp);
        Self {
            wave: (fp * PI).sin() * params.wave_amplitude * (1.0 - fp),
            scale: params.scale_start - fp * params.scale_span,
            opacity: clamp01((fp * FRAC_PI_2).cos()),
            rotation: fp * params.rotation_scale * (fp * PI * 3.0).sin(),
        }
    }
}

/// Map tile-local pixels (origin at the tile's top-left) to surface coordinates: scale and
/// rotate about the tile centroid, then shift by `wave` on both axes.
pub fn tile_transform(tile: &Tile, motion: &TileMotion) -> Affine {
    let center = tile.center().to_vec2() + Vec2::new(motion.wave, motion.wave);
    let half = Vec2::new(f64::from(tile.width) / 2.0, f64::from(tile.height) / 2.0);
    Affine::translate(center)
        * Affine::rotate(motion.rotation)
        * Affine::scale(motion.scale)
        * Affine::translate(-half)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/motion.rs"]
mod tests;
