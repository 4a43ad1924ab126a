use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::color::ColorResolver;
use crate::capture::rasterizer::CaptureOpts;
use crate::capture::text::FontBytes;
use crate::compose::motion::MotionParams;
use crate::foundation::error::{RippleError, RippleResult};
use crate::fragment::tiles::FragmentParams;

/// Tunables for a transition. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Tiles per side.
    pub grid_size: u32,
    /// Delay of the tile(s) farthest from the center.
    pub delay_scale: f64,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Share of the progress range one tile's animation spans.
    pub active_window: f64,
    /// Peak wave offset in pixels.
    pub wave_amplitude_px: f64,
    /// Rotation amplitude in radians.
    pub rotation_scale: f64,
    /// Tile scale at the start of its animation.
    pub scale_start: f64,
    /// Scale lost over a tile's animation.
    pub scale_span: f64,
    /// Color painted under the region before capture.
    pub capture_background: String,
    /// TTF/OTF used to draw text; text is skipped when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        let fragment = FragmentParams::default();
        let motion = MotionParams::default();
        Self {
            grid_size: fragment.grid_size,
            delay_scale: fragment.delay_scale,
            duration_ms: 1500,
            active_window: motion.active_window,
            wave_amplitude_px: motion.wave_amplitude,
            rotation_scale: motion.rotation_scale,
            scale_start: motion.scale_start,
            scale_span: motion.scale_span,
            capture_background: "#ffffff".to_owned(),
            font_path: None,
        }
    }
}

impl TransitionConfig {
    /// Parse and validate JSON.
    pub fn from_json_str(s: &str) -> RippleResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| RippleError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RippleResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            RippleError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> RippleResult<()> {
        self.fragment_params().validate()?;
        self.motion_params().validate()?;
        if self.duration_ms == 0 {
            return Err(RippleError::validation("duration_ms must be > 0"));
        }
        ColorResolver::default()
            .resolve(&self.capture_background)
            .map_err(|e| RippleError::validation(format!("capture_background: {e}")))?;
        Ok(())
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Grid parameters for the fragmenter.
    pub fn fragment_params(&self) -> FragmentParams {
        FragmentParams {
            grid_size: self.grid_size,
            delay_scale: self.delay_scale,
        }
    }

    /// Per-tile motion parameters for the compositor.
    pub fn motion_params(&self) -> MotionParams {
        MotionParams {
            active_window: self.active_window,
            wave_amplitude: self.wave_amplitude_px,
            rotation_scale: self.rotation_scale,
            scale_start: self.scale_start,
            scale_span: self.scale_span,
        }
    }

    /// Load the configured font, if any.
    pub fn load_font(&self) -> RippleResult<Option<FontBytes>> {
        self.font_path.as_deref().map(FontBytes::from_path).transpose()
    }

    /// Rasterizer options: resolved background plus the configured font.
    pub fn capture_opts(&self) -> RippleResult<CaptureOpts> {
        let colors = ColorResolver::default();
        let background = colors
            .resolve(&self.capture_background)
            .map_err(|e| RippleError::validation(format!("capture_background: {e}")))?;
        Ok(CaptureOpts {
            background,
            colors,
            font: self.load_font()?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/config.rs"]
mod tests;
