use crate::foundation::error::{RippleError, RippleResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest side length a raster surface may have (`vello_cpu` pixmaps are `u16`-sized).
pub const MAX_SURFACE_SIDE: u32 = u16::MAX as u32;

/// Integer pixel dimensions of a capture, buffer, or surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Create a validated size: both sides must be in `1..=MAX_SURFACE_SIDE`.
    pub fn new(width: u32, height: u32) -> RippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(RippleError::validation(format!(
                "pixel size must be non-zero, got {width}x{height}"
            )));
        }
        if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
            return Err(RippleError::validation(format!(
                "pixel size {width}x{height} exceeds {MAX_SURFACE_SIDE} per side"
            )));
        }
        Ok(Self { width, height })
    }

    /// Size covering a layout rectangle, rounding each side to the nearest pixel.
    pub fn from_rect(rect: Rect) -> RippleResult<Self> {
        let w = rect.width().abs().round();
        let h = rect.height().abs().round();
        if !w.is_finite() || !h.is_finite() {
            return Err(RippleError::validation("region bounds are not finite"));
        }
        Self::new(w as u32, h as u32)
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Number of RGBA8 bytes needed to store this size.
    pub fn byte_len(self) -> usize {
        self.area().saturating_mul(4)
    }

    /// Geometric center in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Presentation of the data list the host is switching between.
///
/// Only used for bookkeeping and logs; it never changes animation parameters.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// One row per item.
    List,
    /// Large cards.
    #[default]
    Card,
    /// Dense grid of cells.
    Grid,
}

impl PresentationMode {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Card => "card",
            Self::Grid => "grid",
        }
    }
}

impl std::fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Pixel bytes in straight RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}
