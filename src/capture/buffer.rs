use std::sync::Arc;

use crate::foundation::core::{PixelSize, Rgba8};
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Immutable straight-alpha RGBA8 snapshot of a region.
///
/// Clones share the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: PixelSize,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    /// Wrap tightly packed, row-major RGBA8 bytes. `data.len()` must be `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RippleResult<Self> {
        let size = PixelSize::new(width, height)?;
        if data.len() != size.byte_len() {
            return Err(RippleError::validation(format!(
                "pixel buffer expects {} bytes for {width}x{height}, got {}",
                size.byte_len(),
                data.len()
            )));
        }
        Ok(Self {
            size,
            data: data.into(),
        })
    }

    /// Buffer filled with one color.
    pub fn filled(size: PixelSize, color: Rgba8) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity(size.byte_len());
        for _ in 0..size.area() {
            data.extend_from_slice(&px);
        }
        Self {
            size,
            data: data.into(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Dimensions.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let p = &self.data[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// `true` if at least one pixel has non-zero alpha.
    pub fn has_visible_pixel(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] > 0)
    }

    /// Alpha/color histogram used for capture diagnostics.
    pub fn stats(&self) -> PixelStats {
        let mut s = PixelStats {
            total: self.size.area(),
            ..PixelStats::default()
        };
        for px in self.data.chunks_exact(4) {
            match px[3] {
                0 => s.transparent += 1,
                255 => {
                    s.opaque += 1;
                    if px[0] == 255 && px[1] == 255 && px[2] == 255 {
                        s.white += 1;
                    } else {
                        s.colored += 1;
                    }
                }
                _ => s.semi_transparent += 1,
            }
        }
        s
    }

    /// Copy into an `image` buffer (e.g. for PNG output).
    pub fn to_rgba_image(&self) -> RippleResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.size.width, self.size.height, self.data.to_vec())
            .ok_or_else(|| RippleError::validation("pixel buffer does not match its dimensions"))
    }

    pub(crate) fn from_premul_pixmap(pixmap: &vello_cpu::Pixmap) -> RippleResult<Self> {
        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Self::new(u32::from(pixmap.width()), u32::from(pixmap.height()), data)
    }
}

/// Pixel histogram of a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelStats {
    /// Number of pixels.
    pub total: usize,
    /// Pixels with alpha 0.
    pub transparent: usize,
    /// Pixels with alpha 255.
    pub opaque: usize,
    /// Pixels with alpha strictly between 0 and 255.
    pub semi_transparent: usize,
    /// Opaque pure-white pixels.
    pub white: usize,
    /// Opaque pixels that are not pure white.
    pub colored: usize,
}

impl PixelStats {
    /// Share of opaque pixels in percent (0 for an empty histogram).
    pub fn opaque_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.opaque as f64) * 100.0 / (self.total as f64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/buffer.rs"]
mod tests;
