use crate::capture::buffer::PixelBuffer;
use crate::compose::motion::{MotionParams, TileMotion, fragment_progress, tile_transform};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{RippleError, RippleResult};
use crate::fragment::tiles::Tile;
use crate::raster::paint::{affine_to_cpu, image_from_straight_rgba, new_context};
use crate::raster::surface::Surface;

/// Below half an 8-bit alpha step a tile contributes nothing visible.
const MIN_VISIBLE_OPACITY: f64 = 0.5 / 255.0;

const TILE_FILL: Rgba8 = Rgba8::opaque(0xff, 0xff, 0xff);
const TILE_BORDER: Rgba8 = Rgba8::opaque(0xe5, 0xe7, 0xeb);
const TILE_TAG: Rgba8 = Rgba8::opaque(0xf1, 0xf5, 0xf9);
const TILE_TAG_RECT: (u32, u32, u32, u32) = (5, 20, 40, 15);

/// Stand-in pixels for a tile whose captured region holds nothing visible.
///
/// White fill, a 1px light border and a small tag box, clipped to the tile.
pub fn placeholder_tile(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(width as usize * height as usize * 4);
    let (tx, ty, tw, th) = TILE_TAG_RECT;
    for y in 0..height {
        for x in 0..width {
            let edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            let tag = (tx..tx + tw).contains(&x) && (ty..ty + th).contains(&y);
            let c = if edge {
                TILE_BORDER
            } else if tag {
                TILE_TAG
            } else {
                TILE_FILL
            };
            out.extend_from_slice(&c.to_array());
        }
    }
    out
}

/// Force every painted pixel to full opacity.
///
/// Pixels with any non-zero channel (including color with a spurious zero alpha) become
/// opaque; fully transparent black stays transparent. Applying it twice changes nothing.
pub fn alpha_correct(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        if px.iter().any(|&c| c != 0) {
            px[3] = 255;
        }
    }
}

/// Copy the straight RGBA8 pixels under `tile` out of `buffer`.
pub fn extract_tile(buffer: &PixelBuffer, tile: &Tile) -> RippleResult<Vec<u8>> {
    let x1 = tile.x.saturating_add(tile.width);
    let y1 = tile.y.saturating_add(tile.height);
    if x1 > buffer.width() || y1 > buffer.height() {
        return Err(RippleError::render(format!(
            "tile ({}, {}) {}x{} exceeds buffer {}x{}",
            tile.x,
            tile.y,
            tile.width,
            tile.height,
            buffer.width(),
            buffer.height()
        )));
    }
    let stride = buffer.width() as usize * 4;
    let row_len = tile.width as usize * 4;
    let mut out = Vec::with_capacity(row_len * tile.height as usize);
    for y in tile.y..y1 {
        let start = y as usize * stride + tile.x as usize * 4;
        out.extend_from_slice(&buffer.data()[start..start + row_len]);
    }
    Ok(out)
}

/// Tile counts for one composited frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Tiles drawn onto the surface.
    pub drawn: usize,
    /// Tiles skipped: before their delay, fully faded, or empty.
    pub hidden: usize,
    /// Drawn tiles whose pixels were all transparent and got [`placeholder_tile`].
    pub substituted: usize,
}

/// Per-frame renderer of tiles onto a [`Surface`].
///
/// Reads its inputs only, so redrawing the same progress gives the same pixels.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    params: MotionParams,
}

impl Compositor {
    /// Compositor using `params` for every tile.
    pub fn new(params: MotionParams) -> Self {
        Self { params }
    }

    /// Motion parameters.
    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// Clear `surface` and draw every visible tile of `buffer` at global `progress`.
    pub fn composite(
        &self,
        buffer: &PixelBuffer,
        tiles: &[Tile],
        progress: f64,
        surface: &mut Surface,
    ) -> RippleResult<CompositeStats> {
        if surface.size() != buffer.size() {
            return Err(RippleError::render(format!(
                "surface {}x{} does not match buffer {}x{}",
                surface.size().width,
                surface.size().height,
                buffer.width(),
                buffer.height()
            )));
        }
        surface.clear();

        let mut ctx = new_context(surface.size())?;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let mut stats = CompositeStats::default();
        for tile in tiles {
            let fp = fragment_progress(progress, tile.delay, self.params.active_window);
            if fp <= 0.0 || tile.is_empty() {
                stats.hidden += 1;
                continue;
            }
            let motion = TileMotion::at(fp, &self.params);
            if motion.opacity < MIN_VISIBLE_OPACITY {
                stats.hidden += 1;
                continue;
            }

            let mut pixels = extract_tile(buffer, tile)?;
            if pixels.chunks_exact(4).all(|px| px[3] == 0) {
                pixels = placeholder_tile(tile.width, tile.height);
                stats.substituted += 1;
            }
            alpha_correct(&mut pixels);
            let image = image_from_straight_rgba(&pixels, tile.width, tile.height)?;

            ctx.set_transform(affine_to_cpu(tile_transform(tile, &motion)));
            ctx.set_paint(image);
            ctx.push_opacity_layer(motion.opacity as f32);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(tile.width),
                f64::from(tile.height),
            ));
            ctx.pop_layer();
            stats.drawn += 1;
        }

        if stats.drawn > 0 {
            ctx.flush();
            ctx.render_to_pixmap(surface.pixmap_mut());
        }
        tracing::trace!(
            progress,
            drawn = stats.drawn,
            hidden = stats.hidden,
            substituted = stats.substituted,
            "composited"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
