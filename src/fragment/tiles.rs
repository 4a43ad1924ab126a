use crate::foundation::core::{PixelSize, Point, Rect};
use crate::foundation::error::{RippleError, RippleResult};

/// Largest supported grid size (tiles per side).
pub const MAX_GRID_SIZE: u32 = 64;

/// Grid and timing parameters for [`fragment`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentParams {
    /// Tiles per side (the grid is `grid_size x grid_size`).
    pub grid_size: u32,
    /// Delay assigned to the tile(s) farthest from the center.
    pub delay_scale: f64,
}

impl Default for FragmentParams {
    fn default() -> Self {
        Self {
            grid_size: 8,
            delay_scale: 0.4,
        }
    }
}

impl FragmentParams {
    /// Check ranges: grid size in `1..=MAX_GRID_SIZE`, delay scale finite and non-negative.
    pub fn validate(&self) -> RippleResult<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(RippleError::validation(format!(
                "grid_size must be in 1..={MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if !self.delay_scale.is_finite() || self.delay_scale < 0.0 {
            return Err(RippleError::validation(
                "delay_scale must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// One cell of the grid partition of a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Grid row.
    pub row: u32,
    /// Grid column.
    pub col: u32,
    /// Left edge in buffer pixels.
    pub x: u32,
    /// Top edge in buffer pixels.
    pub y: u32,
    /// Width in pixels (edge tiles may be narrower, possibly zero).
    pub width: u32,
    /// Height in pixels (edge tiles may be shorter, possibly zero).
    pub height: u32,
    /// Euclidean distance from the tile center to the buffer center.
    pub distance_from_center: f64,
    /// Offset into the global progress timeline, in `[0, delay_scale]`.
    pub delay: f64,
}

impl Tile {
    /// Geometric center in buffer coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Pixel rectangle in buffer coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x + self.width),
            f64::from(self.y + self.height),
        )
    }

    /// `true` when the tile covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Split `len` pixels into `n` consecutive spans of `floor(len / n)` pixels; the last span
/// absorbs the remainder so the spans exactly cover `[0, len)`.
///
/// No span is empty while `len >= n`.
fn axis_spans(len: u32, n: u32) -> Vec<(u32, u32)> {
    let stride = len / n;
    (0..n)
        .map(|i| {
            let start = i * stride;
            if i + 1 == n {
                (start, len - start)
            } else {
                (start, stride)
            }
        })
        .collect()
}

/// Partition a buffer of `size` into `grid_size^2` tiles in row-major order, with delays
/// growing with distance from the buffer center.
///
/// The tile(s) nearest the center get delay 0 and the farthest get `delay_scale`; equal
/// distances always map to equal delays.
#[tracing::instrument(level = "debug")]
pub fn fragment(size: PixelSize, params: FragmentParams) -> RippleResult<Vec<Tile>> {
    params.validate()?;
    let g = params.grid_size;
    let cols = axis_spans(size.width, g);
    let rows = axis_spans(size.height, g);
    let center = size.center();

    let mut tiles = Vec::with_capacity((g as usize) * (g as usize));
    for (row, &(y, height)) in rows.iter().enumerate() {
        for (col, &(x, width)) in cols.iter().enumerate() {
            let mut tile = Tile {
                row: row as u32,
                col: col as u32,
                x,
                y,
                width,
                height,
                distance_from_center: 0.0,
                delay: 0.0,
            };
            let c = tile.center();
            tile.distance_from_center = (c.x - center.x).hypot(c.y - center.y);
            tiles.push(tile);
        }
    }

    let (min_d, max_d) = tiles.iter().fold((f64::INFINITY, 0.0_f64), |(lo, hi), t| {
        (lo.min(t.distance_from_center), hi.max(t.distance_from_center))
    });
    let span = max_d - min_d;
    for t in &mut tiles {
        t.delay = if span > f64::EPSILON {
            (t.distance_from_center - min_d) / span * params.delay_scale
        } else {
            0.0
        };
    }

    tracing::debug!(tiles = tiles.len(), max_distance = max_d, "fragmented buffer");
    Ok(tiles)
}

#[cfg(test)]
#[path = "../../tests/unit/fragment/tiles.rs"]
mod tests;
