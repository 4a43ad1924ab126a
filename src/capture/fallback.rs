use std::rc::Rc;

use futures::FutureExt as _;

use crate::capture::buffer::PixelBuffer;
use crate::capture::rasterizer::{CaptureFuture, Rasterizer};
use crate::capture::text::{FontBytes, TextPainter, TextStyle, truncate_chars};
use crate::foundation::core::{PixelSize, Point, Rect, Rgba8};
use crate::foundation::error::{RippleError, RippleResult};
use crate::raster::paint::{border_rect, fill_rect, finish_to_pixmap, new_context};
use crate::region::ContentRegion;
use crate::region::element::{Element, ElementRole};

const WHITE: Rgba8 = Rgba8::opaque(0xff, 0xff, 0xff);
const CARD_BORDER: Rgba8 = Rgba8::opaque(0xe5, 0xe7, 0xeb);
const TITLE_COLOR: Rgba8 = Rgba8::opaque(0x1f, 0x29, 0x37);
const LINK_COLOR: Rgba8 = Rgba8::opaque(0x6b, 0x72, 0x80);
const BADGE_FILL: Rgba8 = Rgba8::opaque(0xe5, 0xe7, 0xeb);
const BADGE_BORDER: Rgba8 = Rgba8::opaque(0xd1, 0xd5, 0xdb);
const BADGE_TEXT: Rgba8 = Rgba8::opaque(0x37, 0x41, 0x51);
const BAND_BORDER: Rgba8 = Rgba8::opaque(0xe2, 0xe8, 0xf0);
const GRADIENT_START: Rgba8 = Rgba8::opaque(0xf8, 0xfa, 0xfc);
const GRADIENT_END: Rgba8 = Rgba8::opaque(0xe2, 0xe8, 0xf0);

const TITLE_MAX_CHARS: usize = 25;
const LINK_MAX_CHARS: usize = 35;
const BADGE_MAX_CHARS: usize = 8;
const MAX_BADGES: usize = 3;
const BAND_COUNT: u32 = 5;

/// Simplified, structure-preserving description of one card unit.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CardSketch {
    /// Box relative to the region.
    pub(crate) rect: Rect,
    pub(crate) title: Option<String>,
    pub(crate) link: Option<String>,
    pub(crate) badges: Vec<String>,
}

/// Procedural stand-in for a failed capture.
///
/// Draws each card unit as a bordered box with its title, link, and up to three badges. With
/// no card units it draws placeholder bands, and if drawing itself fails it writes a gradient
/// placeholder straight into memory, so [`FallbackSynthesizer::synthesize`] always returns a
/// fully populated buffer of the requested size.
#[derive(Clone, Debug, Default)]
pub struct FallbackSynthesizer {
    font: Option<FontBytes>,
}

impl FallbackSynthesizer {
    /// Synthesizer drawing text with `font` (text is skipped when `None`).
    pub fn new(font: Option<FontBytes>) -> Self {
        Self { font }
    }

    /// Build a placeholder buffer of exactly `size`. Never fails.
    #[tracing::instrument(level = "debug", skip(self, region))]
    pub fn synthesize(&self, region: &dyn ContentRegion, size: PixelSize) -> PixelBuffer {
        match self.draw_structured(region, size) {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!(error = %e, "structured fallback failed; using gradient placeholder");
                placeholder_bands(size)
            }
        }
    }

    pub(crate) fn draw_structured(
        &self,
        region: &dyn ContentRegion,
        size: PixelSize,
    ) -> RippleResult<PixelBuffer> {
        self.draw_structured_inner(region, size).map_err(|e| match e {
            RippleError::Synthesis(_) => e,
            other => RippleError::synthesis(other.to_string()),
        })
    }

    fn draw_structured_inner(
        &self,
        region: &dyn ContentRegion,
        size: PixelSize,
    ) -> RippleResult<PixelBuffer> {
        let root = region.root()?;
        let cards = sketch_cards(root, region.bounds().origin());
        tracing::debug!(cards = cards.len(), "synthesizing fallback snapshot");

        let mut ctx = new_context(size)?;
        let full = Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height));
        fill_rect(&mut ctx, full, WHITE);

        if cards.is_empty() {
            for band in band_rects(size) {
                fill_rect(&mut ctx, band, WHITE);
                border_rect(&mut ctx, band, BAND_BORDER);
            }
        } else {
            let mut text = match &self.font {
                Some(f) => Some(TextPainter::new(f)?),
                None => None,
            };
            for card in &cards {
                draw_card(&mut ctx, card, &mut text)?;
            }
        }

        let pixmap = finish_to_pixmap(&mut ctx, size)?;
        PixelBuffer::from_premul_pixmap(&pixmap)
    }
}

impl Rasterizer for FallbackSynthesizer {
    fn capture(
        &self,
        region: Rc<dyn ContentRegion>,
        size: PixelSize,
    ) -> RippleResult<CaptureFuture> {
        let buffer = self.synthesize(region.as_ref(), size);
        Ok(futures::future::ready(Ok(buffer)).boxed_local())
    }
}

pub(crate) fn sketch_cards(root: &Element, origin: Point) -> Vec<CardSketch> {
    root.card_units()
        .into_iter()
        .enumerate()
        .map(|(i, card)| {
            let heading = card.first_with_role(ElementRole::Heading);
            let title = heading.map(|h| {
                let t = h.text_content();
                let t = t.trim();
                if t.is_empty() {
                    format!("Item {}", i + 1)
                } else {
                    truncate_chars(t, TITLE_MAX_CHARS).to_owned()
                }
            });
            let link = heading
                .and_then(|_| card.first_with_role(ElementRole::Link))
                .map(|l| l.text_content())
                .filter(|t| !t.trim().is_empty())
                .map(|t| truncate_chars(t.trim(), LINK_MAX_CHARS).to_owned());
            let badges = card
                .descendants()
                .filter(|e| e.role == ElementRole::Label)
                .filter_map(|e| {
                    let t = e.text_content();
                    let t = t.trim();
                    (t.chars().count() > 1).then(|| truncate_chars(t, BADGE_MAX_CHARS).to_owned())
                })
                .take(MAX_BADGES)
                .collect();
            CardSketch {
                rect: card.rect_relative_to(origin),
                title,
                link,
                badges,
            }
        })
        .collect()
}

fn draw_card(
    ctx: &mut vello_cpu::RenderContext,
    card: &CardSketch,
    text: &mut Option<TextPainter>,
) -> RippleResult<()> {
    let r = card.rect;
    fill_rect(ctx, r, WHITE);
    border_rect(ctx, r, CARD_BORDER);

    for (i, _) in card.badges.iter().enumerate() {
        let badge = badge_rect(r, i);
        fill_rect(ctx, badge, BADGE_FILL);
        border_rect(ctx, badge, BADGE_BORDER);
    }

    let Some(painter) = text.as_mut() else {
        return Ok(());
    };
    if let Some(title) = &card.title {
        let style = TextStyle {
            size_px: 20.0,
            color: TITLE_COLOR,
        };
        painter.draw(ctx, title, Point::new(r.x0 + 20.0, r.y0 + 15.0), style)?;
    }
    if let Some(link) = &card.link {
        let style = TextStyle {
            size_px: 14.0,
            color: LINK_COLOR,
        };
        painter.draw(ctx, link, Point::new(r.x0 + 20.0, r.y0 + 44.0), style)?;
    }
    for (i, label) in card.badges.iter().enumerate() {
        let badge = badge_rect(r, i);
        let style = TextStyle {
            size_px: 13.0,
            color: BADGE_TEXT,
        };
        painter.draw(ctx, label, Point::new(badge.x0 + 7.0, badge.y0 + 2.0), style)?;
    }
    Ok(())
}

fn badge_rect(card: Rect, i: usize) -> Rect {
    let x = card.x0 + 20.0 + (i as f64) * 75.0;
    let y = card.y0 + 75.0;
    Rect::new(x, y, x + 70.0, y + 22.0)
}

/// Evenly spaced placeholder bands, inset 20px horizontally and 10px vertically.
pub(crate) fn band_rects(size: PixelSize) -> Vec<Rect> {
    let w = f64::from(size.width);
    let band_h = f64::from(size.height) / f64::from(BAND_COUNT);
    (0..BAND_COUNT)
        .filter_map(|i| {
            let y = f64::from(i) * band_h + 10.0;
            let r = Rect::new(20.0, y, w - 20.0, y + band_h - 20.0);
            (r.width() > 0.0 && r.height() > 0.0).then_some(r)
        })
        .collect()
}

/// Last-resort placeholder: diagonal gradient plus bands, written directly into memory.
pub fn placeholder_bands(size: PixelSize) -> PixelBuffer {
    let w = size.width as usize;
    let h = size.height as usize;
    let mut data = vec![0u8; size.byte_len()];

    let (fw, fh) = (f64::from(size.width), f64::from(size.height));
    let denom = fw * fw + fh * fh;
    let lerp = |a: u8, b: u8, t: f64| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    for y in 0..h {
        for x in 0..w {
            let t = ((x as f64) * fw + (y as f64) * fh) / denom;
            let t = t.clamp(0.0, 1.0);
            let idx = (y * w + x) * 4;
            data[idx] = lerp(GRADIENT_START.r, GRADIENT_END.r, t);
            data[idx + 1] = lerp(GRADIENT_START.g, GRADIENT_END.g, t);
            data[idx + 2] = lerp(GRADIENT_START.b, GRADIENT_END.b, t);
            data[idx + 3] = 255;
        }
    }

    for band in band_rects(size) {
        fill_px_rect(&mut data, size, band, WHITE);
        let (x0, y0, x1, y1) = px_bounds(size, band);
        if x1 > x0 && y1 > y0 {
            fill_px_rect(&mut data, size, Rect::new(x0, y0, x1, y0 + 1.0), BAND_BORDER);
            fill_px_rect(&mut data, size, Rect::new(x0, y1 - 1.0, x1, y1), BAND_BORDER);
            fill_px_rect(&mut data, size, Rect::new(x0, y0, x0 + 1.0, y1), BAND_BORDER);
            fill_px_rect(&mut data, size, Rect::new(x1 - 1.0, y0, x1, y1), BAND_BORDER);
        }
    }

    PixelBuffer::new(size.width, size.height, data)
        .unwrap_or_else(|_| PixelBuffer::filled(size, GRADIENT_START))
}

fn px_bounds(size: PixelSize, r: Rect) -> (f64, f64, f64, f64) {
    let clamp_x = |v: f64| v.round().clamp(0.0, f64::from(size.width));
    let clamp_y = |v: f64| v.round().clamp(0.0, f64::from(size.height));
    (clamp_x(r.x0), clamp_y(r.y0), clamp_x(r.x1), clamp_y(r.y1))
}

fn fill_px_rect(data: &mut [u8], size: PixelSize, r: Rect, color: Rgba8) {
    let (x0, y0, x1, y1) = px_bounds(size, r);
    let px = color.to_array();
    for y in (y0 as usize)..(y1 as usize) {
        for x in (x0 as usize)..(x1 as usize) {
            let idx = (y * size.width as usize + x) * 4;
            data[idx..idx + 4].copy_from_slice(&px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/fallback.rs"]
mod tests;
