use std::rc::Rc;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::capture::buffer::PixelBuffer;
use crate::capture::color::ColorResolver;
use crate::capture::text::{FontBytes, TextPainter, TextStyle};
use crate::foundation::core::{PixelSize, Point, Rect, Rgba8};
use crate::foundation::error::{RippleError, RippleResult};
use crate::raster::paint::{border_rect, fill_rect, finish_to_pixmap, new_context};
use crate::region::ContentRegion;
use crate::region::element::{Element, ElementRole};

const DEFAULT_TEXT_SIZE_PX: f32 = 14.0;

/// Pending result of a capture. Resolves once; dropping it abandons the capture.
pub type CaptureFuture = LocalBoxFuture<'static, RippleResult<PixelBuffer>>;

/// Capability turning a live region into a [`PixelBuffer`].
///
/// A synchronous `Err` models a capture that throws before it starts; a future resolving to
/// `Err` models one that rejects. Both are recovered by the controller.
pub trait Rasterizer {
    /// Begin capturing `region` at `size`.
    fn capture(
        &self,
        region: Rc<dyn ContentRegion>,
        size: PixelSize,
    ) -> RippleResult<CaptureFuture>;
}

/// Options for [`SceneRasterizer`].
#[derive(Clone, Debug)]
pub struct CaptureOpts {
    /// Color painted under the whole region before any element.
    pub background: Rgba8,
    /// Resolver for element style colors.
    pub colors: ColorResolver,
    /// Font used for element text; text is skipped without one.
    pub font: Option<FontBytes>,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(255, 255, 255),
            colors: ColorResolver::default(),
            font: None,
        }
    }
}

/// Rasterizer that paints the region's element tree with `vello_cpu`.
///
/// Painting is deferred until the returned future is first polled.
#[derive(Clone, Debug, Default)]
pub struct SceneRasterizer {
    opts: CaptureOpts,
}

impl SceneRasterizer {
    /// Rasterizer with the given options.
    pub fn new(opts: CaptureOpts) -> Self {
        Self { opts }
    }
}

impl Rasterizer for SceneRasterizer {
    #[tracing::instrument(level = "debug", skip(self, region))]
    fn capture(
        &self,
        region: Rc<dyn ContentRegion>,
        size: PixelSize,
    ) -> RippleResult<CaptureFuture> {
        let opts = self.opts.clone();
        Ok(async move { paint_region(region.as_ref(), size, &opts).map_err(as_capture) }
            .boxed_local())
    }
}

fn paint_region(
    region: &dyn ContentRegion,
    size: PixelSize,
    opts: &CaptureOpts,
) -> RippleResult<PixelBuffer> {
    let root = region.root()?;
    let origin = region.bounds().origin();
    let mut ctx = new_context(size)?;
    let mut text = match &opts.font {
        Some(f) => Some(TextPainter::new(f)?),
        None => None,
    };

    let full = Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    fill_rect(&mut ctx, full, opts.background);
    paint_element(root, origin, &mut ctx, &opts.colors, &mut text)?;

    let pixmap = finish_to_pixmap(&mut ctx, size)?;
    let buffer = PixelBuffer::from_premul_pixmap(&pixmap)?;
    let stats = buffer.stats();
    tracing::debug!(
        total = stats.total,
        transparent = stats.transparent,
        opaque = stats.opaque,
        semi_transparent = stats.semi_transparent,
        white = stats.white,
        colored = stats.colored,
        opaque_percent = stats.opaque_percent(),
        "captured region pixels"
    );
    Ok(buffer)
}

fn paint_element(
    e: &Element,
    origin: Point,
    ctx: &mut vello_cpu::RenderContext,
    colors: &ColorResolver,
    text: &mut Option<TextPainter>,
) -> RippleResult<()> {
    if e.role == ElementRole::Ignored {
        return Ok(());
    }
    let r = e.rect_relative_to(origin);

    if let Some(bg) = &e.style.background {
        fill_rect(ctx, r, colors.resolve(bg)?);
    }
    if let Some(border) = &e.style.border {
        border_rect(ctx, r, colors.resolve(border)?);
    }
    if let (Some(t), Some(painter)) = (&e.text, text.as_mut()) {
        let color = match &e.style.color {
            Some(c) => colors.resolve(c)?,
            None => Rgba8::opaque(0, 0, 0),
        };
        let style = TextStyle {
            size_px: e.style.font_size.unwrap_or(DEFAULT_TEXT_SIZE_PX),
            color,
        };
        painter.draw(ctx, t.trim(), r.origin(), style)?;
    }

    for child in &e.children {
        paint_element(child, origin, ctx, colors, text)?;
    }
    Ok(())
}

fn as_capture(e: RippleError) -> RippleError {
    match e {
        RippleError::Capture(_) => e,
        other => RippleError::capture(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/rasterizer.rs"]
mod tests;
