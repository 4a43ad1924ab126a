use std::sync::Arc;

use crate::foundation::core::{Affine, PixelSize, Rect, Rgba8};
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::premultiply_rgba8_in_place;

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn size_u16(size: PixelSize) -> RippleResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| RippleError::render("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| RippleError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn new_context(size: PixelSize) -> RippleResult<vello_cpu::RenderContext> {
    let (w, h) = size_u16(size)?;
    Ok(vello_cpu::RenderContext::new(w, h))
}

/// Fill `rect` (identity transform) with a solid color.
pub(crate) fn fill_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 || color.a == 0 {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_cpu_color());
    ctx.fill_rect(&rect_to_cpu(rect));
}

/// 1px border drawn inside `rect` as four edge fills.
pub(crate) fn border_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8) {
    let w = 1.0_f64.min(rect.width() / 2.0);
    let h = 1.0_f64.min(rect.height() / 2.0);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    fill_rect(ctx, Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + h), color);
    fill_rect(ctx, Rect::new(rect.x0, rect.y1 - h, rect.x1, rect.y1), color);
    fill_rect(
        ctx,
        Rect::new(rect.x0, rect.y0 + h, rect.x0 + w, rect.y1 - h),
        color,
    );
    fill_rect(
        ctx,
        Rect::new(rect.x1 - w, rect.y0 + h, rect.x1, rect.y1 - h),
        color,
    );
}

/// Rasterize everything recorded in `ctx` into a fresh pixmap.
pub(crate) fn finish_to_pixmap(
    ctx: &mut vello_cpu::RenderContext,
    size: PixelSize,
) -> RippleResult<vello_cpu::Pixmap> {
    let (w, h) = size_u16(size)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RippleResult<vello_cpu::Pixmap> {
    let (w, h) = size_u16(PixelSize { width, height })?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RippleError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

/// Image paint from straight RGBA8 bytes.
pub(crate) fn image_from_straight_rgba(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> RippleResult<vello_cpu::Image> {
    let mut tmp = bytes_rgba.to_vec();
    premultiply_rgba8_in_place(&mut tmp);
    let pixmap = pixmap_from_premul_bytes(&tmp, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
