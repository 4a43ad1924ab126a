use crate::foundation::core::PixelSize;
use crate::foundation::error::{RippleError, RippleResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::raster::paint::size_u16;

/// In-memory output surface the compositor draws onto.
///
/// Pixels are premultiplied RGBA8, sized to match the content region.
pub struct Surface {
    size: PixelSize,
    pixmap: vello_cpu::Pixmap,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(size: PixelSize) -> RippleResult<Self> {
        let (w, h) = size_u16(size)?;
        Ok(Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Dimensions.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Reallocate if `size` differs; contents are cleared either way.
    pub fn resize(&mut self, size: PixelSize) -> RippleResult<()> {
        if size != self.size {
            *self = Self::new(size)?;
        } else {
            self.clear();
        }
        Ok(())
    }

    /// Clear every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// `true` if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.data_as_u8_slice().iter().all(|&b| b == 0)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Straight-alpha copy as an `image` buffer (e.g. for PNG output).
    pub fn to_rgba_image(&self) -> RippleResult<image::RgbaImage> {
        let mut bytes = self.data().to_vec();
        unpremultiply_rgba8_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.size.width, self.size.height, bytes)
            .ok_or_else(|| RippleError::render("surface does not match its dimensions"))
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}
