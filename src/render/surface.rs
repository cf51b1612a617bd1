use std::io::Cursor;

use anyhow::Context;
use resvg::tiny_skia;

use crate::foundation::error::{DpError, DpResult};

/// Square drawing target.
pub struct Surface {
    size: u32,
    pixmap: tiny_skia::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("size", &self.size).finish()
    }
}

impl Surface {
    /// Allocate a transparent `size x size` surface.
    pub fn new(size: u32) -> DpResult<Self> {
        let pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
            DpError::surface_unavailable(format!("cannot allocate {size}x{size} surface"))
        })?;
        Ok(Self { size, pixmap })
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the surface.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Encode as PNG at the strongest (lossless) compression setting.
    pub fn encode_png(&self) -> DpResult<Vec<u8>> {
        use image::ImageEncoder as _;

        let rgba = self.to_rgba8();
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new_with_quality(
            Cursor::new(&mut buf),
            image::codecs::png::CompressionType::Best,
            image::codecs::png::FilterType::Adaptive,
        )
        .write_image(&rgba, self.size, self.size, image::ExtendedColorType::Rgba8)
        .context("encode surface as png")?;
        Ok(buf)
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut tiny_skia::Pixmap {
        &mut self.pixmap
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
