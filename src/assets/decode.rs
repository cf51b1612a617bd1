use std::sync::Arc;

use anyhow::Context;
use resvg::tiny_skia;

use crate::{
    assets::fetch::data_uri_media_type,
    foundation::error::{DpError, DpResult},
};

/// Drawable, fully decoded image.
///
/// Raster images are stored as premultiplied pixmaps; vector images keep their parsed tree and
/// are rasterized at whatever size they are drawn.
#[derive(Clone)]
pub enum LoadedImage {
    /// Decoded bitmap in premultiplied RGBA8.
    Raster(Arc<tiny_skia::Pixmap>),
    /// Parsed SVG document.
    Vector(Arc<usvg::Tree>),
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.natural_size();
        let kind = if self.is_vector() { "Vector" } else { "Raster" };
        f.debug_struct("LoadedImage")
            .field("kind", &kind)
            .field("width", &w)
            .field("height", &h)
            .finish()
    }
}

impl LoadedImage {
    /// Natural pixel size. Vector sizes are rounded up.
    pub fn natural_size(&self) -> (u32, u32) {
        match self {
            LoadedImage::Raster(p) => (p.width(), p.height()),
            LoadedImage::Vector(t) => {
                let s = t.size();
                (s.width().ceil() as u32, s.height().ceil() as u32)
            }
        }
    }

    /// `true` for SVG-backed handles.
    pub fn is_vector(&self) -> bool {
        matches!(self, LoadedImage::Vector(_))
    }
}

/// Pixel budget applied to raster images at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeSize {
    /// Keep the image at its encoded resolution.
    Native,
    /// Downscale so the longest side is at most this many pixels. Never upscales.
    Fit(u32),
}

/// What kind of payload a resource carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// Anything `image` can decode.
    Raster,
    /// SVG markup.
    Svg,
}

/// Classify a resource by its URL first, then by sniffing its bytes.
pub fn sniff_kind(url: &str, bytes: &[u8]) -> ImageKind {
    if let Some(media) = data_uri_media_type(url) {
        return if media.eq_ignore_ascii_case("image/svg+xml") {
            ImageKind::Svg
        } else {
            ImageKind::Raster
        };
    }

    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".svg") {
        return ImageKind::Svg;
    }

    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
        ImageKind::Svg
    } else {
        ImageKind::Raster
    }
}

/// Decode resource bytes into a drawable handle.
pub fn decode_resource(url: &str, bytes: &[u8], size: DecodeSize) -> DpResult<LoadedImage> {
    match sniff_kind(url, bytes) {
        ImageKind::Svg => parse_svg(bytes).map(|t| LoadedImage::Vector(Arc::new(t))),
        ImageKind::Raster => decode_image(bytes, size).map(|p| LoadedImage::Raster(Arc::new(p))),
    }
}

/// Decode encoded image bytes and convert to a premultiplied pixmap.
pub fn decode_image(bytes: &[u8], size: DecodeSize) -> DpResult<tiny_skia::Pixmap> {
    let mut dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;

    if let DecodeSize::Fit(max_side) = size {
        let max_side = max_side.max(1);
        if dyn_img.width() > max_side || dyn_img.height() > max_side {
            dyn_img = dyn_img.resize(max_side, max_side, image::imageops::FilterType::Triangle);
        }
    }

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| DpError::validation(format!("image has invalid size {width}x{height}")))?;
    tiny_skia::Pixmap::from_vec(rgba8_premul, size)
        .ok_or_else(|| DpError::validation("decoded pixel buffer does not match its size"))
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> DpResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let s = tree.size();
    if !(s.width().is_finite() && s.height().is_finite()) || s.width() <= 0.0 || s.height() <= 0.0
    {
        return Err(DpError::validation("svg has invalid width/height"));
    }
    Ok(tree)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
