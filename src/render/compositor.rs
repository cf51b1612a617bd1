use resvg::tiny_skia;

use crate::{
    assets::decode::LoadedImage,
    foundation::{
        core::Rect,
        error::{DpError, DpResult},
    },
    render::surface::Surface,
    transform::placement::ImagePosition,
};

/// Draws photo-then-frame compositions. The same routine serves the 400px preview and the
/// 3000px export; only the target and the position's coordinate space differ.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compositor;

impl Compositor {
    /// Clear `target`, draw `photo` at `position`, then `frame` over the full surface.
    ///
    /// The frame is always painted last so its opaque pixels hide the photo's edges.
    pub fn compose(
        &self,
        target: &mut Surface,
        photo: &LoadedImage,
        frame: &LoadedImage,
        position: &ImagePosition,
    ) -> DpResult<()> {
        target.clear();
        draw_image(target, photo, position.draw_rect())?;
        let side = f64::from(target.size());
        draw_image(target, frame, Rect::new(0.0, 0.0, side, side))
    }

    /// Preview entry point: like [`Compositor::compose`] but drawing failures are logged and
    /// swallowed, leaving `target` as far as it got.
    pub fn render(
        &self,
        target: &mut Surface,
        photo: &LoadedImage,
        frame: &LoadedImage,
        position: &ImagePosition,
    ) {
        if let Err(err) = self.compose(target, photo, frame, position) {
            tracing::error!(error = %err, "error drawing preview");
        }
    }
}

/// Draw `image` stretched into `dest`, like a 2D canvas `drawImage(img, x, y, w, h)`.
pub fn draw_image(target: &mut Surface, image: &LoadedImage, dest: Rect) -> DpResult<()> {
    if !(dest.x0.is_finite() && dest.y0.is_finite() && dest.x1.is_finite() && dest.y1.is_finite())
    {
        return Err(DpError::validation(format!(
            "draw rectangle is not finite: {dest:?}"
        )));
    }
    if dest.width() <= 0.0 || dest.height() <= 0.0 {
        return Ok(());
    }

    let (nat_w, nat_h) = match image {
        LoadedImage::Raster(p) => (p.width() as f32, p.height() as f32),
        LoadedImage::Vector(t) => (t.size().width(), t.size().height()),
    };
    let transform = tiny_skia::Transform::from_row(
        dest.width() as f32 / nat_w,
        0.0,
        0.0,
        dest.height() as f32 / nat_h,
        dest.x0 as f32,
        dest.y0 as f32,
    );

    match image {
        LoadedImage::Raster(src) => {
            let paint = tiny_skia::PixmapPaint {
                quality: tiny_skia::FilterQuality::Bicubic,
                ..Default::default()
            };
            target
                .pixmap_mut()
                .draw_pixmap(0, 0, tiny_skia::Pixmap::as_ref(src), &paint, transform, None);
        }
        LoadedImage::Vector(tree) => {
            resvg::render(tree, transform, &mut target.pixmap_mut().as_mut());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
