use crate::foundation::{
    core::{MAX_SCALE, MIN_SCALE, OFFSET_SLIDER_LIMIT, PREVIEW_SIZE, Point, Rect},
    error::{DpError, DpResult},
};

/// Placement of the photo on the preview surface, in preview pixels.
///
/// `width`/`height` are the cover-fit display size at `scale == 1`; `x`/`y` are the top-left draw
/// offset. Sub-pixel values are kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImagePosition {
    /// Left edge of the drawn photo.
    pub x: f64,
    /// Top edge of the drawn photo.
    pub y: f64,
    /// User zoom multiplier in `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Base display width at scale 1.
    pub width: f64,
    /// Base display height at scale 1.
    pub height: f64,
}

impl Default for ImagePosition {
    /// Placeholder used before a photo has been fitted.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            width: f64::from(PREVIEW_SIZE),
            height: f64::from(PREVIEW_SIZE),
        }
    }
}

impl ImagePosition {
    /// Base width, falling back to the preview side when unset.
    pub fn base_width(&self) -> f64 {
        if self.width > 0.0 {
            self.width
        } else {
            f64::from(PREVIEW_SIZE)
        }
    }

    /// Base height, falling back to the preview side when unset.
    pub fn base_height(&self) -> f64 {
        if self.height > 0.0 {
            self.height
        } else {
            f64::from(PREVIEW_SIZE)
        }
    }

    /// Rectangle the photo covers once `scale` is applied.
    pub fn draw_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + self.base_width() * self.scale,
            self.y + self.base_height() * self.scale,
        )
    }

    /// `true` when two positions differ by less than `eps` in every field.
    pub fn approx_eq(&self, other: &ImagePosition, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.scale - other.scale).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

/// Round to the nearest integer with halves going up, so `-66.5` becomes `-66`.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Cover-fit a `natural_w x natural_h` photo into a `target x target` square, centered.
///
/// Rounding to whole pixels happens here only, with halves rounded up.
pub fn initial_fit(natural_w: u32, natural_h: u32, target: u32) -> DpResult<ImagePosition> {
    if natural_w == 0 || natural_h == 0 {
        return Err(DpError::validation(format!(
            "cannot fit a {natural_w}x{natural_h} photo"
        )));
    }
    if target == 0 {
        return Err(DpError::validation("fit target must be > 0"));
    }

    let t = f64::from(target);
    let (w, h) = (f64::from(natural_w), f64::from(natural_h));
    let cover = (t / w).max(t / h);
    let width = round_half_up(w * cover);
    let height = round_half_up(h * cover);

    Ok(ImagePosition {
        x: round_half_up((t - width) / 2.0),
        y: round_half_up((t - height) / 2.0),
        scale: 1.0,
        width,
        height,
    })
}

/// Map a preview-space position into export space.
///
/// Offsets and base size are multiplied by `ratio`; `scale` is unchanged, so the drawn rectangle
/// scales by exactly `ratio`.
pub fn to_high_res(p: &ImagePosition, ratio: f64) -> ImagePosition {
    ImagePosition {
        x: p.x * ratio,
        y: p.y * ratio,
        scale: p.scale,
        width: p.base_width() * ratio,
        height: p.base_height() * ratio,
    }
}

/// Inverse of [`to_high_res`].
pub fn to_low_res(p: &ImagePosition, ratio: f64) -> ImagePosition {
    ImagePosition {
        x: p.x / ratio,
        y: p.y / ratio,
        scale: p.scale,
        width: p.base_width() / ratio,
        height: p.base_height() / ratio,
    }
}

/// Clamp a requested zoom to `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Clamp a slider offset to `[-OFFSET_SLIDER_LIMIT, OFFSET_SLIDER_LIMIT]`.
pub fn clamp_offset(v: f64) -> f64 {
    v.clamp(-OFFSET_SLIDER_LIMIT, OFFSET_SLIDER_LIMIT)
}

/// Map a pointer position from displayed-element coordinates onto surface pixels.
///
/// `bounds` is where the surface is shown (e.g. a 320px wide element showing a 400px canvas).
pub fn client_to_surface(client: Point, bounds: Rect, surface_size: u32) -> Point {
    let side = f64::from(surface_size);
    let sx = if bounds.width() > 0.0 {
        side / bounds.width()
    } else {
        1.0
    };
    let sy = if bounds.height() > 0.0 {
        side / bounds.height()
    } else {
        1.0
    };
    Point::new((client.x - bounds.x0) * sx, (client.y - bounds.y0) * sy)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/placement.rs"]
mod tests;
