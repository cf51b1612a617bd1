use std::sync::Arc;

use super::*;
use crate::assets::decode::parse_svg;

fn solid_raster(w: u32, h: u32, rgba: [u8; 4]) -> LoadedImage {
    let mut p = tiny_skia::Pixmap::new(w, h).unwrap();
    p.fill(tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    LoadedImage::Raster(Arc::new(p))
}

/// 100x100 frame: opaque blue 10px border, transparent middle.
fn border_frame() -> LoadedImage {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
<path fill="#0000ff" fill-rule="evenodd" d="M0 0H100V100H0Z M10 10V90H90V10Z"/></svg>"##;
    LoadedImage::Vector(Arc::new(parse_svg(svg).unwrap()))
}

fn cover(size: f64) -> ImagePosition {
    ImagePosition {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        width: size,
        height: size,
    }
}

#[test]
fn frame_occludes_photo_on_its_opaque_pixels() {
    let mut target = Surface::new(100).unwrap();
    let photo = solid_raster(10, 10, [255, 0, 0, 255]);
    Compositor
        .compose(&mut target, &photo, &border_frame(), &cover(100.0))
        .unwrap();

    assert_eq!(target.pixel_rgba(2, 2), Some([0, 0, 255, 255]));
    assert_eq!(target.pixel_rgba(97, 50), Some([0, 0, 255, 255]));
    assert_eq!(target.pixel_rgba(50, 50), Some([255, 0, 0, 255]));
}

#[test]
fn translucent_frame_is_blended_over_photo() {
    let mut target = Surface::new(20).unwrap();
    let photo = solid_raster(4, 4, [255, 0, 0, 255]);
    let frame = solid_raster(2, 2, [0, 0, 255, 128]);
    Compositor
        .compose(&mut target, &photo, &frame, &cover(20.0))
        .unwrap();

    let [r, _, b, a] = target.pixel_rgba(10, 10).unwrap();
    assert_eq!(a, 255);
    assert!(b > 100, "frame must show through: b={b}");
    assert!(r < 160, "photo must be partially covered: r={r}");
}

#[test]
fn compose_clears_previous_content() {
    let mut target = Surface::new(50).unwrap();
    let photo = solid_raster(5, 5, [0, 255, 0, 255]);
    let clear_frame = solid_raster(1, 1, [0, 0, 0, 0]);

    Compositor
        .compose(&mut target, &photo, &clear_frame, &cover(50.0))
        .unwrap();
    assert_eq!(target.pixel_rgba(25, 25), Some([0, 255, 0, 255]));

    let off_canvas = ImagePosition {
        x: -500.0,
        ..cover(50.0)
    };
    Compositor
        .compose(&mut target, &photo, &clear_frame, &off_canvas)
        .unwrap();
    assert_eq!(target.pixel_rgba(25, 25), Some([0, 0, 0, 0]));
}

#[test]
fn scale_and_offset_place_the_photo() {
    let mut target = Surface::new(100).unwrap();
    let photo = solid_raster(10, 10, [255, 255, 0, 255]);
    let clear_frame = solid_raster(1, 1, [0, 0, 0, 0]);
    let pos = ImagePosition {
        x: 50.0,
        y: 50.0,
        scale: 0.5,
        width: 40.0,
        height: 40.0,
    };
    Compositor
        .compose(&mut target, &photo, &clear_frame, &pos)
        .unwrap();

    assert_eq!(target.pixel_rgba(55, 55), Some([255, 255, 0, 255]));
    assert_eq!(target.pixel_rgba(45, 45).unwrap()[3], 0);
    assert_eq!(target.pixel_rgba(80, 80).unwrap()[3], 0);
}

#[test]
fn drawing_failures_are_contained_in_render() {
    let mut target = Surface::new(10).unwrap();
    let photo = solid_raster(2, 2, [255, 0, 0, 255]);
    let frame = solid_raster(2, 2, [0, 0, 255, 255]);
    let broken = ImagePosition {
        x: f64::NAN,
        ..cover(10.0)
    };

    assert!(Compositor.compose(&mut target, &photo, &frame, &broken).is_err());
    // Must not panic; the target is left as far as drawing got.
    Compositor.render(&mut target, &photo, &frame, &broken);
}
