use super::*;

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(8).unwrap();
    assert_eq!(s.size(), 8);
    assert_eq!(s.pixel_rgba(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel_rgba(7, 7), Some([0, 0, 0, 0]));
}

#[test]
fn pixels_past_any_edge_are_none() {
    let mut s = Surface::new(8).unwrap();
    s.pixmap_mut()
        .fill(resvg::tiny_skia::Color::from_rgba8(255, 0, 0, 255));
    // (8, 0) would otherwise wrap onto the start of row 1
    assert_eq!(s.pixel_rgba(8, 0), None);
    assert_eq!(s.pixel_rgba(0, 8), None);
    assert_eq!(s.pixel_rgba(8, 8), None);
    assert_eq!(s.pixel_rgba(u32::MAX, 0), None);
    assert_eq!(s.pixel_rgba(7, 0), Some([255, 0, 0, 255]));
}

#[test]
fn zero_sized_surface_is_unavailable() {
    let err = Surface::new(0).unwrap_err();
    assert!(err.is_surface_unavailable());
}

#[test]
fn png_encoding_preserves_dimensions_and_pixels() {
    let mut s = Surface::new(4).unwrap();
    s.pixmap_mut()
        .fill(resvg::tiny_skia::Color::from_rgba8(10, 200, 30, 255));

    let png = s.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 4));
    assert_eq!(decoded.get_pixel(3, 3).0, [10, 200, 30, 255]);
}
