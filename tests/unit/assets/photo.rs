use std::io::Cursor;

use super::*;
use crate::assets::fetch::decode_data_uri;

fn jpeg_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn from_encoded_builds_image_data_uri() {
    let bytes = jpeg_bytes();
    let src = PhotoSource::from_encoded(&bytes).unwrap();
    assert!(src.as_uri().starts_with("data:image/jpeg;base64,"));
    assert_eq!(decode_data_uri(src.as_uri()).unwrap(), bytes);
}

#[test]
fn non_image_payloads_are_rejected() {
    assert!(PhotoSource::from_encoded(b"%PDF-1.7 not a photo").is_err());
    assert!(PhotoSource::from_data_uri("data:text/plain,hi").is_err());
    assert!(PhotoSource::from_data_uri("photos/me.png").is_err());
    assert!(PhotoSource::from_data_uri("data:,hi").is_err());
}

#[test]
fn debug_does_not_dump_payload() {
    let src = PhotoSource::from_data_uri("data:image/png;base64,QUJDREVGRw==").unwrap();
    let dbg = format!("{src:?}");
    assert!(dbg.contains("image/png"));
    assert!(!dbg.contains("QUJDREVGRw"));
}
