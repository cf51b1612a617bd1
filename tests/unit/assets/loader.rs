use std::io::Cursor;

use super::*;
use crate::assets::fetch::MemoryFetcher;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

const RING_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
<rect x="0" y="0" width="100" height="10" fill="#0000ff"/></svg>"##;

fn sources() -> FrameSources {
    FrameSources {
        primary: "frames/junior-frame.png".to_string(),
        fallback: "frames/junior-frame.svg".to_string(),
    }
}

#[tokio::test]
async fn load_decodes_raster() {
    let loader = ImageLoader::new(MemoryFetcher::new().with("a.png", png_bytes(4, 2)));
    let img = loader.load("a.png", DecodeSize::Native).await.unwrap();
    assert_eq!(img.natural_size(), (4, 2));
}

#[tokio::test]
async fn missing_and_undecodable_resources_are_load_errors() {
    let loader = ImageLoader::new(MemoryFetcher::new().with("junk.png", b"nope".to_vec()));

    let missing = loader.load("gone.png", DecodeSize::Native).await.unwrap_err();
    assert!(matches!(missing, DpError::ResourceLoad { .. }));

    let junk = loader.load("junk.png", DecodeSize::Native).await.unwrap_err();
    match junk {
        DpError::ResourceLoad { url, .. } => assert_eq!(url, "junk.png"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fallback_used_when_primary_missing() {
    let loader = ImageLoader::new(
        MemoryFetcher::new().with("frames/junior-frame.svg", RING_SVG.to_vec()),
    );
    let img = loader
        .load_with_fallback(&sources(), DecodeSize::Native)
        .await
        .unwrap();
    assert!(img.is_vector());
}

#[tokio::test]
async fn primary_wins_when_available() {
    let loader = ImageLoader::new(
        MemoryFetcher::new()
            .with("frames/junior-frame.png", png_bytes(8, 8))
            .with("frames/junior-frame.svg", RING_SVG.to_vec()),
    );
    let img = loader
        .load_with_fallback(&sources(), DecodeSize::Native)
        .await
        .unwrap();
    assert!(!img.is_vector());
}

#[tokio::test]
async fn dual_failure_reports_fallback_error() {
    let loader = ImageLoader::new(MemoryFetcher::new());
    let err = loader
        .load_with_fallback(&sources(), DecodeSize::Native)
        .await
        .unwrap_err();
    match err {
        DpError::ResourceLoad { url, .. } => assert_eq!(url, "frames/junior-frame.svg"),
        other => panic!("unexpected error: {other}"),
    }
}
