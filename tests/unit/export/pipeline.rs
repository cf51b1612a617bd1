use std::{
    cell::RefCell,
    future::Future,
    io::Cursor,
    task::{Context, Poll, Waker},
};

use super::*;
use crate::{
    assets::fetch::MemoryFetcher,
    foundation::core::Status,
    session::notify::{NotificationLevel, NotificationLog},
};

#[derive(Default)]
struct Recorder {
    delivered: RefCell<Vec<(String, usize)>>,
}

impl DownloadSink for Recorder {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DpResult<()> {
        self.delivered
            .borrow_mut()
            .push((filename.to_string(), bytes.len()));
        Ok(())
    }
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([30, 160, 90, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn job() -> ExportJob {
    ExportJob {
        photo: PhotoSource::from_encoded(&png_bytes(64, 48)).unwrap(),
        selection: UserSelection {
            name: "Jane Q Doe".to_string(),
            section: "BSIT 2-1".to_string(),
            status: Status::Junior,
        },
        position: ImagePosition {
            x: -67.0,
            y: 0.0,
            scale: 1.0,
            width: 533.0,
            height: 400.0,
        },
    }
}

#[tokio::test]
async fn missing_frames_fail_with_one_notification() {
    let pipeline = ExportPipeline::new(MemoryFetcher::new(), FrameResolver::default());
    let mut notes = NotificationLog::new();
    let sink = Recorder::default();

    let outcome = pipeline.export_high_res(&job(), &mut notes, &sink).await;

    assert_eq!(outcome, ExportOutcome::Failed);
    assert_eq!(notes.entries.len(), 1);
    assert_eq!(notes.entries[0].level, NotificationLevel::Error);
    assert_eq!(notes.entries[0].message, EXPORT_FAILED);
    assert!(sink.delivered.borrow().is_empty());
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn concurrent_call_is_rejected_without_side_effects() {
    let pipeline = ExportPipeline::new(MemoryFetcher::new(), FrameResolver::default());
    let held = pipeline.busy.try_acquire().unwrap();
    assert!(pipeline.is_busy());

    let mut notes = NotificationLog::new();
    let sink = Recorder::default();
    let outcome = pipeline.export_high_res(&job(), &mut notes, &sink).await;

    assert_eq!(outcome, ExportOutcome::Busy);
    assert!(notes.entries.is_empty());
    assert!(sink.delivered.borrow().is_empty());

    drop(held);
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn dropping_an_export_midway_clears_busy() {
    let fetcher = MemoryFetcher::new()
        .with("frames/junior-frame.png", png_bytes(256, 256));
    let pipeline = ExportPipeline::new(fetcher, FrameResolver::default());
    let mut notes = NotificationLog::new();
    let sink = Recorder::default();
    let job = job();

    {
        let mut fut = std::pin::pin!(pipeline.export_high_res(&job, &mut notes, &sink));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
        assert!(pipeline.busy_flag().is_set());
    }

    assert!(!pipeline.is_busy());
    assert!(notes.entries.is_empty());
    assert!(sink.delivered.borrow().is_empty());
}
