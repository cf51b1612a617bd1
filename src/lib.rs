//! dp-frame composites a user's photo under a status-specific decorative frame.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `Status -> FrameSources` (raster primary, vector fallback)
//! 2. **Load**: fetch bytes, decode off the async thread into a [`LoadedImage`]
//! 3. **Position**: cover-fit once per photo, then pan/zoom through the [`PositioningController`]
//! 4. **Preview**: [`PreviewSession`] draws photo-then-frame on a 400px [`Surface`], coalescing
//!    redraws to one per display frame
//! 5. **Export**: [`ExportPipeline`] re-renders the same composition at 3000px and delivers a PNG
//!
//! Pixels are premultiplied RGBA8 on every surface. Frames are always drawn last, over the full
//! surface.
#![forbid(unsafe_code)]

mod assets;
mod export;
mod foundation;
mod interact;
mod render;
mod session;

/// Share caption text for finished pictures.
pub mod caption;
/// Runtime settings (asset root, frame prefix, download directory).
pub mod config;
/// Preview/export coordinate model: cover fit, resolution mapping, clamps.
pub mod transform;

pub use assets::decode::{DecodeSize, ImageKind, LoadedImage, decode_image, parse_svg, sniff_kind};
pub use assets::fetch::{
    AssetFetcher, MemoryFetcher, ResourceFetcher, decode_data_uri, is_data_uri,
    normalize_rel_path,
};
pub use assets::frames::{DEFAULT_FRAMES_PREFIX, FrameResolver, FrameSources};
pub use assets::loader::ImageLoader;
pub use assets::photo::PhotoSource;
pub use export::download::{DirectoryDownloads, DownloadSink, export_filename};
pub use export::pipeline::{
    BusyFlag, EXPORT_FAILED, EXPORT_SUCCEEDED, ExportJob, ExportOutcome, ExportPipeline,
};
pub use foundation::core::{
    HIGH_RES_SIZE, MAX_SCALE, MIN_SCALE, OFFSET_SLIDER_LIMIT, PREVIEW_SIZE, Point, Rect,
    SCALE_RATIO, Status, UserSelection, Vec2,
};
pub use foundation::error::{DpError, DpResult, display_url};
pub use interact::controller::{DragState, PositioningController};
pub use render::compositor::{Compositor, draw_image};
pub use render::scheduler::RedrawScheduler;
pub use render::surface::Surface;
pub use session::notify::{
    Notification, NotificationLevel, NotificationLog, Notifier, PositionLog, PositionSink,
};
pub use session::preview::{
    FRAME_LOAD_FAILED, FrameLoaded, FrameRequest, PHOTO_LOAD_FAILED, PhotoLoaded, PhotoRequest,
    PreviewSession,
};
pub use transform::placement::{ImagePosition, initial_fit, to_high_res, to_low_res};
