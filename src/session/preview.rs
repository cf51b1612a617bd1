use std::collections::HashMap;

use crate::{
    assets::{
        decode::{DecodeSize, LoadedImage},
        fetch::ResourceFetcher,
        frames::{FrameResolver, FrameSources},
        loader::ImageLoader,
        photo::PhotoSource,
    },
    export::pipeline::ExportJob,
    foundation::{
        core::{PREVIEW_SIZE, Point, Rect, Status, UserSelection},
        error::DpResult,
    },
    interact::controller::PositioningController,
    render::{compositor::Compositor, scheduler::RedrawScheduler, surface::Surface},
    session::notify::{Notification, Notifier, PositionSink},
    transform::placement::{ImagePosition, client_to_surface, initial_fit},
};

/// Shown when the photo cannot be fetched or decoded.
pub const PHOTO_LOAD_FAILED: &str = "Failed to load your photo.";
/// Shown when neither frame source for the status loads.
pub const FRAME_LOAD_FAILED: &str = "Failed to load the frame.";
/// Display time of both load failure messages.
pub const LOAD_FAILED_MS: u64 = 4000;

/// A pending photo load, tagged with the photo generation it was issued for.
#[derive(Clone, Debug)]
pub struct PhotoRequest {
    generation: u64,
    photo: PhotoSource,
}

/// A pending frame load, tagged with the status it was issued for.
#[derive(Clone, Debug)]
pub struct FrameRequest {
    status: Status,
    sources: FrameSources,
}

impl FrameRequest {
    /// Status this frame belongs to.
    pub fn status(&self) -> Status {
        self.status
    }
}

/// A finished photo load, passed back to [`PreviewSession::apply_photo`].
#[derive(Debug)]
pub struct PhotoLoaded {
    generation: u64,
    result: DpResult<LoadedImage>,
}

/// A finished frame load, passed back to [`PreviewSession::apply_frame`].
#[derive(Debug)]
pub struct FrameLoaded {
    status: Status,
    result: DpResult<LoadedImage>,
}

/// The live 400px preview: loads the photo and the frame for the current status, keeps the
/// decoded handles, and redraws as the user pans and zooms.
///
/// Loads are split into request / fetch / apply so that a host can drive them in any order;
/// completions for a replaced photo or a status that is no longer selected are dropped.
pub struct PreviewSession<F, S, N> {
    selection: UserSelection,
    photo: PhotoSource,
    generation: u64,
    loader: ImageLoader<F>,
    resolver: FrameResolver,
    photo_image: Option<LoadedImage>,
    frames: HashMap<Status, LoadedImage>,
    fitted: bool,
    controller: PositioningController,
    scheduler: RedrawScheduler,
    compositor: Compositor,
    surface: Option<Surface>,
    sink: S,
    notifier: N,
}

impl<F, S, N> PreviewSession<F, S, N>
where
    F: ResourceFetcher,
    S: PositionSink,
    N: Notifier,
{
    /// Session for `selection` showing `photo`. Nothing is loaded until [`Self::refresh`] or the
    /// request / fetch / apply steps run.
    pub fn new(
        selection: UserSelection,
        photo: PhotoSource,
        fetcher: F,
        resolver: FrameResolver,
        sink: S,
        notifier: N,
    ) -> Self {
        Self {
            selection,
            photo,
            generation: 0,
            loader: ImageLoader::new(fetcher),
            resolver,
            photo_image: None,
            frames: HashMap::new(),
            fitted: false,
            controller: PositioningController::new(ImagePosition::default()),
            scheduler: RedrawScheduler::new(),
            compositor: Compositor,
            surface: None,
            sink,
            notifier,
        }
    }

    /// Start from a position already persisted upstream instead of fitting the photo on load.
    pub fn with_position(mut self, position: ImagePosition) -> Self {
        self.controller.reset(position);
        self.fitted = true;
        self
    }

    /// Current name, section and status.
    pub fn selection(&self) -> &UserSelection {
        &self.selection
    }

    /// Photo being shown.
    pub fn photo(&self) -> &PhotoSource {
        &self.photo
    }

    /// Bumped on every [`Self::replace_photo`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Position currently drawn (includes uncommitted interaction).
    pub fn position(&self) -> ImagePosition {
        self.controller.local()
    }

    /// Last position committed upstream.
    pub fn committed(&self) -> ImagePosition {
        self.controller.committed()
    }

    /// Drag and slider state.
    pub fn controller(&self) -> &PositioningController {
        &self.controller
    }

    /// Redraw coalescing state.
    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    /// Receiver of committed positions.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Receiver of load failure messages.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The preview surface, once something has been drawn.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// `true` when both the photo and the current frame are decoded.
    pub fn is_ready(&self) -> bool {
        self.photo_image.is_some() && self.frames.contains_key(&self.selection.status)
    }

    /// Request for the current photo, or `None` if it is already decoded.
    pub fn photo_request(&self) -> Option<PhotoRequest> {
        if self.photo_image.is_some() {
            tracing::debug!(generation = self.generation, "photo cache hit");
            return None;
        }
        Some(PhotoRequest {
            generation: self.generation,
            photo: self.photo.clone(),
        })
    }

    /// Request for the current status' frame, or `None` if it is already decoded.
    pub fn frame_request(&self) -> Option<FrameRequest> {
        let status = self.selection.status;
        if self.frames.contains_key(&status) {
            tracing::debug!(%status, "frame cache hit");
            return None;
        }
        Some(FrameRequest {
            status,
            sources: self.resolver.resolve(status),
        })
    }

    /// Fetch and decode the photo at native resolution. Touches no session state.
    pub async fn fetch_photo(&self, request: PhotoRequest) -> PhotoLoaded {
        let result = self
            .loader
            .load(request.photo.as_uri(), DecodeSize::Native)
            .await;
        PhotoLoaded {
            generation: request.generation,
            result,
        }
    }

    /// Fetch and decode the frame, raster first with the vector fallback, fitted to the preview.
    pub async fn fetch_frame(&self, request: FrameRequest) -> FrameLoaded {
        let result = self
            .loader
            .load_with_fallback(&request.sources, DecodeSize::Fit(PREVIEW_SIZE))
            .await;
        FrameLoaded {
            status: request.status,
            result,
        }
    }

    /// Install a finished photo load. Returns `false` if it was stale or failed.
    ///
    /// The first photo of a session is cover-fitted and the fit is committed upstream.
    pub fn apply_photo(&mut self, loaded: PhotoLoaded) -> bool {
        if loaded.generation != self.generation {
            tracing::debug!(
                stale = loaded.generation,
                current = self.generation,
                "dropping stale photo load"
            );
            return false;
        }

        let image = match loaded.result {
            Ok(image) => image,
            Err(err) => {
                tracing::error!(error = %err, "error loading photo");
                self.notifier
                    .notify(Notification::error(PHOTO_LOAD_FAILED, LOAD_FAILED_MS));
                return false;
            }
        };

        if !self.fitted {
            let (w, h) = image.natural_size();
            match initial_fit(w, h, PREVIEW_SIZE) {
                Ok(position) => {
                    self.controller.reset(position);
                    self.fitted = true;
                    self.sink.on_position_update(position);
                }
                Err(err) => {
                    tracing::error!(error = %err, "cannot fit photo");
                    self.notifier
                        .notify(Notification::error(PHOTO_LOAD_FAILED, LOAD_FAILED_MS));
                    return false;
                }
            }
        }

        self.photo_image = Some(image);
        self.render_now();
        true
    }

    /// Install a finished frame load. Returns `false` if it failed or was for a status that is no
    /// longer selected.
    pub fn apply_frame(&mut self, loaded: FrameLoaded) -> bool {
        if loaded.status != self.selection.status {
            tracing::debug!(
                stale = %loaded.status,
                current = %self.selection.status,
                "dropping stale frame load"
            );
            return false;
        }

        match loaded.result {
            Ok(image) => {
                self.frames.insert(loaded.status, image);
                self.render_now();
                true
            }
            Err(err) => {
                tracing::error!(error = %err, status = %loaded.status, "error loading frame");
                self.notifier
                    .notify(Notification::error(FRAME_LOAD_FAILED, LOAD_FAILED_MS));
                false
            }
        }
    }

    /// Load whatever is missing, photo and frame concurrently, and draw. Returns
    /// [`PreviewSession::is_ready`].
    pub async fn refresh(&mut self) -> bool {
        let photo_req = self.photo_request();
        let frame_req = self.frame_request();

        let (photo, frame) = {
            let this = &*self;
            tokio::join!(
                async {
                    match photo_req {
                        Some(req) => Some(this.fetch_photo(req).await),
                        None => None,
                    }
                },
                async {
                    match frame_req {
                        Some(req) => Some(this.fetch_frame(req).await),
                        None => None,
                    }
                }
            )
        };

        if let Some(frame) = frame {
            self.apply_frame(frame);
        }
        if let Some(photo) = photo {
            self.apply_photo(photo);
        }
        self.is_ready()
    }

    /// Swap in a new photo. The old handle and fit are discarded; loads still in flight for the
    /// previous photo will be ignored.
    pub fn replace_photo(&mut self, photo: PhotoSource) {
        self.generation += 1;
        self.photo = photo;
        self.photo_image = None;
        self.fitted = false;
        self.controller.reset(ImagePosition::default());
        self.scheduler.cancel();
    }

    /// Change the selected status. A cached frame for it is drawn right away.
    pub fn set_status(&mut self, status: Status) {
        if self.selection.status == status {
            return;
        }
        self.selection.status = status;
        if self.is_ready() {
            self.render_now();
        }
    }

    /// Upstream changed the persisted position (ignored mid-drag).
    pub fn sync_position(&mut self, position: ImagePosition) {
        self.controller.sync_committed(position);
        self.scheduler.request();
    }

    /// Pointer pressed at `client`, in coordinates of the displayed element `bounds`.
    pub fn pointer_down(&mut self, client: Point, bounds: Rect) {
        let p = client_to_surface(client, bounds, PREVIEW_SIZE);
        self.controller.pointer_down(p);
    }

    /// Pointer moved; pans the photo while a drag is active.
    pub fn pointer_move(&mut self, client: Point, bounds: Rect) {
        let p = client_to_surface(client, bounds, PREVIEW_SIZE);
        if self.controller.pointer_move(p) {
            self.scheduler.request();
        }
    }

    /// Drag ended. Returns the position committed upstream, if it moved.
    pub fn pointer_up(&mut self) -> Option<ImagePosition> {
        let commit = self.controller.pointer_up();
        self.forward(commit)
    }

    /// Drag interrupted; commits like [`Self::pointer_up`].
    pub fn pointer_cancel(&mut self) -> Option<ImagePosition> {
        let commit = self.controller.pointer_cancel();
        self.forward(commit)
    }

    /// Zoom slider moved. The value is clamped; nothing is committed until release.
    pub fn set_scale(&mut self, scale: f64) {
        if self.controller.set_scale(scale) {
            self.scheduler.request();
        }
    }

    /// Horizontal offset slider moved.
    pub fn set_x(&mut self, x: f64) {
        if self.controller.set_x(x) {
            self.scheduler.request();
        }
    }

    /// Vertical offset slider moved.
    pub fn set_y(&mut self, y: f64) {
        if self.controller.set_y(y) {
            self.scheduler.request();
        }
    }

    /// A slider was released. Returns the committed position, if any slider changed it.
    pub fn slider_released(&mut self) -> Option<ImagePosition> {
        let commit = self.controller.slider_released();
        self.forward(commit)
    }

    /// Display refresh boundary. Draws once if a redraw was requested; returns whether it drew.
    pub fn on_display_frame(&mut self) -> bool {
        let photo = self.photo_image.as_ref();
        let frame = self.frames.get(&self.selection.status);
        let position = self.controller.local();
        let compositor = self.compositor;
        let surface = &mut self.surface;
        self.scheduler
            .on_frame(|| draw_preview(&compositor, surface, photo, frame, &position))
    }

    /// Snapshot for the export pipeline, using the position currently on screen.
    pub fn export_job(&self) -> ExportJob {
        ExportJob {
            photo: self.photo.clone(),
            selection: self.selection.clone(),
            position: self.controller.local(),
        }
    }

    fn forward(&mut self, commit: Option<ImagePosition>) -> Option<ImagePosition> {
        if let Some(position) = commit {
            tracing::debug!(?position, "committing position");
            self.sink.on_position_update(position);
        }
        commit
    }

    fn render_now(&mut self) {
        let photo = self.photo_image.as_ref();
        let frame = self.frames.get(&self.selection.status);
        let position = self.controller.local();
        draw_preview(&self.compositor, &mut self.surface, photo, frame, &position);
    }
}

fn draw_preview(
    compositor: &Compositor,
    surface: &mut Option<Surface>,
    photo: Option<&LoadedImage>,
    frame: Option<&LoadedImage>,
    position: &ImagePosition,
) {
    let (Some(photo), Some(frame)) = (photo, frame) else {
        return;
    };
    if surface.is_none() {
        match Surface::new(PREVIEW_SIZE) {
            Ok(s) => *surface = Some(s),
            Err(err) => {
                tracing::error!(error = %err, "preview surface unavailable");
                return;
            }
        }
    }
    if let Some(target) = surface.as_mut() {
        compositor.render(target, photo, frame, position);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
