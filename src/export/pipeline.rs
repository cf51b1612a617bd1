use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::{
        decode::DecodeSize, fetch::ResourceFetcher, frames::FrameResolver, loader::ImageLoader,
        photo::PhotoSource,
    },
    export::download::{DownloadSink, export_filename},
    foundation::{
        core::{HIGH_RES_SIZE, SCALE_RATIO, UserSelection},
        error::{DpError, DpResult},
    },
    render::{compositor::Compositor, surface::Surface},
    session::notify::{Notification, Notifier},
    transform::placement::{ImagePosition, to_high_res},
};

/// Shown once the PNG has been delivered.
pub const EXPORT_SUCCEEDED: &str = "High-resolution image downloaded! 🎉";
/// Display time of [`EXPORT_SUCCEEDED`].
pub const EXPORT_SUCCEEDED_MS: u64 = 3000;
/// Shown when any export step after surface allocation fails.
pub const EXPORT_FAILED: &str = "Failed to export image. Please try again.";
/// Display time of [`EXPORT_FAILED`].
pub const EXPORT_FAILED_MS: u64 = 4000;

/// Everything needed to re-render a composition at full resolution.
#[derive(Clone, Debug)]
pub struct ExportJob {
    /// Photo to draw, reloaded at native resolution.
    pub photo: PhotoSource,
    /// Picks the frame and the download name.
    pub selection: UserSelection,
    /// Preview-space position; scaled to the export surface by the pipeline.
    pub position: ImagePosition,
}

/// Result of one [`ExportPipeline::export_high_res`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The PNG was delivered under this file name.
    Downloaded(String),
    /// Loading, drawing, encoding or delivery failed; the user was notified once.
    Failed,
    /// Another export was running; nothing happened.
    Busy,
    /// No drawing surface could be allocated; logged only.
    Skipped,
}

/// Shared "export in progress" flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// `true` while an export is running.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

/// Clears the busy flag when dropped, on every exit path including cancellation.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Re-renders a composition at [`HIGH_RES_SIZE`] and delivers it as a PNG.
///
/// Resources are loaded fresh at native resolution; nothing from the preview is reused.
#[derive(Debug)]
pub struct ExportPipeline<F> {
    loader: ImageLoader<F>,
    resolver: FrameResolver,
    busy: BusyFlag,
}

impl<F: ResourceFetcher> ExportPipeline<F> {
    /// Pipeline loading through `fetcher` and looking frames up with `resolver`.
    pub fn new(fetcher: F, resolver: FrameResolver) -> Self {
        Self {
            loader: ImageLoader::new(fetcher),
            resolver,
            busy: BusyFlag::default(),
        }
    }

    /// `true` while an export is running.
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// A handle on the busy flag, e.g. to disable an export button while it is set.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Loader used for the export's photo and frame.
    pub fn loader(&self) -> &ImageLoader<F> {
        &self.loader
    }

    /// Run one export. At most one export runs at a time; a concurrent call returns
    /// [`ExportOutcome::Busy`] without side effects.
    #[tracing::instrument(skip_all, fields(status = %job.selection.status))]
    pub async fn export_high_res<N, D>(
        &self,
        job: &ExportJob,
        notifier: &mut N,
        downloads: &D,
    ) -> ExportOutcome
    where
        N: Notifier + ?Sized,
        D: DownloadSink + ?Sized,
    {
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!("export already in progress");
            return ExportOutcome::Busy;
        };

        match self.run(job, downloads).await {
            Ok(filename) => {
                tracing::info!(%filename, "export finished");
                notifier.notify(Notification::success(EXPORT_SUCCEEDED, EXPORT_SUCCEEDED_MS));
                ExportOutcome::Downloaded(filename)
            }
            Err(err) if err.is_surface_unavailable() => {
                tracing::error!(error = %err, "export surface unavailable");
                ExportOutcome::Skipped
            }
            Err(err) => {
                tracing::error!(error = %err, "error exporting image");
                notifier.notify(Notification::error(EXPORT_FAILED, EXPORT_FAILED_MS));
                ExportOutcome::Failed
            }
        }
    }

    async fn run<D: DownloadSink + ?Sized>(&self, job: &ExportJob, downloads: &D) -> DpResult<String> {
        let mut surface = Surface::new(HIGH_RES_SIZE)?;

        let photo = self
            .loader
            .load(job.photo.as_uri(), DecodeSize::Native)
            .await?;
        let position = to_high_res(&job.position, SCALE_RATIO);
        let frame = self
            .loader
            .load_with_fallback(&self.resolver.resolve(job.selection.status), DecodeSize::Native)
            .await?;

        let png = tokio::task::spawn_blocking(move || {
            Compositor.compose(&mut surface, &photo, &frame, &position)?;
            surface.encode_png()
        })
        .await
        .map_err(|e| DpError::export(format!("render task failed: {e}")))??;

        let filename = export_filename(&job.selection.name, job.selection.status);
        downloads.deliver(&filename, &png)?;
        Ok(filename)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
