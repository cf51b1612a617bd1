use crate::{
    assets::{
        decode::{DecodeSize, LoadedImage, decode_resource},
        fetch::ResourceFetcher,
        frames::FrameSources,
    },
    foundation::error::{DpError, DpResult, display_url},
};

/// Fetches and decodes images. Decoding runs on the blocking pool so the async caller stays
/// responsive.
#[derive(Clone, Debug)]
pub struct ImageLoader<F> {
    fetcher: F,
}

impl<F: ResourceFetcher> ImageLoader<F> {
    /// Loader pulling bytes from `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Access the underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load and decode one image. Any fetch or decode failure becomes
    /// [`DpError::ResourceLoad`].
    #[tracing::instrument(skip(self, url), fields(url = %display_url(url)))]
    pub async fn load(&self, url: &str, size: DecodeSize) -> DpResult<LoadedImage> {
        let bytes = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| as_load_error(url, e))?;

        let owned_url = url.to_string();
        let decoded =
            tokio::task::spawn_blocking(move || decode_resource(&owned_url, &bytes, size))
                .await
                .map_err(|e| DpError::resource_load(url, format!("decode task failed: {e}")))?;

        let image = decoded.map_err(|e| as_load_error(url, e))?;
        tracing::debug!(size = ?image.natural_size(), vector = image.is_vector(), "image loaded");
        Ok(image)
    }

    /// Load a frame: primary first, then the fallback on any failure. The fallback's error is
    /// returned if both fail.
    #[tracing::instrument(skip(self, sources), fields(primary = %sources.primary))]
    pub async fn load_with_fallback(
        &self,
        sources: &FrameSources,
        size: DecodeSize,
    ) -> DpResult<LoadedImage> {
        match self.load(&sources.primary, size).await {
            Ok(image) => Ok(image),
            Err(primary_err) => {
                tracing::warn!(
                    error = %primary_err,
                    fallback = %sources.fallback,
                    "primary frame unavailable, trying fallback"
                );
                self.load(&sources.fallback, size).await
            }
        }
    }
}

fn as_load_error(url: &str, err: DpError) -> DpError {
    match err {
        DpError::ResourceLoad { .. } => err,
        other => DpError::resource_load(url, format!("{other:#}")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
