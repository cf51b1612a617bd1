/// Convenience result type used across dp-frame.
pub type DpResult<T> = Result<T, DpError>;

/// Top-level error taxonomy used by the compositing and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum DpError {
    /// An image (photo or frame) could not be fetched or decoded.
    #[error("resource load error: {url}: {reason}")]
    ResourceLoad {
        /// Resource that failed. Data URIs are abbreviated.
        url: String,
        /// Underlying fetch or decode failure.
        reason: String,
    },

    /// The drawing surface could not be acquired.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Any failure in the export pipeline after surface acquisition.
    #[error("export failure: {0}")]
    Export(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DpError {
    /// Build a [`DpError::ResourceLoad`] value.
    ///
    /// Long `data:` URIs are cut down to their media-type prefix so log lines stay readable.
    pub fn resource_load(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::ResourceLoad {
            url: display_url(url),
            reason: reason.to_string(),
        }
    }

    /// Build a [`DpError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`DpError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`DpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` for errors that only indicate a surface lifecycle race.
    pub fn is_surface_unavailable(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable(_))
    }
}

/// Shorten a resource URL for messages: data URIs keep only their header.
pub fn display_url(url: &str) -> String {
    if url.starts_with("data:") {
        let header = url.split(',').next().unwrap_or(url);
        return format!("{header},...");
    }
    url.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
