use crate::foundation::core::Status;

/// Default URL prefix under which frame assets are served.
pub const DEFAULT_FRAMES_PREFIX: &str = "frames";

/// Primary and fallback frame resources for one status.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameSources {
    /// Raster asset, tried first.
    pub primary: String,
    /// Vector asset with the same artwork, used when the primary cannot be loaded.
    pub fallback: String,
}

/// Maps a [`Status`] to its frame resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameResolver {
    prefix: String,
}

impl Default for FrameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FRAMES_PREFIX)
    }
}

impl FrameResolver {
    /// Resolver serving frames from `prefix` (trailing slashes are ignored).
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve frame URLs for `status`. Total over the enum.
    pub fn resolve(&self, status: Status) -> FrameSources {
        let stem = format!("{}-frame", status.as_str());
        let join = |ext: &str| {
            if self.prefix.is_empty() {
                format!("{stem}.{ext}")
            } else {
                format!("{}/{stem}.{ext}", self.prefix)
            }
        };
        FrameSources {
            primary: join("png"),
            fallback: join("svg"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
