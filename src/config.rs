use std::path::PathBuf;

use crate::assets::frames::DEFAULT_FRAMES_PREFIX;

pub const ENV_ASSETS_DIR: &str = "DPFRAME_ASSETS_DIR";
pub const ENV_FRAMES_PREFIX: &str = "DPFRAME_FRAMES_PREFIX";
pub const ENV_DOWNLOAD_DIR: &str = "DPFRAME_DOWNLOAD_DIR";

/// Where assets come from and where exports go.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory that relative asset URLs resolve against.
    pub assets_root: PathBuf,
    /// URL prefix of the frame assets under `assets_root`.
    pub frames_prefix: String,
    /// Directory receiving exported PNGs.
    pub download_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            frames_prefix: DEFAULT_FRAMES_PREFIX.to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Defaults overridden by `DPFRAME_*` environment variables. Empty values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            assets_root: var(ENV_ASSETS_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_root),
            frames_prefix: var(ENV_FRAMES_PREFIX).unwrap_or(defaults.frames_prefix),
            download_dir: var(ENV_DOWNLOAD_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
