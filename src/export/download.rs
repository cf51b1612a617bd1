use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{
    core::Status,
    error::{DpError, DpResult},
};

/// Receives finished exports.
pub trait DownloadSink {
    /// Hand over the encoded PNG. Only called once encoding has completed.
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DpResult<()>;
}

impl<T: DownloadSink + ?Sized> DownloadSink for &T {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DpResult<()> {
        (**self).deliver(filename, bytes)
    }
}

/// Writes downloads into a directory. Files appear atomically: bytes go to `{name}.part` first and
/// are renamed into place.
#[derive(Clone, Debug)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Sink writing into `dir`, created on first delivery.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `filename` ends up once delivered.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DownloadSink for DirectoryDownloads {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> DpResult<()> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(DpError::export(format!(
                "download name must be a plain file name, got '{filename}'"
            )));
        }

        let dest = self.path_for(filename);
        ensure_parent_dir(&dest)?;
        let part = self.dir.join(format!("{filename}.part"));
        let written = std::fs::write(&part, bytes)
            .with_context(|| format!("failed to write '{}'", part.display()))
            .and_then(|()| {
                std::fs::rename(&part, &dest).with_context(|| {
                    format!(
                        "failed to move '{}' to '{}'",
                        part.display(),
                        dest.display()
                    )
                })
            });
        if let Err(err) = written {
            let _ = std::fs::remove_file(&part);
            return Err(err.into());
        }
        tracing::info!(path = %dest.display(), bytes = bytes.len(), "download written");
        Ok(())
    }
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> DpResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `{name}_{status}_dp.png`, with every run of whitespace in `name` replaced by one `_`.
///
/// Path separators in `name` also become `_`, so the result is always a plain file name.
pub fn export_filename(name: &str, status: Status) -> String {
    let mut out = String::with_capacity(name.len() + 16);
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(if matches!(ch, '/' | '\\') { '_' } else { ch });
            in_space = false;
        }
    }
    out.push('_');
    out.push_str(status.as_str());
    out.push_str("_dp.png");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
