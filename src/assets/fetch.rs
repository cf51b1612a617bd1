use std::{
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{DpError, DpResult};

/// Asynchronous source of encoded resource bytes.
///
/// Implementations must not block the calling task; decoding happens in the loader.
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the encoded bytes behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = DpResult<Vec<u8>>> + Send;
}

impl<T: ResourceFetcher> ResourceFetcher for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = DpResult<Vec<u8>>> + Send {
        (**self).fetch(url)
    }
}

impl<T: ResourceFetcher> ResourceFetcher for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = DpResult<Vec<u8>>> + Send {
        (**self).fetch(url)
    }
}

/// Serves `data:` URIs inline and everything else from files under an asset root.
///
/// Site-root URLs (`/frames/a.png`) resolve against the asset root as well.
#[derive(Clone, Debug)]
pub struct AssetFetcher {
    root: PathBuf,
}

impl AssetFetcher {
    /// Fetcher reading relative URLs from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return root directory used when resolving relative asset paths.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceFetcher for AssetFetcher {
    async fn fetch(&self, url: &str) -> DpResult<Vec<u8>> {
        if is_data_uri(url) {
            return decode_data_uri(url);
        }

        let rel = url.strip_prefix('/').unwrap_or(url);
        let norm = normalize_rel_path(rel)?;
        let path = self.root.join(Path::new(&norm));
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(|e| DpError::resource_load(url, format!("{e:#}")))
    }
}

/// In-memory URL table; also understands `data:` URIs.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryFetcher {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(url.into(), Arc::new(bytes));
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> DpResult<Vec<u8>> {
        if is_data_uri(url) {
            return decode_data_uri(url);
        }
        self.entries
            .get(url)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| DpError::resource_load(url, "not found"))
    }
}

/// `true` when `url` is a `data:` URI.
pub fn is_data_uri(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Media type declared by a `data:` URI, if any (`image/png`, `image/svg+xml`, ...).
pub fn data_uri_media_type(url: &str) -> Option<&str> {
    if !is_data_uri(url) {
        return None;
    }
    let header = url[5..].split(',').next()?;
    let media = header.split(';').next()?.trim();
    if media.is_empty() { None } else { Some(media) }
}

/// Decode the payload of a `data:` URI. Base64 and plain payloads are supported.
pub fn decode_data_uri(url: &str) -> DpResult<Vec<u8>> {
    if !is_data_uri(url) {
        return Err(DpError::resource_load(url, "not a data URI"));
    }
    let (header, payload) = url[5..]
        .split_once(',')
        .ok_or_else(|| DpError::resource_load(url, "data URI has no payload separator"))?;

    if header
        .rsplit(';')
        .next()
        .is_some_and(|p| p.eq_ignore_ascii_case("base64"))
    {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| DpError::resource_load(url, format!("invalid base64 payload: {e}")))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> DpResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(DpError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(DpError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DpError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DpError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
