use std::{fmt, sync::Arc};

use base64::Engine as _;

use crate::{
    assets::fetch::{data_uri_media_type, is_data_uri},
    foundation::error::{DpError, DpResult},
};

/// The uploaded photo as an encoded `data:` URI. Immutable; replacing the photo means building a
/// new source.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PhotoSource {
    uri: Arc<str>,
}

impl PhotoSource {
    /// Wrap an existing `data:` URI. Only `image/*` media types are accepted.
    pub fn from_data_uri(uri: impl Into<String>) -> DpResult<Self> {
        let uri = uri.into();
        if !is_data_uri(&uri) {
            return Err(DpError::validation("photo source must be a data: URI"));
        }
        match data_uri_media_type(&uri) {
            Some(media) if media.to_ascii_lowercase().starts_with("image/") => Ok(Self {
                uri: Arc::from(uri),
            }),
            Some(media) => Err(DpError::validation(format!(
                "photo source has non-image media type '{media}'"
            ))),
            None => Err(DpError::validation("photo source has no media type")),
        }
    }

    /// Build a source from uploaded file bytes, detecting the image format from content.
    pub fn from_encoded(bytes: &[u8]) -> DpResult<Self> {
        let format = image::guess_format(bytes)
            .map_err(|_| DpError::validation("uploaded file is not a recognized image"))?;
        let mime = format.to_mime_type();
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::from_data_uri(format!("data:{mime};base64,{payload}"))
    }

    /// The URI to hand to an [`crate::ImageLoader`].
    pub fn as_uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Debug for PhotoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoSource")
            .field("media_type", &data_uri_media_type(&self.uri))
            .field("uri_len", &self.uri.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photo.rs"]
mod tests;
