//! Turning user photos into [`EncodedImage`]s.
//!
//! Two entry points mirror the two ways a photo arrives: [`read_file`] for a
//! picked file (type taken from the extension, then the file header) and
//! [`accept_dropped`] for a dropped file whose declared type only has to look
//! like an image.

use crate::error::{DiyaError, Result};
use crate::image::{EncodedImage, ImageFormat};
use base64::Engine;
use std::path::Path;

/// Media types offered by the photo picker.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Encodes raw bytes and pairs them with their media type.
pub fn normalize(bytes: &[u8], media_type: impl Into<String>) -> EncodedImage {
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    EncodedImage::new(data, media_type)
}

/// Reads a picked photo from disk.
pub fn read_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .or_else(|| ImageFormat::from_magic_bytes(&bytes))
        .ok_or_else(|| {
            DiyaError::UnsupportedMediaType(format!(
                "{} is not a PNG, JPEG or WEBP image",
                path.display()
            ))
        })?;

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        media_type = format.mime_type(),
        "read photo"
    );
    Ok(normalize(&bytes, format.mime_type()))
}

/// Accepts a dropped photo if its declared type starts with `image/`.
pub fn accept_dropped(bytes: &[u8], declared_type: &str) -> Result<EncodedImage> {
    if !declared_type.starts_with("image/") {
        return Err(DiyaError::UnsupportedMediaType(declared_type.to_string()));
    }
    Ok(normalize(bytes, declared_type))
}
