//! Core types for portrait generation.

use crate::error::{DiyaError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image formats accepted for upload and returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a MIME type onto a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// A user photo ready for transmission: base64 text plus its media type.
///
/// Immutable once built; replacing a slot means building a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    data: String,
    media_type: String,
}

impl EncodedImage {
    /// Wraps already-encoded base64 data.
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Base64 data (standard alphabet, padded).
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Declared media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

/// One generation attempt: the prompt text followed by one or two photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    images: Vec<EncodedImage>,
}

impl GenerationRequest {
    /// Maximum photos per attempt.
    pub const MAX_IMAGES: usize = 2;

    /// Creates a request. Rejects an empty image list or more than two photos.
    pub fn new(prompt: impl Into<String>, images: Vec<EncodedImage>) -> Result<Self> {
        if images.is_empty() {
            return Err(DiyaError::InvalidRequest(
                "at least one photo is required".into(),
            ));
        }
        if images.len() > Self::MAX_IMAGES {
            return Err(DiyaError::InvalidRequest(format!(
                "at most {} photos are supported, got {}",
                Self::MAX_IMAGES,
                images.len()
            )));
        }
        Ok(Self {
            prompt: prompt.into(),
            images,
        })
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Photos in slot order.
    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// The portrait returned by the API, base64 data kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be saved or displayed"]
pub struct GeneratedImage {
    /// Base64 image data as returned.
    pub data: String,
    /// MIME type reported by the API.
    pub media_type: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(
        data: impl Into<String>,
        media_type: impl Into<String>,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
            metadata,
        }
    }

    /// The format named by the media type, if it is one we know.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.media_type)
    }

    /// Decodes the base64 payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| DiyaError::Decode(e.to_string()))
    }

    /// Decodes and saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.decode()?;
        std::fs::write(path, &bytes)?;
        Ok(bytes.len())
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    fn photo() -> EncodedImage {
        EncodedImage::new("AAA", "image/png")
    }

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_format_from_extension_and_mime() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        assert_eq!(
            ImageFormat::from_mime_type("image/webp"),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_mime_type("image/gif"), None);
    }

    #[test]
    fn test_request_accepts_one_or_two_images() {
        let single = GenerationRequest::new("p", vec![photo()]).unwrap();
        assert_eq!(single.images().len(), 1);
        assert_eq!(single.prompt(), "p");

        let couple = GenerationRequest::new("p", vec![photo(), photo()]).unwrap();
        assert_eq!(couple.images().len(), 2);
    }

    #[test]
    fn test_request_rejects_bad_image_counts() {
        assert!(matches!(
            GenerationRequest::new("p", vec![]),
            Err(DiyaError::InvalidRequest(_))
        ));
        assert!(matches!(
            GenerationRequest::new("p", vec![photo(), photo(), photo()]),
            Err(DiyaError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_generated_image_decode_and_data_url() {
        // "hi!" in base64
        let image = GeneratedImage::new("aGkh", "image/png", GenerationMetadata::default());
        assert_eq!(image.decode().unwrap(), b"hi!");
        assert_eq!(image.format(), Some(ImageFormat::Png));
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGkh");
    }

    #[test]
    fn test_generated_image_bad_base64() {
        let image = GeneratedImage::new("not base64!", "image/png", GenerationMetadata::default());
        assert!(matches!(image.decode(), Err(DiyaError::Decode(_))));
    }

    #[test]
    fn test_generated_image_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.png");
        let image = GeneratedImage::new("aGkh", "image/png", GenerationMetadata::default());

        let written = image.save(&path).unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"hi!");
    }
}
