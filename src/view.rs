//! What the user sees: the status panel and the generate trigger.

use crate::image::GeneratedImage;
use std::fmt;

/// Trigger label while idle.
pub const GENERATE_LABEL: &str = "Generate Image";
/// Trigger label while a request is in flight.
pub const GENERATING_LABEL: &str = "Generating Your Portrait...";

/// One of the four renderings of the output panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    /// A request is in flight.
    Loading,
    /// The last attempt failed with this message.
    Error(String),
    /// The last attempt produced this portrait.
    Success(GeneratedImage),
    /// Nothing attempted yet.
    Initial,
}

impl StatusView {
    /// Picks the rendering for the given inputs.
    ///
    /// Loading wins over an error, an error over an image, an image over the
    /// placeholder. Stale errors or images never show through a load.
    pub fn project(
        is_loading: bool,
        error: Option<&str>,
        generated_image: Option<&GeneratedImage>,
    ) -> Self {
        if is_loading {
            Self::Loading
        } else if let Some(message) = error {
            Self::Error(message.to_string())
        } else if let Some(image) = generated_image {
            Self::Success(image.clone())
        } else {
            Self::Initial
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(
                f,
                "Crafting your portrait...\nThis may take a moment. The AI is lighting the deepas!"
            ),
            Self::Error(message) => write!(f, "Oops! Something went wrong.\n{message}"),
            Self::Success(image) => write!(
                f,
                "Generated Deepavali Portrait ({}, {} base64 chars)",
                image.media_type,
                image.data.len()
            ),
            Self::Initial => write!(
                f,
                "Your generated portrait will appear here.\nUpload your photos and click \"Generate\" to see the magic!"
            ),
        }
    }
}

/// State of the generate button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerView {
    /// Whether pressing it starts an attempt.
    pub enabled: bool,
    /// Button text.
    pub label: &'static str,
}

impl TriggerView {
    /// Disabled while loading or while photos are missing.
    pub fn project(is_loading: bool, has_required_images: bool) -> Self {
        Self {
            enabled: !is_loading && has_required_images,
            label: if is_loading {
                GENERATING_LABEL
            } else {
                GENERATE_LABEL
            },
        }
    }
}
