//! Image types and the generation client.

mod provider;
pub mod providers;
mod types;

pub use provider::{generate, PortraitProvider};
pub use types::{
    EncodedImage, GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat,
};
