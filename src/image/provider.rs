//! Portrait provider trait.

use crate::error::Result;
use crate::image::types::{EncodedImage, GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// A remote service that turns a prompt plus photos into one image.
#[async_trait]
pub trait PortraitProvider: Send + Sync {
    /// Runs one generation attempt. No retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;

    /// Checks if the provider is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}

/// Sends `prompt` with one or two photos through `provider`.
///
/// `second` is appended after `first` when present.
pub async fn generate(
    provider: &dyn PortraitProvider,
    prompt: &str,
    first: &EncodedImage,
    second: Option<&EncodedImage>,
) -> Result<GeneratedImage> {
    let mut images = vec![first.clone()];
    images.extend(second.cloned());
    let request = GenerationRequest::new(prompt, images)?;
    provider.generate(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::types::GenerationMetadata;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl PortraitProvider for Recorder {
        async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(GeneratedImage::new(
                "ZZZ",
                "image/png",
                GenerationMetadata::default(),
            ))
        }

        fn name(&self) -> &str {
            "recorder"
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_generate_single_photo() {
        let provider = Recorder::default();
        let first = EncodedImage::new("AAA", "image/png");

        let image = generate(&provider, "prompt", &first, None).await.unwrap();
        assert_eq!(image.data, "ZZZ");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].prompt(), "prompt");
        assert_eq!(seen[0].images(), &[first]);
    }

    #[tokio::test]
    async fn test_generate_keeps_photo_order() {
        let provider = Recorder::default();
        let first = EncodedImage::new("AAA", "image/png");
        let second = EncodedImage::new("BBB", "image/jpeg");

        let image = generate(&provider, "prompt", &first, Some(&second))
            .await
            .unwrap();
        assert_eq!(image.data, "ZZZ");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].images(), &[first, second]);
    }
}
