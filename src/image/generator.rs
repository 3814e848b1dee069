//! Image generator trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// Trait for image synthesis backends.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates an image and resizes it to the request's target size.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the model identifier used for synthesis.
    fn model(&self) -> &str;

    /// Generates an image from a bare prompt at `width` x `height`.
    async fn generate_sized(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<GeneratedImage> {
        let request = GenerationRequest::new(prompt).with_size(width, height);
        self.generate(&request).await
    }
}
