//! Core types for image generation.

use crate::error::{GenChatError, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Default edge length, in pixels, of a generated image.
pub const DEFAULT_IMAGE_SIZE: u32 = 256;

/// Default number of diffusion steps.
pub const DEFAULT_STEPS: u32 = 2;

/// Encoded image formats recognised in downloaded payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        None
    }

    pub(crate) fn codec(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Encoding of the payload returned by the endpoint.
    pub source_format: Option<ImageFormat>,
    /// Generation duration in milliseconds, download included.
    pub duration_ms: Option<u64>,
}

/// A request to generate an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Width of the returned image in pixels.
    pub width: Option<u32>,
    /// Height of the returned image in pixels.
    pub height: Option<u32>,
    /// Number of diffusion steps.
    pub steps: u32,
    /// Number of images requested from the endpoint. Only the first is used.
    pub n: u32,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: None,
            height: None,
            steps: DEFAULT_STEPS,
            n: 1,
        }
    }

    /// Sets the dimensions of the returned image.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the diffusion step count.
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Sets how many images the endpoint should produce.
    pub fn with_count(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Returns `(width, height)`, defaulting each axis to 256.
    pub fn target_size(&self) -> (u32, u32) {
        (
            self.width.unwrap_or(DEFAULT_IMAGE_SIZE),
            self.height.unwrap_or(DEFAULT_IMAGE_SIZE),
        )
    }

    /// Rejects requests the endpoint or the resize step cannot serve.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenChatError::InvalidRequest("prompt is empty".into()));
        }
        let (width, height) = self.target_size();
        if width == 0 || height == 0 {
            return Err(GenChatError::InvalidRequest(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if self.steps == 0 || self.n == 0 {
            return Err(GenChatError::InvalidRequest(
                "steps and n must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A decoded, resized image with its metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Decoded raster.
    pub image: DynamicImage,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(image: DynamicImage, metadata: GenerationMetadata) -> Self {
        Self { image, metadata }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Saves the image, choosing the encoding from the path's extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    /// Encodes the image as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}
