//! Together AI image generation (FLUX).

use crate::client::TogetherClient;
use crate::error::{GenChatError, Result};
use crate::image::generator::ImageGenerator;
use crate::image::types::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat};
use async_trait::async_trait;
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Instant;

/// Default image synthesis model.
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell-Free";

/// Builder for TogetherImageGenerator.
#[derive(Debug, Clone)]
pub struct TogetherImageGeneratorBuilder {
    client: TogetherClient,
    model: String,
    filter: FilterType,
}

impl TogetherImageGeneratorBuilder {
    /// Creates a builder around an existing client.
    pub fn new(client: TogetherClient) -> Self {
        Self {
            client,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            filter: FilterType::CatmullRom,
        }
    }

    /// Sets the synthesis model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the resampling filter used when resizing.
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Builds the generator.
    pub fn build(self) -> TogetherImageGenerator {
        TogetherImageGenerator {
            client: self.client,
            model: self.model,
            filter: self.filter,
        }
    }
}

/// Image generator backed by Together AI.
#[derive(Debug, Clone)]
pub struct TogetherImageGenerator {
    client: TogetherClient,
    model: String,
    filter: FilterType,
}

impl TogetherImageGenerator {
    /// Creates a new `TogetherImageGeneratorBuilder`.
    pub fn builder(client: TogetherClient) -> TogetherImageGeneratorBuilder {
        TogetherImageGeneratorBuilder::new(client)
    }

    async fn fetch_payload(&self, request: &GenerationRequest) -> Result<Vec<u8>> {
        let body = TogetherImageRequest::from_generation_request(request, &self.model);
        let response: TogetherImageResponse =
            self.client.post_json("images/generations", &body).await?;

        let first = response.data.into_iter().next().ok_or_else(|| {
            GenChatError::UnexpectedResponse("No images in generation response".into())
        })?;

        if let Some(url) = first.url {
            tracing::debug!(%url, "image ready, downloading");
            self.client.download(&url).await
        } else if let Some(b64) = first.b64_json {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(b64.trim())
                .map_err(|e| GenChatError::Decode(e.to_string()))
        } else {
            Err(GenChatError::UnexpectedResponse(
                "Generation response contained no image data".into(),
            ))
        }
    }
}

#[async_trait]
impl ImageGenerator for TogetherImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        request.validate()?;
        let start = Instant::now();

        let data = self.fetch_payload(request).await?;
        let (width, height) = request.target_size();
        let filter = self.filter;

        let (image, format) = tokio::task::spawn_blocking(move || {
            let (decoded, format) = decode_via_tempfile(&data)?;
            Ok::<_, GenChatError>((decoded.resize_exact(width, height, filter), format))
        })
        .await
        .map_err(|e| GenChatError::Io(std::io::Error::other(e)))??;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %self.model, width, height, duration_ms, "image generated");

        Ok(GeneratedImage::new(
            image,
            GenerationMetadata {
                model: Some(self.model.clone()),
                source_format: Some(format),
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Decodes `data` by way of a uniquely named temporary file.
///
/// The file is removed when this returns, whether or not decoding succeeds.
fn decode_via_tempfile(data: &[u8]) -> Result<(DynamicImage, ImageFormat)> {
    let format = ImageFormat::from_magic_bytes(data).ok_or_else(|| {
        GenChatError::Decode(format!(
            "unrecognized image payload ({} bytes)",
            data.len()
        ))
    })?;

    let mut file = tempfile::Builder::new()
        .prefix("genchat-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;

    let mut reader = image::ImageReader::open(file.path())?;
    reader.set_format(format.codec());
    let decoded = reader.decode()?;

    Ok((decoded, format))
}

#[derive(Debug, Serialize)]
struct TogetherImageRequest {
    prompt: String,
    model: String,
    steps: u32,
    n: u32,
}

impl TogetherImageRequest {
    fn from_generation_request(req: &GenerationRequest, model: &str) -> Self {
        Self {
            prompt: req.prompt.clone(),
            model: model.to_string(),
            steps: req.steps,
            n: req.n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TogetherImageResponse {
    #[serde(default)]
    data: Vec<TogetherImageData>,
}

#[derive(Debug, Deserialize)]
struct TogetherImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}
