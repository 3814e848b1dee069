//! Image generation module.

mod generator;
mod together;
mod types;

pub use generator::ImageGenerator;
pub use together::{TogetherImageGenerator, TogetherImageGeneratorBuilder, DEFAULT_IMAGE_MODEL};
pub use types::{
    GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, DEFAULT_IMAGE_SIZE,
    DEFAULT_STEPS,
};
