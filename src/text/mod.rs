//! Text generation module.

mod generator;
mod together;
mod wrap;

pub use generator::TextGenerator;
pub use together::{
    ChatMessage, TogetherTextGenerator, TogetherTextGeneratorBuilder, DEFAULT_TEXT_MODEL,
};
pub use wrap::{fill, DEFAULT_WRAP_WIDTH};
