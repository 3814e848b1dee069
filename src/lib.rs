#![warn(missing_docs)]
//! GenChat - text, image and illustrated chat generation via Together AI.
//!
//! # Quick Start - Text
//!
//! ```no_run
//! use genchat::{TextGenerator, TogetherClient, TogetherTextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> genchat::Result<()> {
//!     let client = TogetherClient::builder().build()?;
//!     let text = TogetherTextGenerator::builder(client).build()?;
//!     let post = text.generate("write a 3 line post about pizza", true).await?;
//!     println!("{post}");
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Chat
//!
//! ```no_run
//! use std::sync::Arc;
//! use genchat::{
//!     ConversationOrchestrator, History, TogetherClient, TogetherImageGenerator,
//!     TogetherTextGenerator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> genchat::Result<()> {
//!     let client = TogetherClient::builder().build()?;
//!     let chat = ConversationOrchestrator::new(
//!         Arc::new(TogetherTextGenerator::builder(client.clone()).build()?),
//!         Arc::new(TogetherImageGenerator::builder(client).build()),
//!     );
//!
//!     let turn = chat.respond("write a haiku about rain", &History::new()).await?;
//!     println!("{}", turn.reply());
//!     turn.image.save("haiku.png")?;
//!     Ok(())
//! }
//! ```

pub mod chat;
mod client;
mod error;
pub mod image;
pub mod text;

pub use client::{
    TogetherClient, TogetherClientBuilder, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL,
};
pub use error::{ErrorCategory, GenChatError, Result};

pub use crate::chat::{ChatTurn, ConversationOrchestrator, Exchange, History, Persona};
pub use crate::image::{
    GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ImageGenerator,
    TogetherImageGenerator, TogetherImageGeneratorBuilder,
};
pub use crate::text::{TextGenerator, TogetherTextGenerator, TogetherTextGeneratorBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::chat::{ConversationOrchestrator, History};
    pub use crate::error::{GenChatError, Result};
    pub use crate::image::{GeneratedImage, GenerationRequest, ImageGenerator};
    pub use crate::text::TextGenerator;
    pub use crate::{TogetherClient, TogetherImageGenerator, TogetherTextGenerator};
}
