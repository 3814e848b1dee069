//! Text generator trait.

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text completion backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as a single user message and returns the first
    /// completion verbatim, or reflowed to the generator's wrap width when
    /// `wrap` is set.
    async fn generate(&self, prompt: &str, wrap: bool) -> Result<String>;

    /// Returns the model identifier used for completions.
    fn model(&self) -> &str;
}
