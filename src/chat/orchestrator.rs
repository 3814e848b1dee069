//! Two-step chat turn: persona reply, then an illustration of the reply.

use crate::chat::history::{Exchange, History};
use crate::chat::persona::Persona;
use crate::error::Result;
use crate::image::{GeneratedImage, GenerationRequest, ImageGenerator};
use crate::text::TextGenerator;
use std::sync::Arc;
use std::time::Instant;

/// Result of one successful chat turn.
#[derive(Debug, Clone)]
#[must_use = "the updated history replaces the caller's previous history"]
pub struct ChatTurn {
    /// Value for the input field after the turn; always empty.
    pub input: String,
    /// Previous history with this turn's exchange appended.
    pub history: History,
    /// Illustration of the reply.
    pub image: GeneratedImage,
}

impl ChatTurn {
    /// The reply produced in this turn.
    pub fn reply(&self) -> &str {
        self.history.last().map(Exchange::reply).unwrap_or_default()
    }
}

/// Turns a user message into a persona reply plus an illustration.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    persona: Persona,
}

impl std::fmt::Debug for ConversationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationOrchestrator")
            .field("text_model", &self.text.model())
            .field("image_model", &self.image.model())
            .field("persona", &self.persona)
            .finish()
    }
}

impl ConversationOrchestrator {
    /// Creates an orchestrator with the default persona.
    pub fn new(text: Arc<dyn TextGenerator>, image: Arc<dyn ImageGenerator>) -> Self {
        Self {
            text,
            image,
            persona: Persona::default(),
        }
    }

    /// Replaces the persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Returns the active persona.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Runs one chat turn.
    ///
    /// `history` is never modified. On success the returned turn carries a
    /// copy with the new exchange appended; on failure nothing is appended
    /// anywhere and the caller keeps its history as it was.
    pub async fn respond(&self, user_message: &str, history: &History) -> Result<ChatTurn> {
        let start = Instant::now();

        let prompt = self.persona.chat_prompt(user_message);
        let reply = self.text.generate(&prompt, false).await?;
        tracing::debug!(chars = reply.len(), "reply generated");

        let request = GenerationRequest::new(self.persona.image_prompt(&reply));
        let image = self.image.generate(&request).await?;

        let history = history
            .clone()
            .with_exchange(Exchange::new(user_message, reply));

        tracing::info!(
            turn = history.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "chat turn complete"
        );

        Ok(ChatTurn {
            input: String::new(),
            history,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, GenChatError};
    use crate::image::GenerationMetadata;
    use async_trait::async_trait;
    use image::{DynamicImage, RgbImage};
    use std::sync::Mutex;

    /// Returns a canned reply and records every prompt it receives.
    struct FakeText {
        reply: std::result::Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeText {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for FakeText {
        async fn generate(&self, prompt: &str, _wrap: bool) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(GenChatError::Api {
                    status: *status,
                    message: "text endpoint failed".into(),
                }),
            }
        }

        fn model(&self) -> &str {
            "fake-text"
        }
    }

    /// Produces a blank raster of the requested size, or fails.
    struct FakeImage {
        fail: bool,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeImage {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ImageGenerator for FakeImage {
        async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(GenChatError::Api {
                    status: 404,
                    message: "Failed to download image".into(),
                });
            }
            let (width, height) = request.target_size();
            Ok(GeneratedImage::new(
                DynamicImage::ImageRgb8(RgbImage::new(width, height)),
                GenerationMetadata::default(),
            ))
        }

        fn model(&self) -> &str {
            "fake-image"
        }
    }

    #[tokio::test]
    async fn test_respond_appends_one_exchange() {
        let text = FakeText::ok("B.E.C.R.E.A.T.I.V.E rain taps softly");
        let image = FakeImage::new(false);
        let orchestrator = ConversationOrchestrator::new(text.clone(), image.clone());

        let history = History::new();
        let turn = orchestrator
            .respond("write a haiku about rain", &history)
            .await
            .unwrap();

        assert_eq!(turn.input, "");
        assert_eq!(turn.history.len(), 1);
        assert_eq!(
            turn.history.exchanges()[0],
            Exchange::new(
                "write a haiku about rain",
                "B.E.C.R.E.A.T.I.V.E rain taps softly"
            )
        );
        assert_eq!(turn.reply(), "B.E.C.R.E.A.T.I.V.E rain taps softly");
        assert_eq!((turn.image.width(), turn.image.height()), (256, 256));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_respond_builds_prompts_from_reply() {
        let text = FakeText::ok("a dolphin");
        let image = FakeImage::new(false);
        let orchestrator = ConversationOrchestrator::new(text.clone(), image.clone());

        let _ = orchestrator.respond("tell me", &History::new()).await.unwrap();

        let prompts = text.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("respond to this 'tell me'"));

        let requests = image.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].prompt,
            "A a dolphin in a pop art creative style"
        );
        assert_eq!(requests[0].steps, 2);
        assert_eq!(requests[0].n, 1);
    }

    #[tokio::test]
    async fn test_successive_turns_grow_history() {
        let orchestrator = ConversationOrchestrator::new(FakeText::ok("ok"), FakeImage::new(false));

        let mut history = History::new();
        for (n, msg) in ["one", "two", "three"].into_iter().enumerate() {
            history = orchestrator.respond(msg, &history).await.unwrap().history;
            assert_eq!(history.len(), n + 1);
            assert_eq!(history.last().unwrap().user_message(), msg);
        }
    }

    #[tokio::test]
    async fn test_text_failure_skips_image_and_history() {
        let image = FakeImage::new(false);
        let orchestrator = ConversationOrchestrator::new(FakeText::failing(500), image.clone());
        let history = History::new().with_exchange(Exchange::new("earlier", "reply"));

        let err = orchestrator.respond("hello", &history).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Endpoint);
        assert!(image.requests.lock().unwrap().is_empty());
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_image_failure_leaves_history_unchanged() {
        let orchestrator =
            ConversationOrchestrator::new(FakeText::ok("a reply"), FakeImage::new(true));
        let history = History::new().with_exchange(Exchange::new("earlier", "reply"));
        let before = history.clone();

        let err = orchestrator.respond("hello", &history).await.unwrap_err();

        assert!(matches!(err, GenChatError::Api { status: 404, .. }));
        assert_eq!(history, before);
    }

    #[tokio::test]
    async fn test_empty_message_is_accepted() {
        let orchestrator = ConversationOrchestrator::new(FakeText::ok("ok"), FakeImage::new(false));
        let turn = orchestrator.respond("", &History::new()).await.unwrap();
        assert_eq!(turn.history.last().unwrap().user_message(), "");
    }

    #[test]
    fn test_custom_persona() {
        let orchestrator = ConversationOrchestrator::new(FakeText::ok("ok"), FakeImage::new(false))
            .with_persona(Persona::default().with_grounding("dune"));
        assert_eq!(orchestrator.persona().grounding, "dune");
        assert!(format!("{orchestrator:?}").contains("fake-text"));
    }
}
