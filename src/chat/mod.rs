//! Conversation orchestration: persona prompt, reply, illustration.

mod history;
mod orchestrator;
mod persona;

pub use history::{Exchange, History};
pub use orchestrator::{ChatTurn, ConversationOrchestrator};
pub use persona::Persona;
