pub mod models;
pub mod orchestrator;
pub mod store;

pub use models::{ChatMessage, Conversation, ConversationSummary, Role};
pub use orchestrator::{ChatOrchestrator, ChatTurnRequest, ChatTurnResponse};
pub use store::{ConversationStore, SharedConversationStore};

use thiserror::Error;
use uuid::Uuid;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Conversation {0} not found")]
    ConversationNotFound(Uuid),
    #[error("Model '{0}' not found in catalog")]
    ModelNotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Generation failed: {0}")]
    Upstream(#[from] LlmError),
}
