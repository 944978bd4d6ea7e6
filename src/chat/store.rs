use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::chat::models::{ChatMessage, Conversation, ConversationSummary, Role};
use crate::chat::ChatError;
use crate::llm::models::Message as LlmMessage;

pub type SharedConversationStore = Arc<Mutex<ConversationStore>>;

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant running locally on the user's device. You are \
knowledgeable, friendly, and concise. You can help with a wide variety of tasks \
including:
- Answering questions and providing information
- Writing and creative tasks
- Analysis and reasoning
- Coding and technical help
- General conversation

Respond naturally and be helpful while being mindful of context length.";

/// In-memory registry of conversation threads. Constructed once at process
/// start and shared behind a single mutex; conversations live for the
/// process lifetime unless explicitly deleted.
pub struct ConversationStore {
    conversations: HashMap<Uuid, Conversation>,
    default_system_prompt: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: HashMap::new(),
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            conversations: HashMap::new(),
            default_system_prompt: prompt.into(),
        }
    }

    /// Create a new conversation and return its id. An empty or missing
    /// system prompt is replaced by the store's default persona, which is
    /// materialized as the conversation's first message.
    pub fn create(
        &mut self,
        model_id: &str,
        title: Option<String>,
        system_prompt: Option<String>,
        max_tokens: u32,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let title =
            title.unwrap_or_else(|| format!("Chat {}", now.format("%Y-%m-%d %H:%M")));

        let system_prompt = system_prompt
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.default_system_prompt.clone());

        let mut conversation = Conversation {
            id,
            title,
            model_id: model_id.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            total_tokens: 0,
            max_tokens,
            system_prompt: Some(system_prompt.clone()),
        };

        if !system_prompt.is_empty() {
            conversation.messages.push(ChatMessage {
                id: Uuid::new_v4(),
                role: Role::System,
                content: system_prompt,
                created_at: now,
                token_count: None,
                metadata: None,
            });
        }

        self.conversations.insert(id, conversation);
        id
    }

    pub fn add_message(
        &mut self,
        conversation_id: Uuid,
        role: Role,
        content: &str,
        token_count: Option<u32>,
        metadata: Option<serde_json::Value>,
    ) -> Result<ChatMessage, ChatError> {
        let conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        let message = ChatMessage {
            id: Uuid::new_v4(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            token_count,
            metadata,
        };

        conversation.messages.push(message.clone());
        conversation.updated_at = Utc::now();

        if let Some(tokens) = token_count {
            conversation.total_tokens += tokens;
        }

        Ok(message)
    }

    /// Back-fill a message's token count once a real estimate exists, and
    /// recompute the conversation total from all known counts.
    pub fn fill_token_count(
        &mut self,
        conversation_id: Uuid,
        message_id: Uuid,
        token_count: u32,
    ) -> Result<(), ChatError> {
        let conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        let message = conversation
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| {
                ChatError::Validation(format!(
                    "message {} not found in conversation {}",
                    message_id, conversation_id
                ))
            })?;

        message.token_count = Some(token_count);
        conversation.total_tokens = conversation
            .messages
            .iter()
            .filter_map(|m| m.token_count)
            .sum();
        conversation.updated_at = Utc::now();

        Ok(())
    }

    /// Trim old messages to fit within token limits. Greedy oldest-first
    /// eviction of non-system messages; the system message and the two most
    /// recent non-system messages are never removed. Returns the number of
    /// messages removed.
    pub fn trim(
        &mut self,
        conversation_id: Uuid,
        target_tokens: Option<u32>,
    ) -> Result<usize, ChatError> {
        let conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        let target =
            target_tokens.unwrap_or((conversation.max_tokens as f64 * 0.75) as u32);

        if conversation.total_tokens <= target {
            return Ok(0);
        }

        let (system_messages, mut other_messages): (Vec<_>, Vec<_>) = conversation
            .messages
            .drain(..)
            .partition(|m| m.role == Role::System);

        let mut current_tokens = conversation.total_tokens;
        let mut trimmed = 0;

        while current_tokens > target && other_messages.len() > 2 {
            let removed = other_messages.remove(0);
            current_tokens = current_tokens.saturating_sub(removed.token_count.unwrap_or(0));
            trimmed += 1;
        }

        conversation.messages = system_messages;
        conversation.messages.extend(other_messages);
        conversation.total_tokens = current_tokens;
        conversation.updated_at = Utc::now();

        Ok(trimmed)
    }

    /// Project the message log into the daemon's wire format, dropping
    /// everything except role and content.
    pub fn for_model(&self, conversation_id: Uuid) -> Result<Vec<LlmMessage>, ChatError> {
        let conversation = self
            .conversations
            .get(&conversation_id)
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        Ok(conversation
            .messages
            .iter()
            .map(|m| LlmMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect())
    }

    pub fn get(&self, conversation_id: Uuid) -> Option<&Conversation> {
        self.conversations.get(&conversation_id)
    }

    pub fn list(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .conversations
            .values()
            .map(|c| ConversationSummary {
                id: c.id,
                title: c.title.clone(),
                model_id: c.model_id.clone(),
                message_count: c.messages.len(),
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect();

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    pub fn delete(&mut self, conversation_id: Uuid) -> Result<(), ChatError> {
        self.conversations
            .remove(&conversation_id)
            .map(|_| ())
            .ok_or(ChatError::ConversationNotFound(conversation_id))
    }

    pub fn rename(&mut self, conversation_id: Uuid, title: &str) -> Result<(), ChatError> {
        let conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(ChatError::ConversationNotFound(conversation_id))?;

        conversation.title = title.to_string();
        conversation.updated_at = Utc::now();
        Ok(())
    }

    /// Full structured snapshot, suitable for JSON serialization.
    pub fn export(&self, conversation_id: Uuid) -> Result<Conversation, ChatError> {
        self.conversations
            .get(&conversation_id)
            .cloned()
            .ok_or(ChatError::ConversationNotFound(conversation_id))
    }

    /// Restore a conversation from a snapshot, preserving its original id.
    /// An existing conversation with the same id is replaced.
    pub fn import(&mut self, conversation: Conversation) -> Uuid {
        let id = conversation.id;
        self.conversations.insert(id, conversation);
        id
    }
}
