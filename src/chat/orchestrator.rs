use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, warn};
use uuid::Uuid;

use crate::catalog::SharedModelCatalog;
use crate::chat::store::SharedConversationStore;
use crate::chat::{ChatError, Role};
use crate::llm::{LlmError, LlmProvider};
use crate::tokens::{FitCheck, TokenEstimator};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnRequest {
    pub conversation_id: Option<Uuid>,
    pub message: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnTokenInfo {
    /// Pre-flight character-based estimate of the user message.
    pub prompt: FitCheck,
    /// Word-based estimate of the generated response.
    pub response_tokens: u32,
    /// Running total for the conversation after this turn.
    pub conversation_tokens: u32,
    /// Messages evicted by context trimming during this turn.
    pub trimmed_messages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurnResponse {
    pub response: String,
    pub token_info: TurnTokenInfo,
    pub model: String,
    pub conversation_id: Uuid,
    pub message_id: Uuid,
    pub response_time: f64,
    pub word_count: usize,
}

/// Glues a single user turn end-to-end: resolve the conversation, append
/// the user message, keep the history under budget, call the daemon,
/// record the response.
#[derive(Clone)]
pub struct ChatOrchestrator {
    store: SharedConversationStore,
    catalog: SharedModelCatalog,
    provider: Arc<dyn LlmProvider>,
    estimator: TokenEstimator,
    default_max_tokens: u32,
    timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(
        store: SharedConversationStore,
        catalog: SharedModelCatalog,
        provider: Arc<dyn LlmProvider>,
        default_max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            provider,
            estimator: TokenEstimator::new(),
            default_max_tokens,
            timeout,
        }
    }

    pub async fn submit(&self, request: ChatTurnRequest) -> Result<ChatTurnResponse, ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::Validation("message must not be empty".to_string()));
        }

        let model_id = {
            let catalog = self.catalog.lock().unwrap();
            let model_id = request
                .model
                .clone()
                .unwrap_or_else(|| catalog.default_model().to_string());
            if catalog.by_id(&model_id).is_none() {
                return Err(ChatError::ModelNotFound(model_id));
            }
            model_id
        };

        // Reject a message that cannot fit the model's window on its own,
        // before any conversation mutation.
        let prompt_check = self.estimator.check_fit(&model_id, &request.message);
        if !prompt_check.fits {
            return Err(ChatError::Validation(format!(
                "Prompt exceeds token limit: {} > {}",
                prompt_check.estimated_tokens, prompt_check.context_limit
            )));
        }

        // Append the user message and project the history under one guard,
        // then release it for the duration of the network call.
        let (conversation_id, user_message_id, trimmed, history) = {
            let mut store = self.store.lock().unwrap();

            let conversation_id = match request.conversation_id {
                Some(id) => {
                    if store.get(id).is_none() {
                        return Err(ChatError::ConversationNotFound(id));
                    }
                    id
                }
                None => store.create(&model_id, None, None, self.default_max_tokens),
            };

            let user_message =
                store.add_message(conversation_id, Role::User, &request.message, None, None)?;

            let over_budget = store
                .get(conversation_id)
                .map(|c| c.total_tokens as f64 > c.max_tokens as f64 * 0.8)
                .unwrap_or(false);

            let trimmed = if over_budget {
                store.trim(conversation_id, None)?
            } else {
                0
            };

            let history = store.for_model(conversation_id)?;
            (conversation_id, user_message.id, trimmed, history)
        };

        let start = Instant::now();
        let result = if history.len() == 1 {
            self.provider
                .generate(&model_id, &history[0].content, self.timeout)
                .await
        } else {
            match self
                .provider
                .chat(&model_id, &history, self.timeout)
                .await
            {
                Err(LlmError::Unsupported) => {
                    // Degraded context: the daemon only does single-prompt
                    // completion, so it sees the latest user message alone.
                    warn!(
                        model = %model_id,
                        "chat endpoint unsupported, falling back to single-prompt generation"
                    );
                    self.provider
                        .generate(&model_id, &request.message, self.timeout)
                        .await
                }
                other => other,
            }
        };

        let response_text = match result {
            Ok(text) => text,
            Err(e) => {
                // The user message stays recorded; failed turns are never
                // silently dropped.
                error!(conversation = %conversation_id, "generation failed: {}", e);
                return Err(e.into());
            }
        };
        let response_time = start.elapsed().as_secs_f64();

        let user_tokens = self.estimator.estimate_from_words(&request.message);
        let response_tokens = self.estimator.estimate_from_words(&response_text);
        let word_count = response_text.split_whitespace().count();

        let (assistant_message_id, conversation_tokens) = {
            let mut store = self.store.lock().unwrap();
            store.fill_token_count(conversation_id, user_message_id, user_tokens)?;
            let assistant_message = store.add_message(
                conversation_id,
                Role::Assistant,
                &response_text,
                Some(response_tokens),
                None,
            )?;
            let total = store
                .get(conversation_id)
                .map(|c| c.total_tokens)
                .unwrap_or(0);
            (assistant_message.id, total)
        };

        Ok(ChatTurnResponse {
            response: response_text,
            token_info: TurnTokenInfo {
                prompt: prompt_check,
                response_tokens,
                conversation_tokens,
                trimmed_messages: trimmed,
            },
            model: model_id,
            conversation_id,
            message_id: assistant_message_id,
            response_time,
            word_count,
        })
    }
}
