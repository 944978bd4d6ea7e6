use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ModelDescriptor, SortBy};

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub model: Option<String>,
    pub title: Option<String>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RenameConversationRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDefaultModelRequest {
    pub model_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    pub sort: Option<SortBy>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama_running: bool,
    pub available_models: Vec<String>,
    pub api_version: String,
}

/// A catalog descriptor joined with its daemon availability.
#[derive(Debug, Serialize)]
pub struct ModelEntry {
    #[serde(flatten)]
    pub descriptor: ModelDescriptor,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelEntry>,
    pub default_model: String,
}
