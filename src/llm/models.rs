use serde::{Deserialize, Serialize};

/// One turn of history in the daemon's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// A model as reported by the daemon's tag listing. `name` is the
/// canonical, possibly-tagged identifier ("llama3.2:3b", "mistral:latest").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub modified_at: Option<String>,
}
