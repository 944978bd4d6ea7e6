use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog entry describing one selectable model and its metadata.
/// Uniqueness key is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub size_gb: f64,
    #[serde(default = "default_context_window")]
    pub context_window: u32,
    #[serde(default)]
    pub recommended_use: Vec<String>,
    #[serde(default)]
    pub install_command: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_priority")]
    pub priority: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Priority,
    Name,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_true")]
    pub auto_enable_available: bool,
    #[serde(default)]
    pub show_disabled_models: bool,
    #[serde(default = "default_max_models_shown")]
    pub max_models_shown: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: SortBy,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            auto_enable_available: true,
            show_disabled_models: false,
            max_models_shown: 10,
            sort_by: SortBy::Priority,
        }
    }
}

/// Persisted catalog shape. Round-trips losslessly through load/save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub available_models: Vec<ModelDescriptor>,
    #[serde(default = "default_model_id")]
    pub default_model: String,
    #[serde(default)]
    pub categories: HashMap<String, CategoryInfo>,
    #[serde(default, rename = "config")]
    pub settings: CatalogSettings,
}

impl CatalogFile {
    /// Built-in fallback used when the backing file is missing or malformed.
    pub fn builtin_default() -> Self {
        Self {
            available_models: vec![ModelDescriptor {
                id: "llama3.2:3b".to_string(),
                name: "Llama 3.2 3B".to_string(),
                description: "Fast, efficient model".to_string(),
                category: "general".to_string(),
                size_gb: 2.0,
                context_window: 8192,
                recommended_use: vec!["chat".to_string(), "qa".to_string()],
                install_command: "ollama pull llama3.2:3b".to_string(),
                enabled: true,
                priority: 1,
            }],
            default_model: "llama3.2:3b".to_string(),
            categories: HashMap::from([(
                "general".to_string(),
                CategoryInfo {
                    name: "General Purpose".to_string(),
                    description: "General chat models".to_string(),
                },
            )]),
            settings: CatalogSettings::default(),
        }
    }
}

fn default_category() -> String {
    "general".to_string()
}

fn default_context_window() -> u32 {
    4096
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_max_models_shown() -> u32 {
    10
}

fn default_sort_by() -> SortBy {
    SortBy::Priority
}

fn default_model_id() -> String {
    "llama3.2:3b".to_string()
}
