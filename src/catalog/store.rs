use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

use crate::catalog::models::{CatalogFile, CatalogSettings, CategoryInfo, ModelDescriptor, SortBy};

pub type SharedModelCatalog = Arc<Mutex<ModelCatalog>>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Model '{0}' not found in catalog")]
    NotFound(String),
    #[error("Model '{0}' already exists in catalog")]
    Duplicate(String),
    #[error("Failed to persist catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode catalog: {0}")]
    Serde(#[from] serde_json::Error),
}

/// User-editable model catalog backed by a JSON file. Mutations persist
/// immediately; a missing or malformed file degrades to a built-in default
/// catalog instead of failing the caller.
pub struct ModelCatalog {
    path: PathBuf,
    data: CatalogFile,
}

impl ModelCatalog {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!(
                        "Invalid JSON in catalog file {}: {} — using built-in defaults",
                        path.display(),
                        e
                    );
                    CatalogFile::builtin_default()
                }
            },
            Err(e) => {
                warn!(
                    "Catalog file {} not readable: {} — using built-in defaults",
                    path.display(),
                    e
                );
                CatalogFile::builtin_default()
            }
        };

        Self { path, data }
    }

    pub fn save(&self) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.data)?)?;
        Ok(())
    }

    /// Enabled descriptors, sorted ascending by priority or display name.
    /// Display names compare case-insensitively; identifiers never do.
    pub fn list_enabled(&self, sort_by: Option<SortBy>) -> Vec<ModelDescriptor> {
        let mut models: Vec<ModelDescriptor> = self
            .data
            .available_models
            .iter()
            .filter(|m| m.enabled)
            .cloned()
            .collect();

        match sort_by.unwrap_or(self.data.settings.sort_by) {
            SortBy::Priority => models.sort_by_key(|m| m.priority),
            SortBy::Name => models.sort_by_key(|m| m.name.to_lowercase()),
        }

        models
    }

    pub fn by_id(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.data.available_models.iter().find(|m| m.id == model_id)
    }

    pub fn default_model(&self) -> &str {
        &self.data.default_model
    }

    pub fn set_default(&mut self, model_id: &str) -> Result<(), CatalogError> {
        if self.by_id(model_id).is_none() {
            return Err(CatalogError::NotFound(model_id.to_string()));
        }
        self.data.default_model = model_id.to_string();
        self.save()
    }

    pub fn enable(&mut self, model_id: &str) -> Result<(), CatalogError> {
        self.set_enabled(model_id, true)
    }

    pub fn disable(&mut self, model_id: &str) -> Result<(), CatalogError> {
        self.set_enabled(model_id, false)
    }

    fn set_enabled(&mut self, model_id: &str, enabled: bool) -> Result<(), CatalogError> {
        let model = self
            .data
            .available_models
            .iter_mut()
            .find(|m| m.id == model_id)
            .ok_or_else(|| CatalogError::NotFound(model_id.to_string()))?;
        model.enabled = enabled;
        self.save()
    }

    pub fn add(&mut self, descriptor: ModelDescriptor) -> Result<(), CatalogError> {
        if self.by_id(&descriptor.id).is_some() {
            return Err(CatalogError::Duplicate(descriptor.id));
        }
        self.data.available_models.push(descriptor);
        self.save()
    }

    pub fn remove(&mut self, model_id: &str) -> Result<(), CatalogError> {
        let before = self.data.available_models.len();
        self.data.available_models.retain(|m| m.id != model_id);
        if self.data.available_models.len() == before {
            return Err(CatalogError::NotFound(model_id.to_string()));
        }
        self.save()
    }

    pub fn categories(&self) -> &HashMap<String, CategoryInfo> {
        &self.data.categories
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.data.settings
    }

    /// Reconcile a configured model id against the daemon's reported names.
    /// Model names in the wild are inconsistently tagged, so four spellings
    /// count as a match, checked in order with the first hit winning:
    ///   1. exact equality
    ///   2. the daemon reports the `:latest` variant of the configured id
    ///   3. the daemon reports a more specific tag of the configured id
    ///   4. the configured id is tagged but the daemon only has `:latest`
    /// Identifiers compare case-sensitively.
    pub fn is_available(model_id: &str, daemon_names: &[String]) -> bool {
        let tagged_latest = format!("{model_id}:latest");
        let tag_prefix = format!("{model_id}:");
        let base_latest = model_id
            .split_once(':')
            .map(|(base, _)| format!("{base}:latest"));

        daemon_names.iter().any(|name| {
            if name == model_id {
                return true;
            }
            if *name == tagged_latest {
                return true;
            }
            if name.starts_with(&tag_prefix) {
                return true;
            }
            if let Some(base_latest) = &base_latest {
                if name == base_latest {
                    return true;
                }
            }
            false
        })
    }
}
