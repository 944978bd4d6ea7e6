use actix_web::{delete, get, post, put, web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{ApiError, Result};
use crate::api::models::{
    CreateConversationRequest, CreateConversationResponse, HealthResponse,
    RenameConversationRequest,
};
use crate::chat::{ChatOrchestrator, ChatTurnRequest, Conversation, SharedConversationStore};
use crate::catalog::SharedModelCatalog;
use crate::config::AppConfig;
use crate::llm::LlmProvider;

#[get("/health")]
pub async fn health(llm: web::Data<Arc<dyn LlmProvider>>) -> Result<HttpResponse> {
    let ollama_running = llm.is_running().await;

    let available_models: Vec<String> = if ollama_running {
        llm.list_models()
            .await
            .map(|models| models.into_iter().map(|m| m.name).collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: if ollama_running {
            "healthy".to_string()
        } else {
            "ollama_offline".to_string()
        },
        ollama_running,
        available_models,
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[post("/chat")]
pub async fn chat(
    orchestrator: web::Data<ChatOrchestrator>,
    req: web::Json<ChatTurnRequest>,
) -> Result<HttpResponse> {
    let response = orchestrator.submit(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// --- Conversations ---

#[post("")]
pub async fn create_conversation(
    store: web::Data<SharedConversationStore>,
    catalog: web::Data<SharedModelCatalog>,
    config: web::Data<AppConfig>,
    req: web::Json<CreateConversationRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    let model_id = {
        let catalog = catalog.lock().unwrap();
        let model_id = req
            .model
            .unwrap_or_else(|| catalog.default_model().to_string());
        if catalog.by_id(&model_id).is_none() {
            return Err(ApiError::NotFound(format!(
                "Model '{}' not found in catalog",
                model_id
            )));
        }
        model_id
    };

    let mut store = store.lock().unwrap();
    let id = store.create(
        &model_id,
        req.title,
        req.system_prompt,
        req.max_tokens.unwrap_or(config.chat.max_tokens),
    );

    Ok(HttpResponse::Created().json(CreateConversationResponse { id }))
}

#[get("")]
pub async fn list_conversations(store: web::Data<SharedConversationStore>) -> Result<HttpResponse> {
    let store = store.lock().unwrap();
    Ok(HttpResponse::Ok().json(store.list()))
}

#[get("/{id}")]
pub async fn get_conversation(
    store: web::Data<SharedConversationStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let store = store.lock().unwrap();

    match store.get(id) {
        Some(conversation) => Ok(HttpResponse::Ok().json(conversation)),
        None => Err(ApiError::NotFound(format!("Conversation {} not found", id))),
    }
}

#[delete("/{id}")]
pub async fn delete_conversation(
    store: web::Data<SharedConversationStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let mut store = store.lock().unwrap();
    store.delete(id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[put("/{id}/title")]
pub async fn rename_conversation(
    store: web::Data<SharedConversationStore>,
    id: web::Path<Uuid>,
    req: web::Json<RenameConversationRequest>,
) -> Result<HttpResponse> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }

    let mut store = store.lock().unwrap();
    store.rename(id.into_inner(), &req.title)?;
    Ok(HttpResponse::Ok().finish())
}

#[get("/{id}/export")]
pub async fn export_conversation(
    store: web::Data<SharedConversationStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let store = store.lock().unwrap();
    let snapshot = store.export(id.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/import")]
pub async fn import_conversation(
    store: web::Data<SharedConversationStore>,
    snapshot: web::Json<Conversation>,
) -> Result<HttpResponse> {
    let mut store = store.lock().unwrap();
    let id = store.import(snapshot.into_inner());
    Ok(HttpResponse::Created().json(CreateConversationResponse { id }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(chat).service(
        web::scope("/conversations")
            .service(create_conversation)
            .service(list_conversations)
            .service(import_conversation)
            .service(get_conversation)
            .service(delete_conversation)
            .service(rename_conversation)
            .service(export_conversation),
    );
}
