use actix_web::{delete, get, post, put, web, HttpResponse};
use std::sync::Arc;

use crate::api::error::{ApiError, Result};
use crate::api::models::{ModelEntry, ModelListResponse, ModelsQuery, SetDefaultModelRequest};
use crate::catalog::{ModelCatalog, ModelDescriptor, SharedModelCatalog};
use crate::llm::LlmProvider;

#[get("")]
pub async fn list_models(
    catalog: web::Data<SharedModelCatalog>,
    llm: web::Data<Arc<dyn LlmProvider>>,
    query: web::Query<ModelsQuery>,
) -> Result<HttpResponse> {
    // Daemon names are fetched once per request; an unreachable daemon
    // simply marks every model unavailable.
    let daemon_names: Vec<String> = llm
        .list_models()
        .await
        .map(|models| models.into_iter().map(|m| m.name).collect())
        .unwrap_or_default();

    let catalog = catalog.lock().unwrap();
    let models = catalog
        .list_enabled(query.sort)
        .into_iter()
        .map(|descriptor| ModelEntry {
            available: ModelCatalog::is_available(&descriptor.id, &daemon_names),
            descriptor,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ModelListResponse {
        models,
        default_model: catalog.default_model().to_string(),
    }))
}

#[get("/categories")]
pub async fn list_categories(catalog: web::Data<SharedModelCatalog>) -> Result<HttpResponse> {
    let catalog = catalog.lock().unwrap();
    Ok(HttpResponse::Ok().json(catalog.categories()))
}

#[put("/default")]
pub async fn set_default_model(
    catalog: web::Data<SharedModelCatalog>,
    req: web::Json<SetDefaultModelRequest>,
) -> Result<HttpResponse> {
    if req.model_id.is_empty() {
        return Err(ApiError::Validation("model_id must not be empty".to_string()));
    }

    let mut catalog = catalog.lock().unwrap();
    catalog.set_default(&req.model_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[get("/{id}")]
pub async fn get_model(
    catalog: web::Data<SharedModelCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = id.into_inner();
    let catalog = catalog.lock().unwrap();

    match catalog.by_id(&id) {
        Some(descriptor) => Ok(HttpResponse::Ok().json(descriptor)),
        None => Err(ApiError::NotFound(format!(
            "Model '{}' not found in catalog",
            id
        ))),
    }
}

#[post("")]
pub async fn add_model(
    catalog: web::Data<SharedModelCatalog>,
    descriptor: web::Json<ModelDescriptor>,
) -> Result<HttpResponse> {
    let descriptor = descriptor.into_inner();
    if descriptor.id.is_empty() {
        return Err(ApiError::Validation("model id must not be empty".to_string()));
    }

    let mut catalog = catalog.lock().unwrap();
    catalog.add(descriptor)?;
    Ok(HttpResponse::Created().finish())
}

#[delete("/{id}")]
pub async fn remove_model(
    catalog: web::Data<SharedModelCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let mut catalog = catalog.lock().unwrap();
    catalog.remove(&id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/{id}/enable")]
pub async fn enable_model(
    catalog: web::Data<SharedModelCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let mut catalog = catalog.lock().unwrap();
    catalog.enable(&id.into_inner())?;
    Ok(HttpResponse::Ok().finish())
}

#[post("/{id}/disable")]
pub async fn disable_model(
    catalog: web::Data<SharedModelCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let mut catalog = catalog.lock().unwrap();
    catalog.disable(&id.into_inner())?;
    Ok(HttpResponse::Ok().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/models")
            .service(list_models)
            .service(list_categories)
            .service(set_default_model)
            .service(add_model)
            .service(enable_model)
            .service(disable_model)
            .service(get_model)
            .service(remove_model),
    );
}
