use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

use ollie::catalog::{ModelCatalog, SharedModelCatalog};
use ollie::chat::{ChatOrchestrator, ConversationStore, SharedConversationStore};
use ollie::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use ollie::config::AppConfig;
use ollie::llm::{ollama::OllamaClient, LlmProvider};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting Ollie chat server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog: SharedModelCatalog =
        Arc::new(Mutex::new(ModelCatalog::load(&config.catalog.path)));

    let store: SharedConversationStore =
        Arc::new(Mutex::new(match config.chat.system_prompt.clone() {
            Some(prompt) => ConversationStore::with_system_prompt(prompt),
            None => ConversationStore::new(),
        }));

    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaClient::from_config(&config.ollama));

    // One explicit availability check at startup; failures after this
    // surface per-request instead of degrading into a canned demo mode.
    if provider.is_running().await {
        match provider.list_models().await {
            Ok(models) => info!("Ollama daemon reachable, {} models installed", models.len()),
            Err(e) => warn!("Ollama daemon reachable but model listing failed: {}", e),
        }
    } else {
        warn!(
            "Ollama daemon unreachable at {} — chat requests will fail until it is started",
            config.ollama.base_url
        );
    }

    let orchestrator = ChatOrchestrator::new(
        store.clone(),
        catalog.clone(),
        provider.clone(),
        config.chat.max_tokens,
        Duration::from_secs(config.ollama.timeout_secs),
    );

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(provider.clone()))
            .app_data(web::Data::new(orchestrator.clone()))
            .configure(ollie::api::routes::configure)
            .configure(ollie::api::routes_models::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
