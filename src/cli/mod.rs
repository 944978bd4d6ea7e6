pub mod commands;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::catalog::{ModelCatalog, SharedModelCatalog};
use crate::chat::{
    ChatOrchestrator, ChatTurnRequest, Conversation, ConversationStore, SharedConversationStore,
};
use crate::cli::commands::{Commands, ModelsAction};
use crate::config::AppConfig;
use crate::llm::{ollama::OllamaClient, LlmProvider};

pub async fn run_cli(command: Commands, config_path: String) {
    let config = AppConfig::load(&config_path).expect("Failed to load config");

    match command {
        Commands::Serve => {
            panic!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Models { action } => run_models(action, &config),
        Commands::Chat { model, load } => run_repl(model, load, config).await,
    }
}

fn run_models(action: ModelsAction, config: &AppConfig) {
    let mut catalog = ModelCatalog::load(&config.catalog.path);

    match action {
        ModelsAction::List { sort } => {
            let models = catalog.list_enabled(sort.map(Into::into));
            if models.is_empty() {
                println!("No enabled models in catalog.");
                return;
            }

            let default_model = catalog.default_model().to_string();
            println!("{:<20} | {:>8} | {:>8} | {}", "ID", "Priority", "Context", "Name");
            println!("{:-<20}-+-{:-<8}-+-{:-<8}-+-{:-<20}", "", "", "", "");
            for m in models {
                let marker = if m.id == default_model { " (default)" } else { "" };
                println!(
                    "{:<20} | {:>8} | {:>8} | {}{}",
                    m.id, m.priority, m.context_window, m.name, marker
                );
            }
        }
        ModelsAction::Enable { id } => match catalog.enable(&id) {
            Ok(_) => println!("Enabled {}", id),
            Err(e) => eprintln!("Error: {}", e),
        },
        ModelsAction::Disable { id } => match catalog.disable(&id) {
            Ok(_) => println!("Disabled {}", id),
            Err(e) => eprintln!("Error: {}", e),
        },
        ModelsAction::SetDefault { id } => match catalog.set_default(&id) {
            Ok(_) => println!("Default model set to {}", id),
            Err(e) => eprintln!("Error: {}", e),
        },
    }
}

async fn run_repl(model: Option<String>, load: Option<String>, config: AppConfig) {
    let catalog: SharedModelCatalog =
        Arc::new(Mutex::new(ModelCatalog::load(&config.catalog.path)));
    let store: SharedConversationStore =
        Arc::new(Mutex::new(match config.chat.system_prompt.clone() {
            Some(prompt) => ConversationStore::with_system_prompt(prompt),
            None => ConversationStore::new(),
        }));
    let provider: Arc<dyn LlmProvider> = Arc::new(OllamaClient::from_config(&config.ollama));

    if !provider.is_running().await {
        eprintln!(
            "Ollama daemon unreachable at {}. Start it and retry.",
            config.ollama.base_url
        );
        return;
    }

    let orchestrator = ChatOrchestrator::new(
        store.clone(),
        catalog,
        provider,
        config.chat.max_tokens,
        Duration::from_secs(config.ollama.timeout_secs),
    );

    let mut conversation_id: Option<Uuid> = None;

    if let Some(path) = load {
        let raw = std::fs::read_to_string(&path).expect("Failed to read snapshot file");
        let snapshot: Conversation =
            serde_json::from_str(&raw).expect("Invalid conversation snapshot");
        let id = store.lock().unwrap().import(snapshot);
        conversation_id = Some(id);
        println!("Loaded conversation {}", id);
    }

    println!("--- Ollie Terminal Chat ---");
    println!("Type /save <path> to snapshot the conversation, /exit to quit.");
    println!("---------------------------");

    loop {
        print!("\nUser> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        let text = input.trim();

        if text.is_empty() {
            continue;
        }
        if text == "/exit" || text == "/quit" {
            break;
        }

        if let Some(path) = text.strip_prefix("/save ") {
            match conversation_id {
                Some(id) => {
                    let snapshot = store.lock().unwrap().export(id).expect("conversation exists");
                    match serde_json::to_string_pretty(&snapshot)
                        .map_err(io::Error::other)
                        .and_then(|json| std::fs::write(path.trim(), json))
                    {
                        Ok(_) => println!("Saved conversation to {}", path.trim()),
                        Err(e) => eprintln!("Failed to save: {}", e),
                    }
                }
                None => eprintln!("Nothing to save yet."),
            }
            continue;
        }

        let request = ChatTurnRequest {
            conversation_id,
            message: text.to_string(),
            model: model.clone(),
        };

        match orchestrator.submit(request).await {
            Ok(turn) => {
                conversation_id = Some(turn.conversation_id);
                println!("Ollie> {}", turn.response.trim());
                println!(
                    "[{} tokens in conversation, {:.1}s]",
                    turn.token_info.conversation_tokens, turn.response_time
                );
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
