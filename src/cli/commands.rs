use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::SortBy;

#[derive(Parser)]
#[command(name = "ollie", version, about = "Ollie Local LLM Chat Server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve,

    /// Enter interactive CLI chat REPL mode
    Chat {
        /// Model id to chat with (defaults to the catalog default)
        #[arg(short, long)]
        model: Option<String>,

        /// Load a previously saved conversation snapshot (JSON)
        #[arg(short, long)]
        load: Option<String>,
    },

    /// Manage the model catalog
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
}

#[derive(Subcommand)]
pub enum ModelsAction {
    /// List enabled models
    List {
        /// Sort order (defaults to the catalog's configured preference)
        #[arg(short, long)]
        sort: Option<SortArg>,
    },

    /// Enable a model
    Enable { id: String },

    /// Disable a model
    Disable { id: String },

    /// Set the default model
    SetDefault { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Priority,
    Name,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Priority => SortBy::Priority,
            SortArg::Name => SortBy::Name,
        }
    }
}
