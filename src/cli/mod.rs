//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod sessions;
pub mod settings;


use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::model_list::{list_models, ping};
use crate::cli::sessions::{export_saved_session, print_sessions};
use crate::cli::settings::{set_setting, unset_setting};
use crate::core::app::{App, SessionContext};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::store::SessionStore;
use crate::ui::chat_loop::run_chat;
use crate::ui::terminal::TerminalPresenter;
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "chatdesk", version, long_version = LONG_VERSION)]
#[command(about = "Chat with models on a local LLM server")]
#[command(
    long_about = "Chatdesk is a terminal chat client for a local LLM server speaking the Ollama API. \
Conversations are saved between runs, and files or images can be attached to a message.\n\n\
Configuration:\n\
  Use 'chatdesk set <key> <value>' to change defaults and 'chatdesk config' to review them.\n\n\
In-chat commands:\n\
  /help             List every slash command\n\
  /new, /list       Start a chat, list saved chats\n\
  /attach <file>    Attach a text file to the next message\n\
  /image <file>     Attach an image to the next message\n\
  /export [file]    Write the current chat to a text file\n\
  /quit             Leave\n\n\
Logging:\n\
  Set CHATDESK_LOG (e.g. CHATDESK_LOG=debug) to control log verbosity."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this run
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature for this run (0.0 - 2.0)
    #[arg(short = 't', long, global = true, value_name = "VALUE")]
    pub temperature: Option<f64>,

    /// Server URL for this run (e.g. http://localhost:11434)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read and write saved chats at this path instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub sessions_file: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List saved chats
    Sessions,
    /// Export a saved chat to a text file
    Export {
        /// Chat id, or its number in `chatdesk sessions`
        session: String,
        /// Output file (defaults to a name derived from the chat)
        file: Option<PathBuf>,
        /// Replace the output file if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Check whether the server is reachable
    Ping,
    /// List models installed on the server
    Models,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the effective configuration
    Config,
}

/// Fold per-run flags over the saved configuration. Nothing here is written
/// back to disk.
pub fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(model) = &args.model {
        config.model = Some(model.clone());
    }
    if let Some(temperature) = args.temperature {
        config.temperature = Some(temperature);
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(path) = &args.sessions_file {
        config.sessions_file = Some(path.clone());
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main(args));
    // A pending stdin read would otherwise hold the process open.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = Config::get_config_path();
    let mut config = Config::load_from_path(&config_path)?;
    apply_overrides(&mut config, &args);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let session = SessionContext::from_config(&config)?;
            let store = SessionStore::new(config.effective_sessions_file());
            info!(
                model = %session.model,
                base_url = %session.base_url,
                sessions = %store.path().display(),
                "starting chat"
            );
            let presenter = TerminalPresenter::new(std::io::stdout());
            let app = App::new(session, store, Box::new(presenter));
            run_chat(app).await
        }
        Commands::Sessions => {
            print_sessions(&config.effective_sessions_file());
            Ok(())
        }
        Commands::Export {
            session,
            file,
            force,
        } => {
            let path =
                export_saved_session(&config.effective_sessions_file(), &session, file, force)?;
            println!("✅ Exported to {}", path.display());
            Ok(())
        }
        Commands::Ping => {
            if !ping(&config).await {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Models => list_models(&config).await,
        Commands::Set { key, value } => {
            let value = value.unwrap_or_default();
            match set_setting(&config_path, &key, &value) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            match unset_setting(&config_path, &key) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Config => {
            println!("📄 {}", path_display(&config_path));
            config.print_all();
            Ok(())
        }
    }
}
