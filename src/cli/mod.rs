//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches into the chat
//! loop or one of the one-shot subcommands.

pub mod breathe;
pub mod chat;
pub mod persona_list;
pub mod say;
pub mod selfhelp;

use std::error::Error;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::core::config::{self, Config, PRIMARY_API_KEY_VAR, SECONDARY_API_KEY_VAR};
use crate::core::providers::{ChatCompletionProvider, Provider, ProviderChain, TextInferenceProvider};

#[derive(Parser)]
#[command(name = "solace")]
#[command(version)]
#[command(about = "A terminal wellbeing companion")]
#[command(
    long_about = "Solace is a terminal wellbeing companion. It chats through hosted \
language-model backends, trying each configured provider in turn and staying \
conversational even when every backend is unreachable.\n\n\
Credentials (environment only, never stored in config):\n\
  SOLACE_PRIMARY_API_KEY     Key for the chat-completion provider\n\
  SOLACE_SECONDARY_API_KEY   Key for the text-inference provider\n\n\
Configuration:\n\
  Optional TOML file in the platform config directory; persona, model,\n\
  provider URLs, and timeouts can be set there."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Persona voice for replies (friend, older_sister, stoic_bestie)
    #[arg(long, global = true, value_name = "KEY")]
    pub persona: Option<String>,

    /// Append the session transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Per-provider request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Run a guided breathing exercise
    Breathe {
        /// Exercise name or prefix (e.g. "box", "4-7-8")
        name: Option<String>,
        /// List the available exercises
        #[arg(long)]
        list: bool,
    },
    /// Walk through the 5-4-3-2-1 grounding technique
    Ground,
    /// Print a reflective journaling prompt
    Journal {
        /// Print every prompt instead of today's
        #[arg(long)]
        all: bool,
    },
    /// List available personas
    Personas,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr so the conversation on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    match &args.command {
        None | Some(Commands::Chat) => chat::run_chat(&config, &args).await,
        Some(Commands::Say { message }) => say::run_say(&config, &args, message.clone()).await,
        Some(Commands::Breathe { name, list }) => breathe::run_breathe(name.clone(), *list).await,
        Some(Commands::Ground) => selfhelp::run_ground().await,
        Some(Commands::Journal { all }) => {
            selfhelp::run_journal(*all);
            Ok(())
        }
        Some(Commands::Personas) => {
            persona_list::list_personas(&config, &args);
            Ok(())
        }
    }
}

/// Assemble the provider chain from configuration. Providers without a
/// credential are skipped; an empty chain still works, it just always answers
/// with the offline fallback.
pub(crate) fn build_chain(config: &Config, timeout_override: Option<u64>) -> ProviderChain {
    let client = reqwest::Client::new();
    let mut providers: Vec<Box<dyn Provider>> = Vec::new();

    match config::primary_api_key() {
        Some(key) => providers.push(Box::new(ChatCompletionProvider::new(
            client.clone(),
            config.primary_base_url(),
            key,
            config.model(),
        ))),
        None => warn!("{PRIMARY_API_KEY_VAR} not set; skipping the chat-completion provider"),
    }

    match config::secondary_api_key() {
        Some(key) => providers.push(Box::new(TextInferenceProvider::new(
            client,
            config.secondary_url(),
            key,
        ))),
        None => warn!("{SECONDARY_API_KEY_VAR} not set; skipping the text-inference provider"),
    }

    if providers.is_empty() {
        warn!("no provider credentials configured; every reply will use the offline fallback");
    }

    let timeout = timeout_override
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.request_timeout());
    ProviderChain::new(providers, timeout)
}

/// Persona key for this invocation: flag wins over config, config over the
/// built-in default.
pub(crate) fn resolve_persona_key(config: &Config, args: &Args) -> String {
    args.persona
        .clone()
        .unwrap_or_else(|| config.persona().to_string())
}
