//! Solace is a terminal wellbeing companion that chats through hosted LLM
//! backends and degrades gracefully when a backend is unreachable.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the response pipeline: persona resolution, prompt
//!   construction, emotion tagging, the provider fallback chain, the chat
//!   session transcript, and the guided-exercise timer.
//! - [`cli`] parses command-line arguments and runs the interactive chat
//!   loop and the one-shot subcommands.
//! - [`api`] defines the wire payloads exchanged with the remote
//!   text-generation providers.
//! - [`utils`] holds small shared helpers (URL normalization, transcript
//!   logging).
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
