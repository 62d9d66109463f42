//! Chatdesk is a chat client for a locally hosted LLM server (Ollama API).
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns saved sessions, attachments, request composition, and the
//!   single-flight request orchestrator.
//! - [`ui`] renders transcripts to the terminal and runs the interactive loop
//!   that drives user input and display updates.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the chat and model-listing payloads exchanged with the
//!   server, plus the liveness probe.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes and dispatches into
//! [`core::app`] and [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
