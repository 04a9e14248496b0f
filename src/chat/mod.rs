//! Interactive chat mode.
//!
//! Provides a REPL-style interface with slash commands on top of the chat
//! input handler.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::ChatSession;
