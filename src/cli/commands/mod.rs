//! Subcommand implementations.

/// Interactive chat handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Endpoint listing command handler.
pub mod endpoints;

/// One-shot send command handler.
pub mod send;
