//! # chatline - Terminal Chat Client
//!
//! `chatline` sends chat messages to an HTTP endpoint as form-encoded POST
//! requests and prints the JSON replies as a running transcript.
//!
//! ## Wire contract
//!
//! - `POST <endpoint>` with `Content-Type: application/x-www-form-urlencoded`
//! - body: `user_input=<percent-encoded message>`
//! - success: HTTP 200 with `{"response": "<reply text>"}`
//! - any other status is a failure and is logged, never retried
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat against http://127.0.0.1:5000/send_message
//! chatline
//!
//! # One message, reply on stdout
//! chatline send "hello"
//! echo "hello" | chatline send --endpoint ingest
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/chatline/config.toml`:
//!
//! ```toml
//! [chatline]
//! endpoint = "local"
//! order = "arrival"
//!
//! [endpoints.local]
//! url = "http://127.0.0.1:5000"
//!
//! [endpoints.ingest]
//! url = "http://127.0.0.1:5001"
//! path = "/add_user_input"
//! ```

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and endpoint settings.
pub mod config;

/// The chat input handler and its HTTP transport.
pub mod exchange;

/// Message input sources.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Transcript entries and views.
pub mod transcript;

/// Terminal UI components (spinner, colors, transcript view).
pub mod ui;
