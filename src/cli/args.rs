use clap::{Parser, Subcommand};

use crate::logging::DEFAULT_LOG_LEVEL;

#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(about = "Terminal chat client for form-encoded chat endpoints")]
#[command(version)]
pub struct Args {
    /// Endpoint name from the config file
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Post to this URL directly instead of a configured endpoint
    #[arg(short = 'u', long, global = true, conflicts_with = "endpoint")]
    pub url: Option<String>,

    /// Show replies in the order messages were sent
    #[arg(long, global = true)]
    pub ordered: bool,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one message and print the reply
    Send {
        /// Message text (reads from stdin if not provided)
        text: Option<String>,
    },
    /// List configured endpoints
    Endpoints {
        /// Show details for a specific endpoint
        name: Option<String>,
    },
    /// Choose the default endpoint and reply order
    Configure,
}
