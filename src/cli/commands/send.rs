//! One-shot mode: submit a single message and print the reply.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::exchange::{ChatInputHandler, ExchangeOutcome, HttpTransport, Transport};
use crate::input::{InputReader, LineBuffer};
use crate::transcript::MemoryTranscript;
use crate::ui::{Spinner, Style};

pub struct SendOptions {
    /// Message text; stdin is read when absent.
    pub text: Option<String>,
    pub resolve: ResolveOptions,
}

/// Runs the send command and returns the process exit code.
pub async fn run_send(options: SendOptions) -> Result<exitcode::ExitCode> {
    let manager = ConfigManager::new()?;
    let config = resolve_config(&options.resolve, &manager.load_or_default()?)?;
    let text = InputReader::read(options.text.as_deref())?;

    info!(endpoint = %config.endpoint_name, url = %config.url, "Sending one message");

    let transport = Arc::new(HttpTransport::new(config.url.clone(), config.field.clone()));
    Ok(send_once(&text, &config, transport).await)
}

/// Submits `text` through a fresh handler and reports the outcome.
///
/// The reply goes to stdout without a label so it can be piped; failures are
/// reported on stderr.
pub async fn send_once(
    text: &str,
    config: &ResolvedConfig,
    transport: Arc<dyn Transport>,
) -> exitcode::ExitCode {
    let input = Arc::new(LineBuffer::with_value(text));
    let transcript = Arc::new(MemoryTranscript::new());
    let handler = ChatInputHandler::new(input, transcript, transport, config.order);

    let Some(pending) = handler.submit() else {
        eprintln!("{} Message is empty", Style::error("Error:"));
        return exitcode::DATAERR;
    };

    let spinner = Spinner::waiting_for_reply();
    let outcome = pending.wait().await;
    spinner.stop();

    match outcome {
        ExchangeOutcome::Replied(reply) => {
            println!("{reply}");
            exitcode::OK
        }
        ExchangeOutcome::Rejected { status } => {
            eprintln!(
                "{} {} answered with status {status}",
                Style::error("Error:"),
                config.url
            );
            exitcode::UNAVAILABLE
        }
        ExchangeOutcome::Failed(reason) => {
            eprintln!("{} {reason}", Style::error("Error:"));
            exitcode::UNAVAILABLE
        }
    }
}
