use anyhow::{Context, Result};
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Text};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::config::ResolvedConfig;
use crate::exchange::{ChatInputHandler, ExchangeOutcome, Transport};
use crate::input::{InputField, LineBuffer};
use crate::ui::{OutputGate, TerminalTranscript, is_prompt_cancelled, terminal};

/// How long leaving the session waits for replies still in flight.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// An interactive chat session.
///
/// The prompt feeds a shared input field. Replies that arrive while the
/// next line is being typed are held back and printed once it is entered.
pub struct ChatSession {
    config: ResolvedConfig,
    input: Arc<LineBuffer>,
    handler: ChatInputHandler,
    gate: &'static OutputGate,
    outstanding: Mutex<Vec<JoinHandle<()>>>,
    drain_timeout: Duration,
}

impl ChatSession {
    pub fn new(config: ResolvedConfig, transport: Arc<dyn Transport>) -> Self {
        Self::with_gate(config, transport, terminal())
    }

    /// A session whose transcript writes through `gate`.
    pub fn with_gate(
        config: ResolvedConfig,
        transport: Arc<dyn Transport>,
        gate: &'static OutputGate,
    ) -> Self {
        let input = Arc::new(LineBuffer::new());
        let transcript = Arc::new(TerminalTranscript::with_gate(config.labels.clone(), gate));
        let handler = ChatInputHandler::new(input.clone(), transcript, transport, config.order);
        Self {
            config,
            input,
            handler,
            gate,
            outstanding: Mutex::new(Vec::new()),
            drain_timeout: DRAIN_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub async fn run(&self) -> Result<()> {
        ui::print_header(&self.config);

        loop {
            match self.prompt_with(read_line).await? {
                Ok(line) => match parse_input(&line) {
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    Input::Text(text) => self.send(&text),
                },
                Err(e) if is_prompt_cancelled(&e) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let abandoned = self.finish_outstanding().await;
        if abandoned > 0 {
            ui::print_abandoned(abandoned);
        }

        ui::print_goodbye();
        Ok(())
    }

    /// Runs `read` with the terminal handed over to it.
    ///
    /// The prompt blocks, so it runs off the runtime thread to let
    /// outstanding exchanges finish while the user types. Their output is
    /// held until the prompt returns.
    async fn prompt_with<F>(&self, read: F) -> Result<Result<String, InquireError>>
    where
        F: FnOnce() -> Result<String, InquireError> + Send + 'static,
    {
        self.gate.hold();
        let line = tokio::task::spawn_blocking(read).await;
        self.gate.release();
        line.context("Prompt task failed")
    }

    fn handle_command(&self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => {
                ui::print_config(&self.config);
                true
            }
            SlashCommand::Help => {
                ui::print_help();
                true
            }
            SlashCommand::Quit => false,
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
                true
            }
        }
    }

    fn send(&self, text: &str) {
        self.input.set_value(text);

        let Some(pending) = self.handler.submit() else {
            return;
        };

        let watcher = tokio::spawn(async move {
            if let ExchangeOutcome::Failed(reason) = pending.wait().await {
                ui::print_error(&reason);
            }
        });

        let mut outstanding = self.outstanding();
        outstanding.retain(|handle| !handle.is_finished());
        outstanding.push(watcher);
    }

    /// Waits up to the drain timeout for replies still in flight.
    ///
    /// Returns how many were given up on.
    async fn finish_outstanding(&self) -> usize {
        let mut remaining: Vec<_> = std::mem::take(&mut *self.outstanding())
            .into_iter()
            .filter(|handle| !handle.is_finished())
            .collect();
        if remaining.is_empty() {
            return 0;
        }

        let all_settled = async {
            for handle in &mut remaining {
                let _ = handle.await;
            }
        };
        let timed_out = tokio::time::timeout(self.drain_timeout, all_settled)
            .await
            .is_err();

        if timed_out {
            remaining.iter().filter(|handle| !handle.is_finished()).count()
        } else {
            0
        }
    }

    fn outstanding(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.outstanding.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_line() -> Result<String, InquireError> {
    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    // Non-highlighted suggestions: gray
    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    // Highlighted suggestion: purple
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

    Text::new("")
        .with_render_config(render_config)
        .with_autocomplete(SlashCommandCompleter)
        .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
        .prompt()
}
