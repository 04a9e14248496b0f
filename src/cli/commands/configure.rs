//! Configure command handler for editing default settings.

use anyhow::Result;
use inquire::Select;

use crate::config::{ConfigFile, ConfigManager};
use crate::exchange::ReplyOrder;
use crate::ui::{Style, handle_prompt_cancellation};

const BUILTIN_CHOICE: &str = "(built-in)";

/// Runs the configure command to edit default settings.
///
/// Lets the user pick the default endpoint and the reply order.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let endpoint = select_endpoint(&config)?;
    let order = select_order(config.chatline.order.unwrap_or_default())?;

    config.chatline.endpoint = endpoint;
    config.chatline.order = Some(order);

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}  {}",
        Style::label("endpoint"),
        config
            .chatline
            .endpoint
            .as_deref()
            .map_or_else(|| Style::secondary("(built-in)"), Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("order"),
        Style::value(config.chatline.order.unwrap_or_default())
    );
    println!();
}

/// Options offered for the default endpoint: the built-in one, then every
/// configured name.
fn endpoint_choices(config: &ConfigFile) -> Vec<String> {
    std::iter::once(BUILTIN_CHOICE.to_string())
        .chain(config.endpoints.keys().cloned())
        .collect()
}

fn select_endpoint(config: &ConfigFile) -> Result<Option<String>> {
    let choices = endpoint_choices(config);
    let default_index = config
        .chatline
        .endpoint
        .as_deref()
        .and_then(|d| choices.iter().position(|c| c == d))
        .unwrap_or(0);

    let selection = Select::new("Default endpoint:", choices)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok((selection != BUILTIN_CHOICE).then_some(selection))
}

fn select_order(current: ReplyOrder) -> Result<ReplyOrder> {
    let options = vec![ReplyOrder::Arrival, ReplyOrder::Submission];
    let default_index = options.iter().position(|o| *o == current).unwrap_or(0);

    let selection = Select::new("Show replies in:", options)
        .with_starting_cursor(default_index)
        .with_help_message("arrival: as responses come in, submission: in the order sent")
        .prompt()?;

    Ok(selection)
}
