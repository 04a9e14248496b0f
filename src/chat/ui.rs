//! Chat mode UI components.

use crate::config::ResolvedConfig;
use crate::ui::{Stream, Style, terminal};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(config: &ResolvedConfig) {
    println!(
        "{} {} - connected to {}",
        Style::header("chatline"),
        Style::version(format!("v{VERSION}")),
        Style::value(&config.endpoint_name)
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &ResolvedConfig) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::value(&config.endpoint_name)
    );
    println!(
        "  {}        {}",
        Style::label("url"),
        Style::secondary(&config.url)
    );
    println!(
        "  {}      {}",
        Style::label("field"),
        Style::value(&config.field)
    );
    println!(
        "  {}      {}",
        Style::label("order"),
        Style::value(config.order)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    println!(
        "  {}  {}",
        Style::command("/config"),
        Style::secondary("Show the current endpoint and settings")
    );
    println!(
        "  {}    {}",
        Style::command("/help"),
        Style::secondary("Show this help")
    );
    println!(
        "  {}    {}",
        Style::command("/quit"),
        Style::secondary("Exit chat mode after outstanding replies arrive")
    );
    println!(
        "  {}       {}",
        Style::command("//"),
        Style::secondary("Send a message starting with '/'")
    );
    println!();
}

fn format_error(message: &str) -> String {
    format!("{} {message}", Style::error("Error:"))
}

/// Prints an error, deferring it while the prompt is open.
pub fn print_error(message: &str) {
    terminal().line(Stream::Stderr, &format_error(message));
}

/// Reports replies that were still outstanding when the session ended.
pub fn print_abandoned(count: usize) {
    let noun = if count == 1 { "reply" } else { "replies" };
    print_error(&format!("Gave up waiting for {count} {noun}"));
}
