use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/config", "Show the current endpoint and settings"),
    ("/help", "Show available commands"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Config,
    Help,
    Quit,
    Unknown(String),
}

/// A line read from the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// Message text, exactly as typed. Blank text is left to the handler.
    Text(String),
    Command(SlashCommand),
}

/// Splits slash commands from message text.
///
/// A leading `//` escapes the slash, so `//shrug` sends `/shrug`.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim_start();

    if let Some(escaped) = trimmed.strip_prefix("//") {
        return Input::Text(format!("/{escaped}"));
    }

    trimmed.strip_prefix('/').map_or_else(
        || Input::Text(line.to_string()),
        |cmd| Input::Command(parse_slash_command(cmd)),
    )
}

fn parse_slash_command(cmd: &str) -> SlashCommand {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    match parts.first().copied() {
        Some("config") => SlashCommand::Config,
        Some("help") => SlashCommand::Help,
        Some("quit" | "exit" | "q") => SlashCommand::Quit,
        _ => SlashCommand::Unknown(parts.join(" ")),
    }
}
