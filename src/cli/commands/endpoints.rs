//! Endpoint listing command handler.

use anyhow::{Result, bail};

use crate::config::{BUILTIN_ENDPOINT, ConfigFile, ConfigManager, DEFAULT_URL};
use crate::exchange::{DEFAULT_FIELD, DEFAULT_PATH, endpoint_url};
use crate::ui::Style;

/// Prints configured endpoints to stdout.
///
/// With a name, shows the details of that endpoint only.
pub fn print_endpoints(specific: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    for line in render_endpoints(&config, specific)? {
        println!("{line}");
    }
    Ok(())
}

fn render_endpoints(config: &ConfigFile, specific: Option<&str>) -> Result<Vec<String>> {
    let default_endpoint = config.chatline.endpoint.as_deref();
    let marker = |name: &str| {
        if default_endpoint == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    let mut lines = Vec::new();

    if let Some(name) = specific {
        let Some(endpoint) = config.endpoints.get(name) else {
            bail!("Endpoint '{name}' not found");
        };
        lines.push(format!("Endpoint: {}{}", Style::value(name), marker(name)));
        lines.push(format!("  url   = {}", endpoint.url));
        lines.push(format!("  path  = {}", endpoint.path()));
        lines.push(format!("  field = {}", endpoint.field()));
        lines.push(format!(
            "  posts to {}",
            Style::secondary(endpoint.message_url())
        ));
        return Ok(lines);
    }

    if config.endpoints.is_empty() {
        lines.push("No endpoints configured.".to_string());
        lines.push(format!(
            "Using the built-in {} endpoint: {}",
            Style::value(BUILTIN_ENDPOINT),
            Style::secondary(endpoint_url(DEFAULT_URL, DEFAULT_PATH))
        ));
        lines.push("Add endpoints to ~/.config/chatline/config.toml".to_string());
        return Ok(lines);
    }

    lines.push(Style::header("Configured endpoints:"));
    lines.push(String::new());
    for (name, endpoint) in &config.endpoints {
        lines.push(format!("  {}{}", Style::value(name), marker(name)));
        lines.push(format!(
            "    {}",
            Style::secondary(endpoint.message_url())
        ));
        if endpoint.field() != DEFAULT_FIELD {
            lines.push(format!("    field: {}", endpoint.field()));
        }
    }

    Ok(lines)
}
