use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::exchange::{DEFAULT_FIELD, DEFAULT_PATH, ReplyOrder, endpoint_url};
use crate::paths;
use crate::transcript::Labels;

/// Base URL used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

/// Name reported for the built-in endpoint.
pub const BUILTIN_ENDPOINT: &str = "default";

/// Default settings in the `[chatline]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatlineConfig {
    /// Default endpoint name.
    pub endpoint: Option<String>,
    /// When replies are appended to the transcript.
    pub order: Option<ReplyOrder>,
    /// Label shown before user messages.
    pub user_label: Option<String>,
    /// Label shown before bot replies.
    pub bot_label: Option<String>,
}

/// A named chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the server, e.g. `http://127.0.0.1:5000`.
    pub url: String,
    /// Path messages are posted to.
    #[serde(default)]
    pub path: Option<String>,
    /// Form field name carrying the message.
    #[serde(default)]
    pub field: Option<String>,
}

impl EndpointConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_PATH)
    }

    pub fn field(&self) -> &str {
        self.field.as_deref().unwrap_or(DEFAULT_FIELD)
    }

    /// The full URL messages are posted to.
    pub fn message_url(&self) -> String {
        endpoint_url(&self.url, self.path())
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/chatline/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub chatline: ChatlineConfig,
    /// Endpoint configurations keyed by name.
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointConfig>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// The selected endpoint name (`"url"` when given directly).
    pub endpoint_name: String,
    /// Full URL messages are posted to.
    pub url: String,
    /// Form field name carrying the message.
    pub field: String,
    pub order: ReplyOrder,
    pub labels: Labels,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Endpoint name override.
    pub endpoint: Option<String>,
    /// Direct URL override; bypasses named endpoints.
    pub url: Option<String>,
    /// Force submission ordering.
    pub ordered: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI options, then the config file, then built-in defaults.
///
/// # Errors
///
/// Returns an error if the requested endpoint is not configured.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let defaults = &config_file.chatline;

    let order = if options.ordered {
        ReplyOrder::Submission
    } else {
        defaults.order.unwrap_or_default()
    };

    let fallback = Labels::default();
    let labels = Labels {
        user: defaults.user_label.clone().unwrap_or(fallback.user),
        bot: defaults.bot_label.clone().unwrap_or(fallback.bot),
    };

    if let Some(url) = &options.url {
        return Ok(ResolvedConfig {
            endpoint_name: "url".to_string(),
            url: url.clone(),
            field: DEFAULT_FIELD.to_string(),
            order,
            labels,
        });
    }

    let requested = options.endpoint.as_ref().or(defaults.endpoint.as_ref());

    let Some(name) = requested else {
        return Ok(ResolvedConfig {
            endpoint_name: BUILTIN_ENDPOINT.to_string(),
            url: endpoint_url(DEFAULT_URL, DEFAULT_PATH),
            field: DEFAULT_FIELD.to_string(),
            order,
            labels,
        });
    };

    let Some(endpoint) = config_file.endpoints.get(name) else {
        if config_file.endpoints.is_empty() {
            bail!(
                "Endpoint '{name}' not found\n\n\
                 No endpoints configured. Add endpoints to ~/.config/chatline/config.toml"
            );
        }
        bail!(
            "Endpoint '{name}' not found\n\n\
             Available endpoints:\n  \
             - {}",
            config_file
                .endpoints
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n  - ")
        );
    };

    Ok(ResolvedConfig {
        endpoint_name: name.clone(),
        url: endpoint.message_url(),
        field: endpoint.field().to_string(),
        order,
        labels,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/chatline/config.toml`
    /// or `~/.config/chatline/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit file location.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }
}
