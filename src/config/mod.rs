//! Configuration file management and endpoint settings.

mod manager;

pub use manager::{
    BUILTIN_ENDPOINT, ChatlineConfig, ConfigFile, ConfigManager, DEFAULT_URL, EndpointConfig,
    ResolveOptions, ResolvedConfig, resolve_config,
};
