use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::chat::ChatSession;
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::exchange::HttpTransport;

pub async fn run_chat(options: ResolveOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = resolve_config(&options, &manager.load_or_default()?)?;

    info!(
        endpoint = %config.endpoint_name,
        url = %config.url,
        order = %config.order,
        "Starting chat"
    );

    let transport = Arc::new(HttpTransport::new(config.url.clone(), config.field.clone()));
    let session = ChatSession::new(config, transport);
    session.run().await
}
