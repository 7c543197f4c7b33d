pub mod oneshot;
pub mod serve;

use anyhow::{Context, Result};
use std::sync::Arc;

use llmaget::client::{ClientConfig, RisingStonesClient};
use llmaget::config::Settings;
use llmaget::services::RisingStonesService;
use llmaget::store::ConfigStore;

// Re-export command functions for convenience
pub use oneshot::{bind_info, claim, fetch, rewards, search, sign_and_claim, sign_in};
pub use serve::serve;

/// Load the credential store and wire the service for the given settings
pub async fn build_service(settings: &Settings) -> Result<Arc<RisingStonesService>> {
    let store = Arc::new(
        ConfigStore::load(
            &settings.storage.config_file,
            &settings.storage.snapshot_file,
        )
        .await,
    );

    let client = RisingStonesClient::new(ClientConfig::from_settings(settings), store)
        .context("Failed to create API client")?;

    Ok(Arc::new(RisingStonesService::new(client)))
}
