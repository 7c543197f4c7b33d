//! llmaget - Risingstones community automation
//!
//! Keeps a player's profile snapshot fresh, signs in daily, claims the monthly
//! sign-in rewards and searches characters, all against the FF14 Risingstones
//! community API. Results are served over a small HTTP API.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Service settings from the environment
//! - [`store`] - Credentials and profile snapshot behind one lock, persisted as JSON
//! - [`client`] - Authenticated API client with timeout and retry
//! - [`services`] - Domain operations (profile, sign-in, rewards, search)
//! - [`scheduler`] - Periodic jobs and the on-demand refresh queue
//! - [`server`] - HTTP routes under `/llmaget`
//! - [`models`] - Remote payload shapes and response types
//! - [`utils`] - Play-time parsing, formatting and retry helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use llmaget::client::{ClientConfig, RisingStonesClient};
//! use llmaget::services::RisingStonesService;
//! use llmaget::store::ConfigStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(ConfigStore::load("config.json", "response.json").await);
//!     let client = RisingStonesClient::new(ClientConfig::default(), store)?;
//!     let service = RisingStonesService::new(client);
//!     let summary = service.sign_in_and_claim_all().await?;
//!     println!("claimed {:?}", summary.success);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod services;
pub mod store;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{ClientConfig, Endpoint, RisingStonesClient};
    pub use crate::config::Settings;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{ClaimSummary, Credentials, Region, RewardItem, UserInfo};
    pub use crate::scheduler::{JobScheduler, RefreshQueue};
    pub use crate::services::RisingStonesService;
    pub use crate::store::ConfigStore;
}

// Direct re-exports for convenience
pub use models::{area_name, ClaimSummary, Credentials, Region};
pub use utils::parse_play_time_to_minutes;
