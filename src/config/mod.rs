//! Service settings for llmaget
//!
//! Settings are read from `LLMAGET_*` environment variables with defaults and
//! can be overridden from the command line. The user-editable credentials
//! (user agent and cookie) are not settings: they live in the config store and
//! are persisted to their own JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::retry::RetryConfig;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://apiff14risingstones.web.sdo.com";

/// User agent written to a fresh config file
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    pub server: ServerSettings,

    /// Remote API client settings
    pub client: ClientSettings,

    /// Persisted files
    pub storage: StorageSettings,

    /// Background job settings
    pub scheduler: SchedulerSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address for the HTTP front door
    pub bind_address: SocketAddr,

    /// Enable permissive CORS
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Scheme + host of the remote API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// First retry delay in milliseconds
    pub retry_base_delay_ms: u64,

    /// Ceiling for retry delays in milliseconds
    pub retry_max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Credentials file (`{user_agent, cookie}`)
    pub config_file: PathBuf,

    /// Last fetched profile payload
    pub snapshot_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Profile refresh period in seconds
    pub fetch_interval_secs: u64,

    /// Sign-in + claim period in seconds
    pub sign_interval_secs: u64,

    /// Skip a tick while the previous run of the same job is still going
    pub single_flight: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log format (text, json)
    pub format: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address = match std::env::var("LLMAGET_BIND") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid LLMAGET_BIND address: {raw}"))?,
            Err(_) => defaults.server.bind_address,
        };

        let settings = Self {
            server: ServerSettings {
                bind_address,
                enable_cors: env_or("LLMAGET_ENABLE_CORS", defaults.server.enable_cors),
            },
            client: ClientSettings {
                base_url: std::env::var("LLMAGET_BASE_URL")
                    .unwrap_or(defaults.client.base_url),
                request_timeout_secs: env_or(
                    "LLMAGET_TIMEOUT_SECS",
                    defaults.client.request_timeout_secs,
                ),
                max_retries: env_or("LLMAGET_MAX_RETRIES", defaults.client.max_retries),
                retry_base_delay_ms: defaults.client.retry_base_delay_ms,
                retry_max_delay_ms: defaults.client.retry_max_delay_ms,
            },
            storage: StorageSettings {
                config_file: std::env::var("LLMAGET_CONFIG_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.config_file),
                snapshot_file: std::env::var("LLMAGET_SNAPSHOT_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.snapshot_file),
            },
            scheduler: SchedulerSettings {
                fetch_interval_secs: env_or(
                    "LLMAGET_FETCH_INTERVAL_SECS",
                    defaults.scheduler.fetch_interval_secs,
                ),
                sign_interval_secs: env_or(
                    "LLMAGET_SIGN_INTERVAL_SECS",
                    defaults.scheduler.sign_interval_secs,
                ),
                single_flight: env_or("LLMAGET_SINGLE_FLIGHT", defaults.scheduler.single_flight),
            },
            logging: LoggingSettings {
                format: std::env::var("LLMAGET_LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
        };

        Ok(settings)
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.client.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.client.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("base URL must be http or https, got {}", url.scheme());
        }

        if self.client.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.client.retry_base_delay_ms > self.client.retry_max_delay_ms {
            anyhow::bail!("retry_base_delay_ms must not exceed retry_max_delay_ms");
        }

        if self.scheduler.fetch_interval_secs == 0 || self.scheduler.sign_interval_secs == 0 {
            anyhow::bail!("scheduler intervals must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.client.request_timeout_secs)
    }

    /// Retry policy for outbound calls
    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::with_delays(
            self.client.max_retries,
            self.client.retry_base_delay_ms,
            self.client.retry_max_delay_ms,
        )
    }

    #[must_use]
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.fetch_interval_secs)
    }

    #[must_use]
    pub fn sign_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.sign_interval_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
                enable_cors: true,
            },
            client: ClientSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                request_timeout_secs: 30,
                max_retries: 3,
                retry_base_delay_ms: 1000,
                retry_max_delay_ms: 5000,
            },
            storage: StorageSettings {
                config_file: PathBuf::from("config.json"),
                snapshot_file: PathBuf::from("response.json"),
            },
            scheduler: SchedulerSettings {
                fetch_interval_secs: 12 * 60 * 60,
                sign_interval_secs: 24 * 60 * 60,
                single_flight: false,
            },
            logging: LoggingSettings {
                format: String::from("text"),
            },
        }
    }
}
