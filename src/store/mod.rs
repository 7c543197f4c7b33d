//! Config store: credentials plus the last fetched profile snapshot
//!
//! Both live behind a single [`tokio::sync::RwLock`]. Readers (status, info
//! queries, request decoration) share the lock; credential updates and
//! snapshot replacement take it exclusively and write their file while still
//! holding it, so memory and disk are updated in the same order by every
//! writer.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::models::Credentials;

/// Last successful profile fetch
#[derive(Debug)]
struct Snapshot {
    /// Payload as written to the snapshot file
    bytes: Vec<u8>,
    fetched_at: DateTime<Local>,
}

#[derive(Debug)]
struct Inner {
    credentials: Credentials,
    snapshot: Option<Snapshot>,
}

/// Shared, file-backed process state
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<Inner>,
    config_path: PathBuf,
    snapshot_path: PathBuf,
}

fn default_credentials() -> Credentials {
    Credentials {
        user_agent: DEFAULT_USER_AGENT.to_string(),
        cookie: String::new(),
    }
}

impl ConfigStore {
    /// Create a store with default credentials without touching the disk
    pub fn new(config_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self::with_credentials(config_path, snapshot_path, default_credentials())
    }

    /// Create a store with explicit credentials without touching the disk
    pub fn with_credentials(
        config_path: impl Into<PathBuf>,
        snapshot_path: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> Self {
        Self {
            inner: RwLock::new(Inner {
                credentials,
                snapshot: None,
            }),
            config_path: config_path.into(),
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Load credentials from the config file
    ///
    /// A missing file falls back to defaults and writes them out; a malformed
    /// file falls back to defaults and is left untouched.
    pub async fn load(config_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let snapshot_path = snapshot_path.into();

        match tokio::fs::read(&config_path).await {
            Ok(bytes) => match serde_json::from_slice::<Credentials>(&bytes) {
                Ok(credentials) => {
                    info!(path = %config_path.display(), "Config loaded");
                    Self::with_credentials(config_path, snapshot_path, credentials)
                }
                Err(e) => {
                    warn!(
                        path = %config_path.display(),
                        error = %e,
                        "Config file is malformed, using defaults"
                    );
                    Self::new(config_path, snapshot_path)
                }
            },
            Err(e) => {
                warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Config file not readable, writing defaults"
                );
                let store = Self::new(config_path, snapshot_path);
                if let Err(e) = store.save().await {
                    warn!(error = %e, "Failed to write default config");
                }
                store
            }
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Copy of the current credentials
    pub async fn credentials(&self) -> Credentials {
        self.inner.read().await.credentials.clone()
    }

    pub async fn has_cookie(&self) -> bool {
        self.inner.read().await.credentials.has_cookie()
    }

    /// Persist the current credentials
    pub async fn save(&self) -> Result<()> {
        let inner = self.inner.read().await;
        write_credentials(&self.config_path, &inner.credentials).await
    }

    /// Merge a partial update and persist the result
    pub async fn update_credentials(&self, update: &Credentials) -> Result<Credentials> {
        let mut inner = self.inner.write().await;
        let changed = inner.credentials.merge(update);
        debug!(changed, "Credentials update applied");
        write_credentials(&self.config_path, &inner.credentials).await?;
        Ok(inner.credentials.clone())
    }

    /// Replace the snapshot in memory and on disk
    pub async fn store_snapshot(&self, bytes: Vec<u8>) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.snapshot = Some(Snapshot {
            bytes: bytes.clone(),
            fetched_at: Local::now(),
        });
        write_atomic(&self.snapshot_path, &bytes)
            .await
            .map_err(|e| Error::io(format!("writing {}", self.snapshot_path.display()), e))
    }

    /// Snapshot bytes from memory, falling back to the snapshot file
    pub async fn snapshot_bytes(&self) -> Result<Vec<u8>> {
        if let Some(snapshot) = self.inner.read().await.snapshot.as_ref() {
            return Ok(snapshot.bytes.clone());
        }

        match tokio::fs::read(&self.snapshot_path).await {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            Ok(_) => Err(Error::NotFound("profile data has not been fetched yet".to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound("profile data has not been fetched yet".to_string()))
            }
            Err(e) => Err(Error::io(format!("reading {}", self.snapshot_path.display()), e)),
        }
    }

    pub async fn has_data(&self) -> bool {
        self.inner
            .read()
            .await
            .snapshot
            .as_ref()
            .is_some_and(|s| !s.bytes.is_empty())
    }

    pub async fn last_fetch_at(&self) -> Option<DateTime<Local>> {
        self.inner.read().await.snapshot.as_ref().map(|s| s.fetched_at)
    }
}

async fn write_credentials(path: &Path, credentials: &Credentials) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(credentials)
        .map_err(|e| Error::config(format!("failed to encode credentials: {e}")))?;
    write_atomic(path, &bytes)
        .await
        .map_err(|e| Error::io(format!("writing {}", path.display()), e))
}

/// Write through a temporary sibling and rename over the target
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}
