//! On-demand profile refresh
//!
//! Requests go through a single-slot channel drained by one worker task. A
//! request made while another is already waiting is folded into it, so a
//! burst of refresh calls costs at most one extra fetch.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::Job;
use crate::error::{Error, Result};

/// Outcome of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRequest {
    /// A new run was queued
    Queued,
    /// A run was already waiting; this request was folded into it
    Coalesced,
}

/// Handle for submitting refreshes to the worker
#[derive(Clone)]
pub struct RefreshQueue {
    tx: mpsc::Sender<()>,
}

impl RefreshQueue {
    /// Spawn the worker; it stops once every handle is dropped
    pub fn spawn(job: Arc<dyn Job>) -> Self {
        let (tx, mut rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                debug!(job = job.name(), "Running requested refresh");
                job.run().await;
            }
            debug!(job = job.name(), "Refresh worker stopped");
        });

        Self { tx }
    }

    /// Ask for a refresh without waiting for it
    pub fn request(&self) -> Result<RefreshRequest> {
        match self.tx.try_send(()) {
            Ok(()) => {
                info!("Profile refresh queued");
                Ok(RefreshRequest::Queued)
            }
            Err(mpsc::error::TrySendError::Full(())) => Ok(RefreshRequest::Coalesced),
            Err(mpsc::error::TrySendError::Closed(())) => {
                Err(Error::config("refresh worker is not running"))
            }
        }
    }
}
