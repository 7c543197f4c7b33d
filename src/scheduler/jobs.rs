use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::Job;
use crate::error::Error;
use crate::services::RisingStonesService;

fn log_failure(job: &'static str, err: &Error) {
    if matches!(err.root(), Error::Auth) {
        warn!(job, "Cookie not configured, run skipped");
    } else {
        error!(
            job,
            error = %err,
            category = err.category().label(),
            recoverable = err.is_recoverable(),
            "Scheduled run failed"
        );
    }
}

/// Refreshes the cached profile snapshot
pub struct ProfileRefreshJob {
    service: Arc<RisingStonesService>,
}

impl ProfileRefreshJob {
    pub fn new(service: Arc<RisingStonesService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Job for ProfileRefreshJob {
    fn name(&self) -> &'static str {
        "profile_refresh"
    }

    async fn run(&self) {
        match self.service.fetch_profile().await {
            Ok(profile) => info!(
                job = self.name(),
                character = %profile.data.character_name,
                "Profile refreshed"
            ),
            Err(e) => log_failure(self.name(), &e),
        }
    }
}

/// Daily sign-in followed by claiming every claimable reward
pub struct SignInJob {
    service: Arc<RisingStonesService>,
}

impl SignInJob {
    pub fn new(service: Arc<RisingStonesService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Job for SignInJob {
    fn name(&self) -> &'static str {
        "sign_in"
    }

    async fn run(&self) {
        match self.service.sign_in_and_claim_all().await {
            Ok(summary) => info!(
                job = self.name(),
                success = ?summary.success,
                claimed = ?summary.claimed,
                unavailable = ?summary.unavailable,
                "Sign-in and claims finished"
            ),
            Err(e) => {
                if let Some(summary) = e.claim_summary() {
                    warn!(
                        job = self.name(),
                        success = ?summary.success,
                        fail = ?summary.fail,
                        "Claims stopped early"
                    );
                }
                log_failure(self.name(), &e);
            }
        }
    }
}
