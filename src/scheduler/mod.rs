//! Background job scheduling
//!
//! Two fixed-cadence loops run for the life of the process:
//!
//! - profile refresh: once at startup, then every `fetch_interval`
//! - sign-in + reward claim: every `sign_interval`, no startup run
//!
//! Each tick spawns its run as a separate task, so a slow run never delays the
//! cadence. Overlapping runs of the same job are allowed unless single-flight
//! is enabled, in which case a tick that finds the previous run still going is
//! skipped.
//!
//! # Modules
//!
//! - [`jobs`] - the profile refresh and sign-in jobs
//! - [`refresh`] - coalescing queue for on-demand profile refreshes

pub mod jobs;
pub mod refresh;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::services::RisingStonesService;

pub use jobs::{ProfileRefreshJob, SignInJob};
pub use refresh::{RefreshQueue, RefreshRequest};

/// A unit of scheduled work
///
/// Failures are the job's own business: `run` logs them and returns.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run once
    async fn run(&self);
}

struct JobEntry {
    job: Arc<dyn Job>,
    period: Duration,
    run_at_start: bool,
}

/// Builder and launcher for the background loops
pub struct JobScheduler {
    jobs: Vec<JobEntry>,
    single_flight: bool,
}

impl JobScheduler {
    pub fn new(single_flight: bool) -> Self {
        Self {
            jobs: Vec::new(),
            single_flight,
        }
    }

    /// Standard loops for a service
    pub fn for_service(service: Arc<RisingStonesService>, settings: &Settings) -> Self {
        Self::new(settings.scheduler.single_flight)
            .add(
                Arc::new(ProfileRefreshJob::new(Arc::clone(&service))),
                settings.fetch_interval(),
                true,
            )
            .add(
                Arc::new(SignInJob::new(service)),
                settings.sign_interval(),
                false,
            )
    }

    /// Register a job
    pub fn add(mut self, job: Arc<dyn Job>, period: Duration, run_at_start: bool) -> Self {
        self.jobs.push(JobEntry {
            job,
            period,
            run_at_start,
        });
        self
    }

    /// Spawn one loop per registered job
    pub fn start(self) -> SchedulerHandle {
        let single_flight = self.single_flight;
        let handles = self
            .jobs
            .into_iter()
            .map(|entry| spawn_loop(entry, single_flight))
            .collect::<Vec<_>>();

        info!(jobs = handles.len(), single_flight, "Scheduler started");
        SchedulerHandle { handles }
    }
}

/// Running loops; dropping the handle leaves them running
pub struct SchedulerHandle {
    handles: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop the timer loops; runs already in progress finish on their own
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        info!("Scheduler stopped");
    }
}

fn spawn_loop(entry: JobEntry, single_flight: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let JobEntry {
            job,
            period,
            run_at_start,
        } = entry;
        let running = Arc::new(AtomicBool::new(false));

        info!(
            job = job.name(),
            period_secs = period.as_secs(),
            run_at_start,
            "Job loop started"
        );

        if run_at_start {
            dispatch(&job, &running, single_flight);
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            dispatch(&job, &running, single_flight);
        }
    })
}

/// Clears the in-flight flag when a run ends, panics included
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn dispatch(job: &Arc<dyn Job>, running: &Arc<AtomicBool>, single_flight: bool) {
    let guard = if single_flight {
        if running.swap(true, Ordering::AcqRel) {
            warn!(job = job.name(), "Previous run still in progress, skipping tick");
            return;
        }
        Some(InFlight(Arc::clone(running)))
    } else {
        None
    };

    let job = Arc::clone(job);
    tokio::spawn(async move {
        let _guard = guard;
        debug!(job = job.name(), "Job run started");
        job.run().await;
        debug!(job = job.name(), "Job run finished");
    });
}
