//! HTTP front door
//!
//! JSON routes answer with the `{code, msg, data}` envelope from
//! [`response`]; `/set` and `/search` serve the HTML pages from [`pages`].

pub mod api;
pub mod pages;
pub mod response;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::scheduler::{ProfileRefreshJob, RefreshQueue};
use crate::services::RisingStonesService;
use crate::store::ConfigStore;

use api::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Domain operations
    pub service: Arc<RisingStonesService>,

    /// Credentials and snapshot
    pub store: Arc<ConfigStore>,

    /// On-demand profile refresh
    pub refresh: RefreshQueue,

    /// Service settings
    pub settings: Arc<Settings>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Build state around a service, spawning the refresh worker
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(service: Arc<RisingStonesService>, settings: Settings) -> Self {
        let store = Arc::clone(service.store());
        let refresh = RefreshQueue::spawn(Arc::new(ProfileRefreshJob::new(Arc::clone(&service))));

        Self {
            service,
            store,
            refresh,
            settings: Arc::new(settings),
            start_time: Instant::now(),
        }
    }
}

/// HTTP server for the `/llmaget` routes
pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.state.settings.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Serve until `shutdown_signal` resolves
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.state.settings.server.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;

        tracing::info!(%addr, "HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("HTTP server shutdown complete");
        Ok(())
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}
