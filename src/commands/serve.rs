use anyhow::{Context, Result};
use std::sync::Arc;

use llmaget::config::Settings;
use llmaget::scheduler::JobScheduler;
use llmaget::server::{AppState, Server};

use super::build_service;

/// Run the scheduler and the HTTP server until Ctrl+C
pub async fn serve(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    let bind_address = settings.server.bind_address;

    if !service.store().has_cookie().await {
        tracing::warn!(
            config = %settings.storage.config_file.display(),
            "No cookie configured yet, open /llmaget/set to add one"
        );
    }

    let scheduler = JobScheduler::for_service(Arc::clone(&service), &settings).start();
    let server = Server::new(AppState::new(service, settings));

    println!("API Endpoints:");
    println!("  GET  /llmaget/ff_info                  - Character name and play time");
    println!("  GET  /llmaget/status                   - Cache and cookie status");
    println!("  GET  /llmaget/refresh                  - Trigger a profile refresh");
    println!("  GET  /llmaget/sign_in                  - Sign in now");
    println!("  GET  /llmaget/config                   - Cookie presence");
    println!("  POST /llmaget/config                   - Update user agent / cookie");
    println!("  GET  /llmaget/set                      - Settings page");
    println!("  GET  /llmaget/search                   - Character search page");
    println!("  GET  /llmaget/get_sign_reward?id=      - Claim one reward");
    println!("  GET  /llmaget/sign_reward_list         - This month's rewards");
    println!("  GET  /llmaget/sign_and_get_sign_reward - Sign in and claim everything");
    println!("  GET  /llmaget/bind_info                - Character binding info");
    println!();
    println!("Listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    let result = server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await;

    scheduler.shutdown();
    result.context("HTTP server failed")?;

    println!("Server stopped.");
    Ok(())
}
