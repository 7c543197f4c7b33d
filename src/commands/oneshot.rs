//! Single-shot commands: run one operation, print its JSON result to stdout

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use llmaget::config::Settings;

use super::build_service;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode result")?;
    println!("{text}");
    Ok(())
}

/// Remote answers are printed as JSON when they parse, verbatim otherwise
fn print_body(body: &[u8]) -> Result<()> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => print_json(&value),
        Err(_) => {
            println!("{}", String::from_utf8_lossy(body));
            Ok(())
        }
    }
}

pub async fn fetch(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    service.fetch_profile().await?;
    print_json(&service.ff_info().await?)
}

pub async fn sign_in(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    print_body(&service.sign_in().await?)
}

pub async fn rewards(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    print_json(&service.list_monthly_rewards().await?)
}

pub async fn claim(settings: Settings, id: i64) -> Result<()> {
    let service = build_service(&settings).await?;
    print_body(&service.claim_reward(id).await?)
}

pub async fn sign_and_claim(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    match service.sign_in_and_claim_all().await {
        Ok(summary) => print_json(&summary),
        Err(e) => {
            if let Some(summary) = e.claim_summary() {
                print_json(summary)?;
            }
            Err(e.into())
        }
    }
}

pub async fn search(settings: Settings, name: String, server: Option<String>) -> Result<()> {
    let service = build_service(&settings).await?;
    let user = service
        .search_user(&name, server.as_deref().unwrap_or_default())
        .await?;
    print_json(&user)
}

pub async fn bind_info(settings: Settings) -> Result<()> {
    let service = build_service(&settings).await?;
    print_json(&service.fetch_bind_info().await?)
}
