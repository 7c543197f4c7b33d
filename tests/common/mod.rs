//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

use llmaget::client::{ClientConfig, RisingStonesClient};
use llmaget::models::Credentials;
use llmaget::services::RisingStonesService;
use llmaget::store::ConfigStore;
use llmaget::utils::retry::RetryConfig;

pub const TEST_COOKIE: &str = "test-cookie";
pub const TEST_AGENT: &str = "TestAgent/1.0";

/// Mock remote host plus a service wired against it
pub struct TestEnv {
    pub server: MockServer,
    pub dir: TempDir,
    pub store: Arc<ConfigStore>,
    pub service: Arc<RisingStonesService>,
}

/// Client settings with millisecond retry delays
pub fn fast_client_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        retry: RetryConfig::with_delays(3, 10, 50),
    }
}

pub fn test_store(dir: &TempDir, cookie: &str) -> Arc<ConfigStore> {
    Arc::new(ConfigStore::with_credentials(
        dir.path().join("config.json"),
        dir.path().join("response.json"),
        Credentials {
            user_agent: TEST_AGENT.to_string(),
            cookie: cookie.to_string(),
        },
    ))
}

async fn setup_with_cookie(cookie: &str) -> TestEnv {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir, cookie);
    let client =
        RisingStonesClient::new(fast_client_config(&server.uri()), Arc::clone(&store)).unwrap();

    TestEnv {
        server,
        dir,
        store,
        service: Arc::new(RisingStonesService::new(client)),
    }
}

/// Environment with a configured cookie
pub async fn setup() -> TestEnv {
    setup_with_cookie(TEST_COOKIE).await
}

/// Environment whose store has no cookie
pub async fn setup_without_cookie() -> TestEnv {
    setup_with_cookie("").await
}

pub fn user_info_body(name: &str, play_time: &str) -> Value {
    json!({
        "code": 10000,
        "msg": "success",
        "data": {
            "uuid": "10001",
            "character_name": name,
            "area_name": "陆行鸟",
            "group_name": "拉诺西亚",
            "characterDetail": [
                { "character_name": name, "play_time": play_time }
            ]
        }
    })
}

/// Reward list from `(id, name, is_get)` triples
pub fn rewards_body(items: &[(i64, &str, i64)]) -> Value {
    let data: Vec<Value> = items
        .iter()
        .map(|(id, name, is_get)| json!({ "id": id, "item_name": name, "is_get": is_get }))
        .collect();
    json!({ "code": 10000, "msg": "success", "data": data })
}

pub fn search_row(uuid: &str, name: &str, group: &str, area: &str) -> Value {
    json!({
        "uuid": uuid,
        "character_name": name,
        "group_name": group,
        "area_name": area,
    })
}

pub fn search_body(rows: Vec<Value>) -> Value {
    json!({ "code": 10000, "msg": "success", "data": rows })
}

pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}
