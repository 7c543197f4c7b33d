//! Integration tests for the domain operations against a mock remote

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{current_month, rewards_body, setup, setup_without_cookie, user_info_body};
use llmaget::error::{Error, ErrorCategory};

const USER_INFO: &str = "/api/home/userInfo/getUserInfo";
const SIGN_IN: &str = "/api/home/sign/signIn";
const REWARD_LIST: &str = "/api/home/sign/signRewardList";
const CLAIM: &str = "/api/home/sign/getSignReward";

#[tokio::test]
async fn test_fetch_profile_stores_pretty_snapshot() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(USER_INFO))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_body("Alice", "1天2小时3分钟")))
        .expect(1)
        .mount(&env.server)
        .await;

    let profile = env.service.fetch_profile().await.unwrap();
    assert_eq!(profile.data.character_name, "Alice");

    assert!(env.store.has_data().await);
    let on_disk = std::fs::read_to_string(env.dir.path().join("response.json")).unwrap();
    assert!(on_disk.contains("\n  \"code\": 10000"), "snapshot should be indented: {on_disk}");

    let info = env.service.ff_info().await.unwrap();
    assert_eq!(info.character_name, "Alice");
    assert_eq!(info.play_time, 1440 + 120 + 3);
}

#[tokio::test]
async fn test_fetch_profile_remote_failure_keeps_snapshot() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(USER_INFO))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 10401, "msg": "not logged in", "data": null })),
        )
        .mount(&env.server)
        .await;

    let err = env.service.fetch_profile().await.unwrap_err();

    assert!(matches!(err, Error::Fetch { .. }));
    assert!(matches!(err.root(), Error::Remote { code: 10401, .. }));
    assert!(!env.store.has_data().await);
    assert!(!env.dir.path().join("response.json").exists());
}

#[tokio::test]
async fn test_fetch_profile_malformed_body_is_decode_error() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(USER_INFO))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&env.server)
        .await;

    let err = env.service.fetch_profile().await.unwrap_err();

    assert!(matches!(err.root(), Error::Decode { .. }));
    assert_eq!(err.category(), ErrorCategory::Data);
    assert!(!env.store.has_data().await);
}

#[tokio::test]
async fn test_fetch_profile_without_cookie() {
    let env = setup_without_cookie().await;

    let err = env.service.fetch_profile().await.unwrap_err();

    assert!(matches!(err.root(), Error::Auth));
    assert_eq!(err.category(), ErrorCategory::Auth);
}

#[tokio::test]
async fn test_ff_info_without_any_snapshot() {
    let env = setup().await;

    let err = env.service.ff_info().await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_ff_info_empty_character_detail() {
    let env = setup().await;
    env.store
        .store_snapshot(br#"{"code":10000,"data":{"character_name":"Bob","characterDetail":[]}}"#.to_vec())
        .await
        .unwrap();

    let info = env.service.ff_info().await.unwrap();
    assert_eq!(info.character_name, "Bob");
    assert_eq!(info.play_time, 0);
}

#[tokio::test]
async fn test_list_monthly_rewards_keeps_order() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .and(query_param("month", current_month()))
        .respond_with(ResponseTemplate::new(200).set_body_json(rewards_body(&[
            (3, "item3", 2),
            (1, "item1", 0),
            (2, "item2", 1),
        ])))
        .expect(1)
        .mount(&env.server)
        .await;

    let rewards = env.service.list_monthly_rewards().await.unwrap();
    let ids: Vec<i64> = rewards.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_list_monthly_rewards_accepts_null_fields() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 10000,
            "msg": null,
            "data": [
                { "id": 1, "item_name": null, "is_get": 2 },
                { "id": 2, "item_name": "item2", "is_get": null },
            ],
        })))
        .mount(&env.server)
        .await;

    let rewards = env.service.list_monthly_rewards().await.unwrap();

    assert_eq!(rewards.len(), 2);
    assert_eq!(rewards[0].item_name, "");
    assert_eq!(rewards[1].is_get, 0);
}

#[tokio::test]
async fn test_sign_in_and_claim_all_with_null_reward_names() {
    let env = setup().await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 10000,
            "msg": "success",
            "data": [
                { "id": 1, "item_name": null, "is_get": 2 },
                { "id": 2, "item_name": "item2", "is_get": 0 },
            ],
        })))
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path(CLAIM))
        .and(body_partial_json(json!({ "id": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .expect(1)
        .mount(&env.server)
        .await;

    let summary = env.service.sign_in_and_claim_all().await.unwrap();

    assert_eq!(summary.unavailable, vec![""]);
    assert_eq!(summary.success, vec!["item2"]);
}

#[tokio::test]
async fn test_claim_reward_posts_id_and_month() {
    let env = setup().await;

    Mock::given(method("POST"))
        .and(path(CLAIM))
        .and(body_json(json!({ "id": 5, "month": current_month() })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .expect(1)
        .mount(&env.server)
        .await;

    let body = env.service.claim_reward(5).await.unwrap();
    assert_eq!(body, br#"{"code":10000}"#.to_vec());
}

#[tokio::test]
async fn test_sign_in_and_claim_all_buckets() {
    let env = setup().await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(rewards_body(&[
            (1, "item1", 0),
            (2, "item2", 1),
            (3, "item3", 2),
        ])))
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path(CLAIM))
        .and(body_partial_json(json!({ "id": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .expect(1)
        .mount(&env.server)
        .await;

    let summary = env.service.sign_in_and_claim_all().await.unwrap();

    assert_eq!(summary.available, vec!["item1"]);
    assert_eq!(summary.claimed, vec!["item2"]);
    assert_eq!(summary.unavailable, vec!["item3"]);
    assert_eq!(summary.success, vec!["item1"]);
    assert!(summary.fail.is_empty());
}

#[tokio::test]
async fn test_sign_in_and_claim_all_stops_at_first_failure() {
    let env = setup().await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":10000}"#))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(rewards_body(&[
            (1, "first", 0),
            (2, "second", 0),
        ])))
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path(CLAIM))
        .and(body_partial_json(json!({ "id": 1 })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path(CLAIM))
        .and(body_partial_json(json!({ "id": 2 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.server)
        .await;

    let err = env.service.sign_in_and_claim_all().await.unwrap_err();

    let summary = err.claim_summary().expect("partial summary");
    assert_eq!(summary.available, vec!["first", "second"]);
    assert_eq!(summary.fail, vec!["first"]);
    assert!(summary.success.is_empty());
    assert!(matches!(err.root(), Error::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_sign_in_failure_skips_rewards() {
    let env = setup().await;

    Mock::given(method("POST"))
        .and(path(SIGN_IN))
        .respond_with(ResponseTemplate::new(503))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(REWARD_LIST))
        .respond_with(ResponseTemplate::new(200).set_body_json(rewards_body(&[])))
        .expect(0)
        .mount(&env.server)
        .await;

    let err = env.service.sign_in_and_claim_all().await.unwrap_err();

    assert!(err.claim_summary().is_none());
    assert!(matches!(err, Error::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_bind_info_uses_platform_two() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/home/groupAndRole/getCharacterBindInfo"))
        .and(query_param("platform", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 10000, "data": [{ "character_name": "Alice" }] })),
        )
        .expect(1)
        .mount(&env.server)
        .await;

    let info = env.service.fetch_bind_info().await.unwrap();
    assert_eq!(info["data"][0]["character_name"], "Alice");
    assert!(!env.store.has_data().await);
}

#[tokio::test]
async fn test_status_after_fetch() {
    let env = setup().await;

    let before = env.service.status(Duration::from_secs(12 * 3600)).await;
    assert!(!before.has_data);
    assert!(before.has_cookie);
    assert_eq!(before.last_fetch_at, "-");
    assert_eq!(before.next_fetch_at, "-");
    assert_eq!(before.fetch_interval, "12h0m0s");

    Mock::given(method("GET"))
        .and(path(USER_INFO))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_body("Alice", "3小时")))
        .mount(&env.server)
        .await;
    env.service.fetch_profile().await.unwrap();

    let after = env.service.status(Duration::from_secs(12 * 3600)).await;
    assert!(after.has_data);
    assert_ne!(after.last_fetch_at, "-");
    assert_ne!(after.next_fetch_at, "-");
    assert!(after.next_fetch_at > after.last_fetch_at);
}
