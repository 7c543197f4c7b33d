//! Paged character search against a mock remote

mod common;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{search_body, search_row, setup};
use llmaget::error::Error;
use llmaget::services::search::{SEARCH_MAX_PAGES, SEARCH_PAGE_SIZE};

const SEARCH: &str = "/api/common/search";

fn full_page_of_strangers() -> Vec<Value> {
    (0..SEARCH_PAGE_SIZE)
        .map(|i| search_row(&format!("u{i}"), &format!("Stranger{i}"), "拉诺西亚", "陆行鸟"))
        .collect()
}

#[tokio::test]
async fn test_search_sends_expected_query() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("type", "6"))
        .and(query_param("orderBy", "comment"))
        .and(query_param("keywords", "Alice"))
        .and(query_param("limit", "60"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![search_row(
            "u-1", "Alice", "拉诺西亚", "陆行鸟",
        )])))
        .expect(1)
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "").await.unwrap();

    assert_eq!(user.uuid, "u-1");
    assert_eq!(user.user_name, "Alice");
    assert_eq!(user.group_name, "拉诺西亚");
    assert_eq!(user.area_name, "陆行鸟");
}

#[tokio::test]
async fn test_search_gives_up_after_page_limit() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(full_page_of_strangers())))
        .expect(u64::from(SEARCH_MAX_PAGES))
        .mount(&env.server)
        .await;

    let err = env.service.search_user("Alice", "").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_search_stops_at_first_empty_page() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(full_page_of_strangers())))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
        .expect(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
        .expect(0)
        .mount(&env.server)
        .await;

    let err = env.service.search_user("Alice", "").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_search_null_data_is_empty_page() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 10000, "msg": "ok", "data": null })),
        )
        .expect(1)
        .mount(&env.server)
        .await;

    let err = env.service.search_user("Alice", "").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_search_match_on_later_page() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(full_page_of_strangers())))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![search_row(
            "u-2", "Alice", "紫水栈桥", "猫小胖",
        )])))
        .expect(1)
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "").await.unwrap();
    assert_eq!(user.uuid, "u-2");
}

fn duplicate_names() -> Value {
    search_body(vec![
        search_row("u-a", "Alice", "拉诺西亚", "陆行鸟"),
        search_row("u-b", "Alice", "紫水栈桥", "猫小胖"),
        search_row("u-c", "Alice", "红玉海", "莫古力"),
    ])
}

#[tokio::test]
async fn test_search_without_filter_takes_first_exact_match() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(duplicate_names()))
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "").await.unwrap();
    assert_eq!(user.uuid, "u-a");
}

#[tokio::test]
async fn test_search_group_filter_skips_other_servers() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(duplicate_names()))
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "红玉海").await.unwrap();
    assert_eq!(user.uuid, "u-c");
}

#[tokio::test]
async fn test_search_region_alias_filter() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(duplicate_names()))
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "m").await.unwrap();
    assert_eq!(user.uuid, "u-b");

    let user = env.service.search_user("Alice", "猪").await.unwrap();
    assert_eq!(user.uuid, "u-c");
}

#[tokio::test]
async fn test_search_tolerates_null_fields_in_other_rows() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
            json!({ "uuid": null, "character_name": "Stranger", "group_name": null, "area_name": null }),
            search_row("u-1", "Alice", "拉诺西亚", "陆行鸟"),
        ])))
        .expect(1)
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "").await.unwrap();
    assert_eq!(user.uuid, "u-1");
}

#[tokio::test]
async fn test_search_null_group_does_not_match_filter() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
            json!({ "uuid": "u-a", "character_name": "Alice", "group_name": null, "area_name": null }),
            search_row("u-b", "Alice", "拉诺西亚", "猫小胖"),
        ])))
        .mount(&env.server)
        .await;

    let user = env.service.search_user("Alice", "m").await.unwrap();
    assert_eq!(user.uuid, "u-b");
    assert_eq!(user.area_name, "猫小胖");
}

#[tokio::test]
async fn test_search_remote_error_code() {
    let env = setup().await;

    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 10301, "msg": "too frequent", "data": null })),
        )
        .mount(&env.server)
        .await;

    let err = env.service.search_user("Alice", "").await.unwrap_err();
    assert!(matches!(err.root(), Error::Remote { code: 10301, .. }));
}

#[tokio::test]
async fn test_search_rejects_empty_name() {
    let env = setup().await;

    let err = env.service.search_user("  ", "m").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
