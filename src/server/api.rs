//! Route handlers under `/llmaget`

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::models::{ClaimSummary, Credentials, FfInfo, RewardItem, StatusData};

use super::pages;
use super::response::{ApiError, ApiResponse, ApiResult};
use super::AppState;

const NO_COOKIE: &str = "Cookie is not configured, set one first";

/// `GET /config` payload; the cookie itself is never echoed
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigData {
    pub has_cookie: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetParams {
    #[serde(default)]
    pub cookie: String,
    #[serde(default)]
    pub ua: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub server_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClaimParams {
    pub id: Option<String>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/ff_info", get(ff_info))
        .route("/status", get(status))
        .route("/refresh", get(refresh))
        .route("/sign_in", get(sign_in))
        .route("/config", get(get_config).post(update_config))
        .route("/set", get(set_config_page))
        .route("/search", get(search_page))
        .route("/get_sign_reward", get(claim_reward))
        .route("/sign_reward_list", get(reward_list))
        .route("/sign_and_get_sign_reward", get(sign_and_claim))
        .route("/bind_info", get(bind_info));

    Router::new().nest("/llmaget", api).with_state(state)
}

async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    ApiResponse::success(
        "success",
        HealthData {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
        },
    )
}

async fn ff_info(State(state): State<AppState>) -> ApiResult<FfInfo> {
    match state.service.ff_info().await {
        Ok(info) => Ok(ApiResponse::success("success", info)),
        Err(Error::NotFound(_)) => Err(ApiError::new(
            axum::http::StatusCode::NOT_FOUND,
            "Profile data has not been fetched yet, configure a cookie and refresh",
        )),
        Err(e) => Err(ApiError::from_error("Reading profile data", &e)),
    }
}

async fn status(State(state): State<AppState>) -> ApiResponse<StatusData> {
    let data = state.service.status(state.settings.fetch_interval()).await;
    ApiResponse::success("Service running", data)
}

async fn refresh(State(state): State<AppState>) -> ApiResult<Value> {
    if !state.store.has_cookie().await {
        return Err(ApiError::bad_request(NO_COOKIE));
    }

    state
        .refresh
        .request()
        .map_err(|e| ApiError::from_error("Triggering refresh", &e))?;

    Ok(ApiResponse::message(
        "Refresh triggered, query the status later for the result",
    ))
}

async fn sign_in(State(state): State<AppState>) -> ApiResult<Value> {
    if !state.store.has_cookie().await {
        return Err(ApiError::bad_request(NO_COOKIE));
    }

    let body = state
        .service
        .sign_in()
        .await
        .map_err(|e| ApiError::failed("Sign-in failed", &e))?;

    let data: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::internal("Failed to parse the sign-in response"))?;

    Ok(ApiResponse::success("success", data))
}

async fn get_config(State(state): State<AppState>) -> ApiResponse<ConfigData> {
    ApiResponse::success(
        "success",
        ConfigData {
            has_cookie: state.store.has_cookie().await,
        },
    )
}

async fn update_config(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(update) =
        payload.map_err(|e| ApiError::bad_request(format!("Malformed request body: {e}")))?;

    state
        .store
        .update_credentials(&update)
        .await
        .map_err(|e| ApiError::from_error("Saving config failed", &e))?;

    Ok(ApiResponse::message("Config updated"))
}

async fn set_config_page(
    State(state): State<AppState>,
    Query(params): Query<SetParams>,
) -> Response {
    if params.cookie.is_empty() && params.ua.is_empty() {
        return Html(pages::config_page()).into_response();
    }

    let update = Credentials {
        user_agent: params.ua,
        cookie: params.cookie,
    };

    match state.store.update_credentials(&update).await {
        Ok(_) => Html(pages::config_saved_page()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Saving config from form failed");
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    if params.name.is_empty() && params.server_name.is_empty() {
        return Html(pages::search_page(None));
    }

    if !state.store.has_cookie().await {
        return Html(pages::search_page(Some(NO_COOKIE)));
    }

    let page = match state
        .service
        .search_user(&params.name, &params.server_name)
        .await
    {
        Ok(user) => pages::search_result_page(&params.name, &params.server_name, Ok(&user)),
        Err(e) => {
            let message = e.to_string();
            pages::search_result_page(&params.name, &params.server_name, Err(&message))
        }
    };
    Html(page)
}

async fn claim_reward(
    State(state): State<AppState>,
    Query(params): Query<ClaimParams>,
) -> ApiResult<String> {
    let id = params
        .id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid request parameter: id"))?;

    let body = state
        .service
        .claim_reward(id)
        .await
        .map_err(|e| ApiError::failed("Claiming reward failed", &e))?;

    Ok(ApiResponse::success(
        "success",
        String::from_utf8_lossy(&body).into_owned(),
    ))
}

async fn reward_list(State(state): State<AppState>) -> ApiResult<Vec<RewardItem>> {
    let rewards = state
        .service
        .list_monthly_rewards()
        .await
        .map_err(|e| ApiError::failed("Listing rewards failed", &e))?;

    Ok(ApiResponse::success("success", rewards))
}

async fn sign_and_claim(State(state): State<AppState>) -> ApiResult<ClaimSummary> {
    let summary = state
        .service
        .sign_in_and_claim_all()
        .await
        .map_err(|e| ApiError::failed("Sign-in and reward claim failed", &e))?;

    Ok(ApiResponse::success("success", summary))
}

async fn bind_info(State(state): State<AppState>) -> ApiResult<Value> {
    let data = state
        .service
        .fetch_bind_info()
        .await
        .map_err(|e| ApiError::failed("Fetching bind info failed", &e))?;

    Ok(ApiResponse::success("success", data))
}
