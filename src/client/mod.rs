//! HTTP client for the Risingstones community API
//!
//! Every call:
//! - refuses to run without a configured cookie (`Error::Auth`, no request sent)
//! - carries the configured User-Agent and the `ff14risingstones` session cookie
//! - adds a fresh `tempsuid` correlation token to the query string
//! - is bounded by a per-request timeout and retried with backoff when no
//!   response came back at all
//!
//! The client does not interpret payloads. It returns the status code and the
//! raw body; decoding is up to the caller.

pub mod error;
pub mod headers;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Settings, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::store::ConfigStore;
use crate::utils::retry::{with_retry_if, RetryConfig};
use crate::utils::truncate_text;

pub use error::TransportError;
use headers::build_api_headers;

/// Remote endpoints used by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UserInfo,
    BindInfo,
    SignIn,
    RewardList,
    ClaimReward,
    Search,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::UserInfo => "/api/home/userInfo/getUserInfo",
            Self::BindInfo => "/api/home/groupAndRole/getCharacterBindInfo",
            Self::SignIn => "/api/home/sign/signIn",
            Self::RewardList => "/api/home/sign/signRewardList",
            Self::ClaimReward => "/api/home/sign/getSignReward",
            Self::Search => "/api/common/search",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::SignIn | Self::ClaimReward => Method::POST,
            Self::UserInfo | Self::BindInfo | Self::RewardList | Self::Search => Method::GET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::UserInfo => "user_info",
            Self::BindInfo => "bind_info",
            Self::SignIn => "sign_in",
            Self::RewardList => "reward_list",
            Self::ClaimReward => "claim_reward",
            Self::Search => "search",
        }
    }
}

/// Status code and body of a remote call
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-2xx answer into `Error::Status`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                status: self.status.as_u16(),
                body: truncate_text(&self.text(), 500),
            })
        }
    }
}

/// Client construction parameters
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme + host, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry policy for transport failures
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.client.base_url.clone(),
            timeout: settings.request_timeout(),
            retry: settings.retry(),
        }
    }

    /// Same defaults, different host (used against mock servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Authenticated client for the Risingstones API
pub struct RisingStonesClient {
    /// HTTP client with configured timeout and compression
    http: Client,

    /// Scheme + host
    base_url: String,

    /// Retry policy for transport failures
    retry: RetryConfig,

    /// Source of the cookie and user agent for each call
    store: Arc<ConfigStore>,
}

impl RisingStonesClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` for an unusable base URL and
    /// `TransportError::Http` if the HTTP client cannot be created
    pub fn new(config: ClientConfig, store: Arc<ConfigStore>) -> std::result::Result<Self, TransportError> {
        let parsed = url::Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if parsed.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(config.base_url));
        }

        let http = Client::builder().timeout(config.timeout).gzip(true).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
            store,
        })
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Call an endpoint with extra query parameters and an optional JSON body
    ///
    /// # Errors
    ///
    /// - `Error::Auth` when no cookie is configured (nothing is sent)
    /// - `Error::Validation` when the credentials cannot form valid headers
    /// - `Error::Transport` when no response arrived within the retry budget
    pub async fn call(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let credentials = self.store.credentials().await;
        if !credentials.has_cookie() {
            warn!(endpoint = endpoint.name(), "Cookie not configured, skipping request");
            return Err(Error::Auth);
        }

        let headers = build_api_headers(&credentials)?;
        let url = self.url(endpoint);
        let method = endpoint.method();

        let mut params: Vec<(&str, String)> = Vec::with_capacity(query.len() + 1);
        params.push(("tempsuid", Uuid::new_v4().to_string()));
        params.extend(query.iter().cloned());

        debug!(endpoint = endpoint.name(), %method, url = %url, "Sending request");

        let result = with_retry_if(
            &self.retry,
            || {
                let mut request = self
                    .http
                    .request(method.clone(), &url)
                    .headers(headers.clone())
                    .query(&params);
                if let Some(body) = body {
                    request = request.json(body);
                }

                async move {
                    let response = request.send().await.map_err(TransportError::from_reqwest)?;
                    let status = response.status();
                    let bytes = response.bytes().await.map_err(TransportError::from_reqwest)?;
                    Ok::<_, TransportError>(RawResponse {
                        status,
                        body: bytes.to_vec(),
                    })
                }
            },
            TransportError::is_retryable,
        )
        .await;

        match result {
            Ok(response) => {
                info!(
                    endpoint = endpoint.name(),
                    status = response.status.as_u16(),
                    bytes = response.body.len(),
                    "Received response"
                );
                Ok(response)
            }
            Err(exhausted) if exhausted.gave_up_early => Err(exhausted.last_error.into()),
            Err(exhausted) => Err(TransportError::MaxRetriesExceeded {
                attempts: exhausted.attempts,
                last: exhausted.last_error.to_string(),
            }
            .into()),
        }
    }

    pub async fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<RawResponse> {
        self.call(endpoint, query, None).await
    }

    pub async fn post(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        self.call(endpoint, query, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::SignIn.method(), Method::POST);
        assert_eq!(Endpoint::ClaimReward.method(), Method::POST);
        assert_eq!(Endpoint::UserInfo.method(), Method::GET);
        assert_eq!(Endpoint::Search.method(), Method::GET);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let store = Arc::new(ConfigStore::new("c.json", "r.json"));
        let result = RisingStonesClient::new(ClientConfig::with_base_url("not a url"), store);
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = Arc::new(ConfigStore::new("c.json", "r.json"));
        let client =
            RisingStonesClient::new(ClientConfig::with_base_url("http://localhost:1/"), store)
                .unwrap();
        assert_eq!(
            client.url(Endpoint::SignIn),
            "http://localhost:1/api/home/sign/signIn"
        );
    }

    #[test]
    fn test_error_for_status() {
        let ok = RawResponse {
            status: StatusCode::OK,
            body: b"{}".to_vec(),
        };
        assert!(ok.error_for_status().is_ok());

        let bad = RawResponse {
            status: StatusCode::BAD_GATEWAY,
            body: b"upstream".to_vec(),
        };
        let err = bad.error_for_status().unwrap_err();
        assert!(matches!(err, Error::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_missing_cookie_fails_before_sending() {
        let store = Arc::new(ConfigStore::new("c.json", "r.json"));
        let client =
            RisingStonesClient::new(ClientConfig::with_base_url("http://127.0.0.1:9"), store)
                .unwrap();

        let err = client.get(Endpoint::UserInfo, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Auth));
    }
}
