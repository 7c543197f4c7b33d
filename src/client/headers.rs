use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};

use crate::error::{Error, Result};
use crate::models::Credentials;

/// Name of the session cookie the Risingstones site expects
pub const SESSION_COOKIE: &str = "ff14risingstones";

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Build the headers attached to every Risingstones API call
///
/// # Errors
///
/// Returns `Error::Validation` when the configured user agent or cookie
/// cannot be carried in an HTTP header (control characters, newlines).
///
/// # Examples
///
/// ```
/// use llmaget::client::headers::build_api_headers;
/// use llmaget::models::Credentials;
///
/// let headers = build_api_headers(&Credentials {
///     user_agent: "Mozilla/5.0".to_string(),
///     cookie: "abc".to_string(),
/// })
/// .unwrap();
/// assert_eq!(headers["cookie"], "ff14risingstones=abc");
/// ```
pub fn build_api_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(&credentials.user_agent)
        .map_err(|_| Error::Validation("user agent contains invalid characters".to_string()))?;
    let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", credentials.cookie))
        .map_err(|_| Error::Validation("cookie contains invalid characters".to_string()))?;

    headers.insert(USER_AGENT, user_agent);
    headers.insert(COOKIE, cookie);
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    Ok(headers)
}
