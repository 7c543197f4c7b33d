//! `{code, msg, data}` response envelope
//!
//! Success responses carry [`SUCCESS_CODE`]; error responses reuse the HTTP
//! status as `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::{Error, ErrorCategory};
use crate::models::SUCCESS_CODE;

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i64,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: msg.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<Value> {
    /// Success without a payload
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: msg.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error half of the envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    msg: String,
    data: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map a domain error, prefixing the message with what was being done
    pub fn from_error(action: &str, err: &Error) -> Self {
        let status = status_for(err.category());
        if status.is_server_error() {
            error!(action, error = %err, "Request failed");
        } else {
            warn!(action, error = %err, "Request rejected");
        }

        let mut api_error = Self::new(status, format!("{action}: {err}"));
        if let Some(data) = err.claim_summary().and_then(|s| serde_json::to_value(s).ok()) {
            api_error = api_error.with_data(data);
        }
        api_error
    }

    /// Failure of a remote operation, reported as 500 whatever the cause
    pub fn failed(action: &str, err: &Error) -> Self {
        let mut api_error = Self::from_error(action, err);
        api_error.status = StatusCode::INTERNAL_SERVER_ERROR;
        api_error
    }
}

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Auth | ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Network
        | ErrorCategory::Data
        | ErrorCategory::Storage
        | ErrorCategory::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            code: i64::from(self.status.as_u16()),
            msg: self.msg,
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<ApiResponse<T>, ApiError>;
