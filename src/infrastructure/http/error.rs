//! HTTP Error Handling
//!
//! 业务错误统一转换为 `{errno, error, data}` 信封，errno 与 HTTP 状态码一致

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 500 响应只返回通用信息，细节写日志
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 外部文本拉取失败，上游细节只写日志
const CONTENT_FETCH_FAILED_MESSAGE: &str = "Content fetch failed";

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    GatewayTimeout(String),
    ContentFetchFailed(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::ContentFetchFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errno = status.as_u16() as i32;

        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(errno = errno, error = %detail, "Internal server error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            ApiError::ContentFetchFailed(detail) => {
                tracing::error!(errno = errno, error = %detail, "Content fetch failed");
                CONTENT_FETCH_FAILED_MESSAGE.to_string()
            }
            ApiError::GatewayTimeout(msg) => {
                tracing::error!(errno = errno, error = %msg, "Upstream timeout");
                msg
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                tracing::warn!(errno = errno, error = %msg, "Request rejected");
                msg
            }
        };

        (status, Json(ErrorResponse::new(errno, message))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Unauthorized => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            ApplicationError::Forbidden(msg) => ApiError::Forbidden(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::Timeout(what) => ApiError::GatewayTimeout(format!("{} timed out", what)),
            ApplicationError::ContentFetchFailed(msg) => ApiError::ContentFetchFailed(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
