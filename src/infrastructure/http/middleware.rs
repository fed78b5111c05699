//! HTTP Middleware
//!
//! 请求结果日志：带上调用者身份与耗时

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::StatusCode;

use super::auth::USER_ID_HEADER;

/// 静态文件路由前缀
const FILES_PREFIX: &str = "/files";

/// 响应状态日志中间件
///
/// 4xx 记 warn，5xx 记 error；`/files` 下的 404 只记 debug。
/// 错误详情由 ApiError::into_response() 负责。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            user_id = %user_id,
            status = status.as_u16(),
            elapsed_ms,
            "Request failed"
        );
    } else if status == StatusCode::NOT_FOUND && path.starts_with(FILES_PREFIX) {
        tracing::debug!(path = %path, "Stored object not found");
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            user_id = %user_id,
            status = status.as_u16(),
            elapsed_ms,
            "Request rejected"
        );
    }

    response
}
