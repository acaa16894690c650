//! HTTP Middleware
//!
//! 请求错误与慢请求日志

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

/// 超过该时长的请求记为慢请求（合成与翻译都走外部网络）
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(3);

/// HTTP 状态码错误日志中间件
///
/// 状态码为 4xx/5xx 或耗时过长时记录日志；
/// 业务失败（`success: false`）在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "HTTP client error"
        );
    } else if started.elapsed() > SLOW_REQUEST_THRESHOLD {
        tracing::warn!(method = %method, uri = %uri, latency_ms, "Slow HTTP request");
    }

    response
}
