//! 请求日志中间件
//!
//! 记录所有进入的 HTTP 请求，包含用户信息、状态码和耗时

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// 请求日志中间件
///
/// 请求结束时记录一条日志：
/// - 请求 ID (x-request-id)
/// - HTTP 方法和匹配的路由
/// - 认证用户 (如果存在)
/// - 响应状态码与延迟 (毫秒)
///
/// 5xx 与 4xx 使用 WARN 级别
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{}({})", u.name, u.id));

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request completed with server error");
    } else if response.status().is_client_error() {
        warn!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request completed with client error");
    } else {
        info!(request_id = %request_id, method = %method, path = %path, status, latency_ms, user = ?user, "Request completed");
    }

    response
}
