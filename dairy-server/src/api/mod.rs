//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 登录、注册、令牌管理
//! - [`customers`] - 客户管理接口
//! - [`milk_entries`] - 送奶记录、周汇总与周结算

pub mod customers;
pub mod health;
pub mod milk_entries;
pub mod users;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::middleware::logging_middleware;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Users API - login/register public, others authenticated
        .merge(users::router())
        // Customer API - admin only
        .merge(customers::router())
        // Milk entry API - authenticated, mostly admin only
        .merge(milk_entries::router())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origin) = config.cors_origin.as_deref() else {
        return CorsLayer::permissive();
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Invalid CORS_ORIGIN, falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests (`oneshot`)
pub fn build_app(state: ServerState) -> Router {
    let config = state.config.clone();

    build_router()
        // ========== Application Middleware ==========
        // Request logging - sees the authenticated user
        .layer(axum_middleware::from_fn(logging_middleware))
        // JWT authentication - require_auth skips public routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state)
        // ========== Tower HTTP Middleware ==========
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // CORS - Handle cross-origin requests
        .layer(cors_layer(&config))
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
