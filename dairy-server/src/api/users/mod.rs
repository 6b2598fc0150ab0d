//! User & Session API Module
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/v1/users/register-admin | POST | 注册口令 |
//! | /api/v1/users/login | POST | 无 |
//! | /api/v1/users/login-customer | POST | 无 |
//! | /api/v1/users/refresh-token | POST | 刷新令牌 |
//! | /api/v1/users/logout | POST | 登录 |
//! | /api/v1/users/me | GET | 登录 |
//! | /api/v1/users/change-password | POST | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Users router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/users", routes())
}

fn routes() -> Router<ServerState> {
    // 公共路由：require_auth 按路径放行
    let public_routes = Router::new()
        .route("/register-admin", post(handler::register_admin))
        .route("/login", post(handler::login))
        .route("/login-customer", post(handler::login_customer))
        .route("/refresh-token", post(handler::refresh_token));

    let session_routes = Router::new()
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me));

    let admin_routes = Router::new()
        .route("/change-password", post(handler::change_password))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(session_routes).merge(admin_routes)
}
