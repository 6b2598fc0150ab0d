//! Milk Entry API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/v1/milkentry | GET, POST | 管理员 |
//! | /api/v1/milkentry/entries | GET | 管理员 |
//! | /api/v1/milkentry/all-weekly-payouts | GET | 管理员 |
//! | /api/v1/milkentry/{id} | GET, PUT, DELETE | 管理员 |
//! | /api/v1/milkentry/customer-milk-entry | GET | 登录 (客户仅限本人) |
//! | /api/v1/milkentry/summary/weekly | GET | 登录 (客户仅限本人) |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Milk entry router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/milkentry", routes())
}

fn routes() -> Router<ServerState> {
    // 客户可读取自己的记录与周汇总，范围检查在 handler 内
    let read_routes = Router::new()
        .route("/customer-milk-entry", get(handler::list_by_customer))
        .route("/summary/weekly", get(handler::weekly_summary));

    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/entries", get(handler::list))
        .route("/all-weekly-payouts", get(handler::weekly_payouts))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
