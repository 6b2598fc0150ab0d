//! 统一错误处理
//!
//! 错误类型与响应结构统一来自 `shared::error`，这里只补充 handler 常用的
//! 响应构造函数。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::customer_not_found(&id))
//!
//! // 返回成功响应
//! Ok(ok(customer))
//! ```

use axum::{
    Json,
    http::StatusCode,
};
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// 成功响应 (200)
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 带自定义消息的成功响应 (200)
pub fn ok_with_message<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

/// 创建成功响应 (201)
pub fn created<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(message, data)),
    )
}
