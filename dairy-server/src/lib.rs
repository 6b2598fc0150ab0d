//! Dairy Server - 奶站收奶记账服务
//!
//! # 架构概述
//!
//! 管理员录入每位客户早晚两次的送奶记录 (升数、脂肪)，按客户的基础费率
//! 计算金额，并按周六至周五的结算周汇总：
//!
//! - **账单** (`billing`): 金额计算、结算周、周汇总与周结算
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dairy-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── billing/       # 金额与周汇总 (纯函数)
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志、日期、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod middleware;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` 并初始化日志
///
/// 日志级别与目录在 [`Config`] 之前读取，JWT 密钥缺失的警告才能输出
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____        _
   / __ \____ _(_)______  __
  / / / / __ `/ / ___/ / / /
 / /_/ / /_/ / / /  / /_/ /
/_____/\__,_/_/_/   \__, /
                   /____/
    "#
    );
}
