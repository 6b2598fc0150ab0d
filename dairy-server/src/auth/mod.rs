//! 认证授权模块
//!
//! 提供 JWT 认证和中间件：
//! - [`JwtService`] - 访问/刷新令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_admin`] - 管理员检查中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{
    Claims, CurrentUser, JwtConfig, JwtError, JwtService, ROLE_ADMIN, ROLE_CUSTOMER, ROLE_OWNER,
    TokenKind,
};
pub use middleware::{require_admin, require_auth};
