use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库位于 `database/`) |
/// | PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CORS_ORIGIN | - | 允许的前端来源，未设置时放开 |
/// | ADMIN_SECRET | - | 管理员注册口令，未设置时禁止注册 |
/// | DB_NAMESPACE | dairy | SurrealDB namespace |
/// | DB_NAME | dairy | SurrealDB database |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | BODY_LIMIT_BYTES | 16384 | 请求体上限 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dairy PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 前端来源 (带凭证的 CORS)
    pub cors_origin: Option<String>,
    /// 管理员注册口令
    pub admin_secret: Option<String>,
    pub db_namespace: String,
    pub db_name: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// JSON 请求体上限 (字节)
    pub body_limit_bytes: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("PORT", 8000),
            environment: env_or("ENVIRONMENT", "development"),
            cors_origin: env_opt("CORS_ORIGIN"),
            admin_secret: env_opt("ADMIN_SECRET"),
            db_namespace: env_or("DB_NAMESPACE", "dairy"),
            db_name: env_or("DB_NAME", "dairy"),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            body_limit_bytes: env_parse("BODY_LIMIT_BYTES", 16 * 1024),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),
            jwt: JwtConfig::from_env(),
        }
    }

    /// 使用自定义工作目录和 JWT 配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, jwt: JwtConfig) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.jwt = jwt;
        config
    }

    /// 启动前检查
    ///
    /// 生产环境必须提供合格的 JWT 密钥；开发环境只记录警告
    pub fn validate(&self) -> Result<(), ServerError> {
        if let Err(e) = self.jwt.validate() {
            if self.is_production() {
                return Err(ServerError::Config(e.to_string()));
            }
            tracing::warn!(error = %e, "JWT configuration is not production ready");
        }
        if self.http_port == 0 {
            return Err(ServerError::Config("PORT must be non-zero".to_string()));
        }
        if self.admin_secret.is_none() {
            tracing::info!("ADMIN_SECRET not set, admin registration is disabled");
        }
        Ok(())
    }

    /// 数据库目录: `work_dir/database`
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(access: &str, refresh: &str, ephemeral: bool) -> JwtConfig {
        JwtConfig {
            access_secret: access.to_string(),
            refresh_secret: refresh.to_string(),
            access_expiration_minutes: 60,
            refresh_expiration_minutes: 600,
            issuer: "dairy-server".to_string(),
            audience: "dairy-spa".to_string(),
            ephemeral,
        }
    }

    #[test]
    fn test_database_dir() {
        let config = Config::with_overrides("/tmp/dairy", jwt(&"a".repeat(40), &"r".repeat(40), false));
        assert_eq!(config.database_dir(), PathBuf::from("/tmp/dairy/database"));
    }

    #[test]
    fn test_production_requires_jwt_secrets() {
        let mut config = Config::with_overrides("/tmp/dairy", jwt("short", "short", true));
        config.environment = "production".to_string();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.jwt = jwt(&"a".repeat(40), &"r".repeat(40), false);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_tolerates_generated_secrets() {
        let mut config = Config::with_overrides("/tmp/dairy", jwt("short", "short", true));
        config.environment = "development".to_string();
        config.http_port = 8000;
        assert!(config.validate().is_ok());
    }
}
