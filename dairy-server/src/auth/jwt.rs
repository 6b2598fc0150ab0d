//! JWT 令牌服务
//!
//! 处理访问令牌 (access) 和刷新令牌 (refresh) 的生成、验证和解析。
//! 两种令牌使用独立的密钥和过期时间，互相不可替代。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 角色: 管理员
pub const ROLE_ADMIN: &str = "admin";
/// 角色: 场主 (与管理员同权)
pub const ROLE_OWNER: &str = "owner";
/// 角色: 客户 (奶农)
pub const ROLE_CUSTOMER: &str = "customer";

/// 密钥最小长度
const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// 访问令牌密钥
    pub access_secret: String,
    /// 刷新令牌密钥
    pub refresh_secret: String,
    /// 访问令牌过期时间 (分钟)
    pub access_expiration_minutes: i64,
    /// 刷新令牌过期时间 (分钟)
    pub refresh_expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
    /// 任一密钥是否为临时生成 (生产环境不允许)
    #[serde(skip)]
    pub ephemeral: bool,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// 未设置的密钥会临时生成并记录警告；生产环境由 [`Config::validate`]
    /// 拒绝启动。
    ///
    /// [`Config::validate`]: crate::core::Config::validate
    pub fn from_env() -> Self {
        let (access_secret, access_generated) = load_secret("ACCESS_TOKEN_SECRET");
        let (refresh_secret, refresh_generated) = load_secret("REFRESH_TOKEN_SECRET");

        Self {
            access_secret,
            refresh_secret,
            access_expiration_minutes: std::env::var("ACCESS_TOKEN_EXPIRY_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            refresh_expiration_minutes: std::env::var("REFRESH_TOKEN_EXPIRY_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(14400), // 默认 10 天
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dairy-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dairy-spa".to_string()),
            ephemeral: access_generated || refresh_generated,
        }
    }

    /// 检查密钥是否满足生产要求
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.ephemeral {
            return Err(JwtError::ConfigError(
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must be set".to_string(),
            ));
        }
        if self.access_secret.len() < MIN_SECRET_LEN || self.refresh_secret.len() < MIN_SECRET_LEN
        {
            return Err(JwtError::ConfigError(format!(
                "token secrets must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }
        if self.access_secret == self.refresh_secret {
            return Err(JwtError::ConfigError(
                "access and refresh token secrets must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 读取密钥，缺失时生成临时密钥 (返回值第二项为 true)
fn load_secret(var: &str) -> (String, bool) {
    match std::env::var(var) {
        Ok(secret) if !secret.is_empty() => {
            if secret.len() < MIN_SECRET_LEN {
                tracing::warn!(variable = var, "Token secret is shorter than 32 characters");
            }
            (secret, false)
        }
        _ => {
            tracing::warn!(
                variable = var,
                "⚠️  Token secret not set! Generating temporary key, tokens will not survive a restart."
            );
            (generate_secure_printable_jwt_secret(), true)
        }
    }
}

/// 令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 账号 ID (`admin:xxx` 或 `customer:xxx`)
    pub sub: String,
    /// 显示名称
    pub name: String,
    /// admin | owner | customer
    pub role: String,
    /// access | refresh
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌类型错误: 期望 {expected}")]
    WrongTokenType { expected: &'static str },

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.~+=";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        tracing::error!("System RNG unavailable, falling back to time-seeded development key");
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        return format!("dairy-dev-key-{}-must-be-replaced", nanos);
    }

    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            config,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(
        &self,
        user_id: &str,
        name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.issue(TokenKind::Access, user_id, name, role)
    }

    /// 生成刷新令牌
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.issue(TokenKind::Refresh, user_id, name, role)
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: &str,
        name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let (minutes, key) = match kind {
            TokenKind::Access => (self.config.access_expiration_minutes, &self.access_encoding),
            TokenKind::Refresh => (self.config.refresh_expiration_minutes, &self.refresh_encoding),
        };
        let expiration = now + Duration::minutes(minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            token_type: kind.as_str().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证访问令牌
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(TokenKind::Access, token)
    }

    /// 验证刷新令牌
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(TokenKind::Refresh, token)
    }

    fn validate(&self, kind: TokenKind, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        let token_data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
            _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
        })?;

        if token_data.claims.token_type != kind.as_str() {
            return Err(JwtError::WrongTokenType {
                expected: kind.as_str(),
            });
        }

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
///
/// # 示例
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.is_customer() {
///         // 只能查看自己的记录
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 账号 ID
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 角色名称
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否管理员 (admin 或 owner)
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_OWNER
    }

    /// 是否客户账号
    pub fn is_customer(&self) -> bool {
        self.role == ROLE_CUSTOMER
    }

    /// 能否读取指定客户的数据
    ///
    /// 管理员可读取所有客户；客户只能读取自己
    pub fn can_access_customer(&self, customer_id: &str) -> bool {
        self.is_admin() || (self.is_customer() && self.id == customer_id)
    }
}
