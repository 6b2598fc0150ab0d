//! Client-related types shared between server and SPA
//!
//! Request/response bodies of the `/api/v1/users` endpoints. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Admin login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Customer login request (mobile number is the credential)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerLoginRequest {
    pub mobile: String,
}

/// Admin registration request, gated by the server's admin secret
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub secret: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Login / refresh response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
}

/// Token pair returned by refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authenticated principal, admin or customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    /// Username for admins, mobile number for customers
    pub username: String,
    pub full_name: String,
    /// admin | owner | customer
    pub role: String,
}
