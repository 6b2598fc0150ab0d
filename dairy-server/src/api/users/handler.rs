//! User & Session Handlers
//!
//! Handles registration, login, token rotation and password changes

use std::time::Duration;

use axum::{Json, extract::State};
use http::StatusCode;
use surrealdb::RecordId;

use crate::auth::{CurrentUser, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::core::ServerState;
use crate::db::models::{Admin, AdminCreate, Customer};
use crate::db::repository::{ADMIN_TABLE, CUSTOMER_TABLE, RepoError, parse_record_id};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, created, ok_with_message};

use shared::client::{
    ChangePasswordRequest, CustomerLoginRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, RegisterAdminRequest, TokenPair, UserInfo,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn admin_info(admin: &Admin) -> UserInfo {
    UserInfo {
        id: admin.id_string(),
        username: admin.username.clone(),
        full_name: admin.full_name.clone(),
        role: admin.role.clone(),
    }
}

fn customer_info(customer: &Customer) -> UserInfo {
    UserInfo {
        id: customer.id_string(),
        username: customer.mobile.clone(),
        full_name: customer.full_name.clone(),
        role: ROLE_CUSTOMER.to_string(),
    }
}

/// Account table a token subject lives in
fn account_id(user_id: &str, role: &str) -> AppResult<RecordId> {
    let table = if role == ROLE_CUSTOMER {
        CUSTOMER_TABLE
    } else {
        ADMIN_TABLE
    };
    parse_record_id(table, user_id).map_err(|_| AppError::invalid_token("Malformed token subject"))
}

/// Sign a fresh access/refresh pair for `user`
fn issue_tokens(state: &ServerState, user: &UserInfo) -> AppResult<TokenPair> {
    let jwt = state.get_jwt_service();
    let access_token = jwt
        .generate_access_token(&user.id, &user.full_name, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let refresh_token = jwt
        .generate_refresh_token(&user.id, &user.full_name, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Persist the refresh token on whichever account owns it
async fn store_refresh_token(
    state: &ServerState,
    user: &UserInfo,
    token: Option<String>,
) -> AppResult<()> {
    let id = account_id(&user.id, &user.role)?;
    if user.role == ROLE_CUSTOMER {
        state.customers().set_refresh_token(&id, token).await?;
    } else {
        state.admins().set_refresh_token(&id, token).await?;
    }
    Ok(())
}

async fn start_session(state: &ServerState, user: UserInfo) -> AppResult<LoginResponse> {
    let tokens = issue_tokens(state, &user)?;
    store_refresh_token(state, &user, Some(tokens.refresh_token.clone())).await?;
    Ok(LoginResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    })
}

/// Register an admin account
///
/// Gated by `ADMIN_SECRET`; registration is disabled when it is unset
pub async fn register_admin(
    State(state): State<ServerState>,
    Json(req): Json<RegisterAdminRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let secret_ok = state.config.admin_secret.as_deref().is_some_and(|expected| {
        ring::constant_time::verify_slices_are_equal(expected.as_bytes(), req.secret.as_bytes())
            .is_ok()
    });
    if !secret_ok {
        security_log!("WARN", "admin_register_rejected", username = req.username.clone());
        return Err(AppError::new(ErrorCode::AdminSecretInvalid));
    }

    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.full_name, "fullName", MAX_NAME_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let admin = state
        .admins()
        .create(AdminCreate {
            username: req.username,
            full_name: req.full_name,
            password: req.password,
            role: ROLE_ADMIN.to_string(),
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::UsernameExists),
            other => other.into(),
        })?;

    tracing::info!(admin_id = %admin.id_string(), username = %admin.username, "Admin registered");

    Ok(created(admin_info(&admin), "Admin Registered Successfully"))
}

/// Admin/owner login
///
/// Unknown usernames and wrong passwords produce the same error
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let admin = state.admins().find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let admin = match admin {
        Some(admin) => {
            let password_valid = admin
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!("WARN", "login_failed", username = req.username.clone(), reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            admin
        }
        None => {
            security_log!("WARN", "login_failed", username = req.username.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    let session = start_session(&state, admin_info(&admin)).await?;

    tracing::info!(
        user_id = %session.user.id,
        username = %admin.username,
        role = %admin.role,
        "User logged in successfully"
    );

    Ok(ok_with_message(session, "Login Successful"))
}

/// Customer login by mobile number
pub async fn login_customer(
    State(state): State<ServerState>,
    Json(req): Json<CustomerLoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    validate_required_text(&req.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;

    let customer = state
        .customers()
        .find_by_mobile(req.mobile.trim())
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::CustomerNotFound, "Customer not found"))?;

    let session = start_session(&state, customer_info(&customer)).await?;

    tracing::info!(customer_id = %session.user.id, "Customer logged in");

    Ok(ok_with_message(session, "Customer Login Successful"))
}

/// Rotate the token pair
///
/// The presented refresh token must verify and still be the one stored on
/// the account it names
pub async fn refresh_token(
    State(state): State<ServerState>,
    Json(req): Json<RefreshTokenRequest>,
) -> AppResult<Json<ApiResponse<TokenPair>>> {
    let token = req
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenRequired))?;

    let claims = state.get_jwt_service().validate_refresh_token(&token).map_err(|e| {
        security_log!("WARN", "refresh_failed", error = format!("{}", e));
        AppError::new(ErrorCode::RefreshTokenInvalid)
    })?;

    let holder = if claims.role == ROLE_CUSTOMER {
        state
            .customers()
            .find_by_refresh_token(&token)
            .await?
            .map(|c| customer_info(&c))
    } else {
        state
            .admins()
            .find_by_refresh_token(&token)
            .await?
            .map(|a| admin_info(&a))
    };

    let user = match holder {
        Some(user) if user.id == claims.sub => user,
        _ => {
            security_log!("WARN", "refresh_token_not_held", user_id = claims.sub.clone());
            return Err(AppError::new(ErrorCode::RefreshTokenInvalid));
        }
    };

    let tokens = issue_tokens(&state, &user)?;
    store_refresh_token(&state, &user, Some(tokens.refresh_token.clone())).await?;

    tracing::debug!(user_id = %user.id, "Token pair rotated");

    Ok(ok_with_message(tokens, "Access Token Refreshed"))
}

/// Logout handler - clears the stored refresh token
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = account_id(&user.id, &user.role)?;
    if user.is_customer() {
        state.customers().set_refresh_token(&id, None).await?;
    } else {
        state.admins().set_refresh_token(&id, None).await?;
    }

    tracing::info!(user_id = %user.id, "User logged out");

    Ok(Json(ApiResponse::success_with_message("Logout Successful", ())))
}

/// Get current account profile
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let id = account_id(&user.id, &user.role)?;
    let info = if user.is_customer() {
        state.customers().find_by_id(&id).await?.map(|c| customer_info(&c))
    } else {
        state.admins().find_by_id(&id).await?.map(|a| admin_info(&a))
    };

    let info = info.ok_or_else(|| AppError::not_found(format!("User {}", user.id)))?;
    Ok(ok_with_message(info, "User retrieved"))
}

/// Change password (admin/owner)
pub async fn change_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&req.current_password, "currentPassword", MAX_PASSWORD_LEN)?;
    validate_required_text(&req.new_password, "newPassword", MAX_PASSWORD_LEN)?;
    if req.current_password == req.new_password {
        return Err(AppError::new(ErrorCode::PasswordUnchanged));
    }

    let id = account_id(&user.id, &user.role)?;
    let repo = state.admins();
    let admin = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", user.id)))?;

    let matches = admin
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !matches {
        security_log!("WARN", "change_password_failed", user_id = user.id.clone());
        return Err(AppError::new(ErrorCode::CurrentPasswordIncorrect));
    }

    repo.update_password(&id, &req.new_password).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(ApiResponse::success_with_message(
        "Password updated successfully",
        (),
    )))
}
