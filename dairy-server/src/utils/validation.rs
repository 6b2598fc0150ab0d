//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! handlers before anything reaches billing or the repositories.

use crate::utils::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Display names: customer full name, admin full name
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: mobile number, username
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Unwrap a required payload field, reporting the field name when missing.
pub fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::required_field(field))
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a quantity or rate: finite and not negative.
pub fn validate_non_negative(value: f64, field: &str, code: ErrorCode) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            code,
            format!("{field} must be a non-negative number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
