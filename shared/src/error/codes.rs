//! Unified error codes for the dairy server
//!
//! Error codes are shared between the server and the SPA frontend and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer errors
//! - 4xxx: Milk entry errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh token missing from request
    RefreshTokenRequired = 1005,
    /// Refresh token unknown or failed verification
    RefreshTokenInvalid = 1006,
    /// Admin registration secret mismatch
    AdminSecretInvalid = 1007,
    /// New password equals the current one
    PasswordUnchanged = 1008,
    /// Current password does not match
    CurrentPasswordIncorrect = 1009,
    /// Admin username already taken
    UsernameExists = 1010,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin or owner role required
    AdminRequired = 2002,
    /// Customer tried to read another customer's data
    CustomerScopeViolation = 2003,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Another customer already uses the mobile number
    CustomerMobileExists = 3002,
    /// Base fat rate is negative or not a number
    CustomerInvalidRate = 3003,

    // ==================== 4xxx: Milk entry ====================
    /// Milk entry not found
    MilkEntryNotFound = 4001,
    /// Liters or fat is negative or not a number
    MilkEntryInvalidQuantity = 4002,
    /// Date could not be parsed
    MilkEntryInvalidDate = 4003,
    /// Session is neither morning nor evening
    MilkEntryInvalidSession = 4004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshTokenRequired => "Refresh token is required",
            ErrorCode::RefreshTokenInvalid => "Refresh token is invalid",
            ErrorCode::AdminSecretInvalid => "Invalid admin secret",
            ErrorCode::PasswordUnchanged => "New password must differ from the current one",
            ErrorCode::CurrentPasswordIncorrect => "Current password is incorrect",
            ErrorCode::UsernameExists => "Username already exists",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CustomerScopeViolation => "Customers may only access their own records",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerMobileExists => "Customer with this mobile number already exists",
            ErrorCode::CustomerInvalidRate => "Base fat rate must be a non-negative number",

            // Milk entry
            ErrorCode::MilkEntryNotFound => "Milk entry not found",
            ErrorCode::MilkEntryInvalidQuantity => "Liters and fat must be non-negative numbers",
            ErrorCode::MilkEntryInvalidDate => "Invalid date",
            ErrorCode::MilkEntryInvalidSession => "Session must be morning or evening",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::RefreshTokenRequired),
            1006 => Ok(ErrorCode::RefreshTokenInvalid),
            1007 => Ok(ErrorCode::AdminSecretInvalid),
            1008 => Ok(ErrorCode::PasswordUnchanged),
            1009 => Ok(ErrorCode::CurrentPasswordIncorrect),
            1010 => Ok(ErrorCode::UsernameExists),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::CustomerScopeViolation),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::CustomerMobileExists),
            3003 => Ok(ErrorCode::CustomerInvalidRate),

            // Milk entry
            4001 => Ok(ErrorCode::MilkEntryNotFound),
            4002 => Ok(ErrorCode::MilkEntryInvalidQuantity),
            4003 => Ok(ErrorCode::MilkEntryInvalidDate),
            4004 => Ok(ErrorCode::MilkEntryInvalidSession),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
