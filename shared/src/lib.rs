//! Shared types for the dairy collection server
//!
//! Common types used across crates: the unified error system, API
//! request/response DTOs and small utilities.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
