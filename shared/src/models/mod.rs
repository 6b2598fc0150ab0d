//! Data models
//!
//! Request payloads and enumerations shared between dairy-server and the
//! SPA (via API). Persisted record types live in `dairy-server::db::models`.

pub mod customer;
pub mod milk_entry;

// Re-exports
pub use customer::*;
pub use milk_entry::*;
