//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod admin;
pub mod customer;

// Collection
pub mod milk_entry;

// Re-exports
pub use admin::*;
pub use customer::*;
pub use milk_entry::*;
