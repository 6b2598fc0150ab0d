//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Accounts
pub mod admin;
pub mod customer;

// Collection
pub mod milk_entry;

// Re-exports
pub use admin::AdminRepository;
pub use customer::CustomerRepository;
pub use milk_entry::{EntryFilter, MilkEntryRepository};

use shared::error::{AppError, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Table names
pub const ADMIN_TABLE: &str = "admin";
pub const CUSTOMER_TABLE: &str = "customer";
pub const MILK_ENTRY_TABLE: &str = "milk_entry";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: parse_record_id("customer", "customer:abc") 或裸 key "abc"
//   - 创建: RecordId::from_table_key("customer", "abc")
//   - CRUD: db.select(id) / DELETE $thing 直接使用 RecordId

/// 解析 API 传入的 ID，接受 "table:key" 或裸 key
///
/// 表名不匹配视为校验错误，避免用客户 ID 访问其他表。
pub fn parse_record_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RepoError::Validation(format!("Empty {} ID", table)));
    }
    if raw.contains(':') {
        let id: RecordId = raw
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", raw)))?;
        if id.table() != table {
            return Err(RepoError::Validation(format!(
                "ID {} does not belong to table {}",
                raw, table
            )));
        }
        return Ok(id);
    }
    Ok(RecordId::from_table_key(table, raw))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
