//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) stored under `work_dir/database`.

pub mod models;
pub mod repository;

use std::path::Path;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Indexes for the lookups the API performs on every login and listing
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
DEFINE INDEX IF NOT EXISTS admin_username ON TABLE admin COLUMNS username UNIQUE;
DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
DEFINE INDEX IF NOT EXISTS customer_mobile ON TABLE customer COLUMNS mobile UNIQUE;
DEFINE TABLE IF NOT EXISTS milk_entry SCHEMALESS;
DEFINE INDEX IF NOT EXISTS milk_entry_customer_date ON TABLE milk_entry COLUMNS customerId, date;
"#;

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `path` and select namespace/database
    pub async fn new(path: &Path, namespace: &str, database: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %path.display(), namespace, database, "Database connection established (SurrealDB RocksDB)");

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}
