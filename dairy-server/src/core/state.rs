use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{AdminRepository, CustomerRepository, MilkEntryRepository};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝 (`Surreal` 句柄与 `Arc`)，可直接作为 axum State。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 手动构造，通常使用 [`initialize()`](Self::initialize)
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (`work_dir/database`)
    /// 2. 数据库 (RocksDB) 与索引
    /// 3. JWT 服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)?;

        let db_service = DbService::new(&db_dir, &config.db_namespace, &config.db_name)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db_service.db, jwt_service))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn admins(&self) -> AdminRepository {
        AdminRepository::new(self.db.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.db.clone())
    }

    pub fn milk_entries(&self) -> MilkEntryRepository {
        MilkEntryRepository::new(self.db.clone())
    }
}
