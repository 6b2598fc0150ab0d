//! Admin Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Admin, AdminCreate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find admin by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Admin>> {
        let admin: Option<Admin> = self.base.db().select(id.clone()).await?;
        Ok(admin)
    }

    /// Find admin by username (case-insensitive, usernames are stored lower-cased)
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let username = username.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE username = $username")
            .bind(("username", username))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Find the admin currently holding a refresh token
    pub async fn find_by_refresh_token(&self, token: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE refreshToken = $refresh")
            .bind(("refresh", token.to_string()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Create a new admin
    pub async fn create(&self, data: AdminCreate) -> RepoResult<Admin> {
        let username = data.username.trim().to_lowercase();

        // Check duplicate username
        if self.find_by_username(&username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                username
            )));
        }

        // Hash password
        let hash_pass = Admin::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE admin SET
                    username = $username,
                    fullName = $full_name,
                    hashPass = $hash_pass,
                    role = $role,
                    refreshToken = NONE,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("username", username))
            .bind(("full_name", data.full_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("now", now))
            .await?;

        let created: Option<Admin> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }

    /// Store (or clear with `None`) the admin's refresh token
    pub async fn set_refresh_token(&self, id: &RecordId, token: Option<String>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET refreshToken = $refresh, updatedAt = $now")
            .bind(("thing", id.clone()))
            .bind(("refresh", token))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Replace the password hash
    pub async fn update_password(&self, id: &RecordId, new_password: &str) -> RepoResult<()> {
        let hash_pass = Admin::hash_password(new_password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET hashPass = $hash_pass, updatedAt = $now RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Admin>>(0)?
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", id)))
    }
}
