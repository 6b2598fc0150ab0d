//! Admin Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Admin ID type
pub type AdminId = RecordId;

/// Administrative account (username/password login)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AdminId>,
    /// Lower-cased, unique
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// admin | owner
    pub role: String,
    #[serde(default, skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create admin payload (password is still plain text here)
#[derive(Debug, Clone)]
pub struct AdminCreate {
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub role: String,
}

impl Admin {
    /// Record id as "admin:xxx"
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = Admin::hash_password("s3cret-pass").unwrap();
        let admin = Admin {
            id: None,
            username: "ravi".to_string(),
            full_name: "Ravi K".to_string(),
            hash_pass: hash,
            role: "admin".to_string(),
            refresh_token: Some("token".to_string()),
            created_at: 0,
            updated_at: 0,
        };

        assert!(admin.verify_password("s3cret-pass").unwrap());
        assert!(!admin.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let admin = Admin {
            id: Some(RecordId::from_table_key("admin", "ravi")),
            username: "ravi".to_string(),
            full_name: "Ravi K".to_string(),
            hash_pass: "hash".to_string(),
            role: "owner".to_string(),
            refresh_token: Some("token".to_string()),
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json["id"], "admin:ravi");
        assert_eq!(json["fullName"], "Ravi K");
        assert!(json.get("hashPass").is_none());
        assert!(json.get("refreshToken").is_none());
    }
}
