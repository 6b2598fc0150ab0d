//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all customers ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer ORDER BY fullName")
            .await?
            .take(0)?;
        Ok(customers)
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Customer>> {
        let customer: Option<Customer> = self.base.db().select(id.clone()).await?;
        Ok(customer)
    }

    /// Find customer by mobile number
    pub async fn find_by_mobile(&self, mobile: &str) -> RepoResult<Option<Customer>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE mobile = $mobile")
            .bind(("mobile", mobile.trim().to_string()))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Find the customer currently holding a refresh token
    pub async fn find_by_refresh_token(&self, token: &str) -> RepoResult<Option<Customer>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE refreshToken = $refresh")
            .bind(("refresh", token.to_string()))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create a new customer
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let mobile = data.mobile.trim().to_string();

        // Check duplicate mobile
        if self.find_by_mobile(&mobile).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Customer with mobile '{}' already exists",
                mobile
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE customer SET
                    fullName = $full_name,
                    mobile = $mobile,
                    baseFatRate = $base_fat_rate,
                    paymentMode = $payment_mode,
                    refreshToken = NONE,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("full_name", data.full_name.trim().to_string()))
            .bind(("mobile", mobile))
            .bind(("base_fat_rate", data.base_fat_rate))
            .bind(("payment_mode", data.payment_mode.as_str()))
            .bind(("now", now))
            .await?;

        let created: Option<Customer> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    /// Update a customer; absent fields keep their stored value
    pub async fn update(&self, id: &RecordId, data: CustomerUpdate) -> RepoResult<Customer> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))?;

        let mobile = data.mobile.map(|m| m.trim().to_string());

        // Check duplicate mobile if changing
        if let Some(ref new_mobile) = mobile
            && new_mobile != &existing.mobile
            && self.find_by_mobile(new_mobile).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Customer with mobile '{}' already exists",
                new_mobile
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    fullName = $full_name OR fullName,
                    mobile = $mobile OR mobile,
                    baseFatRate = IF $has_rate THEN $base_fat_rate ELSE baseFatRate END,
                    paymentMode = $payment_mode OR paymentMode,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("full_name", data.full_name.map(|n| n.trim().to_string())))
            .bind(("mobile", mobile))
            .bind(("has_rate", data.base_fat_rate.is_some()))
            .bind(("base_fat_rate", data.base_fat_rate))
            .bind(("payment_mode", data.payment_mode.map(|m| m.as_str())))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Customer>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))
    }

    /// Hard delete a customer; returns false when it did not exist
    ///
    /// Milk entries are left in place and surface as unresolved payout rows.
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await?
            .check()?;
        Ok(true)
    }

    /// Store (or clear with `None`) the customer's refresh token
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
}
