//! Milk Entry Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MilkEntry, MilkEntryCreate};
use crate::utils::time::format_date;
use chrono::NaiveDate;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Optional list filters; `None` matches everything
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub customer_id: Option<RecordId>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct MilkEntryRepository {
    base: BaseRepository,
}

impl MilkEntryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List entries, newest first
    pub async fn find_all(&self, filter: EntryFilter) -> RepoResult<Vec<MilkEntry>> {
        let mut conditions = Vec::new();
        if filter.customer_id.is_some() {
            conditions.push("customerId = $customer");
        }
        if filter.date.is_some() {
            conditions.push("date = $date");
        }

        let mut sql = String::from("SELECT * FROM milk_entry");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC, createdAt DESC");

        let entries: Vec<MilkEntry> = self
            .base
            .db()
            .query(sql)
            .bind(("customer", filter.customer_id))
            .bind(("date", filter.date.map(format_date)))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// All entries of one customer, newest first
    pub async fn find_by_customer(&self, customer_id: &RecordId) -> RepoResult<Vec<MilkEntry>> {
        self.find_all(EntryFilter {
            customer_id: Some(customer_id.clone()),
            date: None,
        })
        .await
    }

    /// Entries whose day lies in `[start, end]` (inclusive), oldest first
    ///
    /// Restricted to one customer when `customer_id` is given.
    pub async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        customer_id: Option<&RecordId>,
    ) -> RepoResult<Vec<MilkEntry>> {
        let sql = if customer_id.is_some() {
            "SELECT * FROM milk_entry WHERE customerId = $customer AND date >= $start AND date <= $end ORDER BY date ASC"
        } else {
            "SELECT * FROM milk_entry WHERE date >= $start AND date <= $end ORDER BY date ASC"
        };

        let entries: Vec<MilkEntry> = self
            .base
            .db()
            .query(sql)
            .bind(("customer", customer_id.cloned()))
            .bind(("start", format_date(start)))
            .bind(("end", format_date(end)))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Find entry by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<MilkEntry>> {
        let entry: Option<MilkEntry> = self.base.db().select(id.clone()).await?;
        Ok(entry)
    }

    /// Create a new entry; `amount` is already computed by the caller
    pub async fn create(&self, data: MilkEntryCreate) -> RepoResult<MilkEntry> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE milk_entry SET
                    customerId = $customer,
                    date = $date,
                    session = $entry_session,
                    liters = $liters,
                    fat = $fat,
                    amount = $amount,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("customer", data.customer_id))
            .bind(("date", format_date(data.date)))
            .bind(("entry_session", data.session.as_str()))
            .bind(("liters", data.liters))
            .bind(("fat", data.fat))
            .bind(("amount", data.amount))
            .bind(("now", now))
            .await?;

        let created: Option<MilkEntry> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create milk entry".to_string()))
    }

    /// Rewrite liters, fat and the recomputed amount together
    pub async fn update_measurements(
        &self,
        id: &RecordId,
        liters: f64,
        fat: f64,
        amount: f64,
    ) -> RepoResult<MilkEntry> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    liters = $liters,
                    fat = $fat,
                    amount = $amount,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("liters", liters))
            .bind(("fat", fat))
            .bind(("amount", amount))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<MilkEntry>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Milk entry {} not found", id)))
    }

    /// Hard delete an entry; returns false when it did not exist
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
}
