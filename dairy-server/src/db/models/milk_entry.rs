//! Milk Entry Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::Session;
use surrealdb::RecordId;

use crate::utils::time::DATE_FORMAT;

/// Milk entry ID type
pub type MilkEntryId = RecordId;

/// One delivery event
///
/// `amount` is derived from liters, fat and the customer's base rate and is
/// rewritten whenever liters or fat change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkEntry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MilkEntryId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: RecordId,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub amount: f64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Validated create payload
#[derive(Debug, Clone)]
pub struct MilkEntryCreate {
    pub customer_id: RecordId,
    pub date: NaiveDate,
    pub session: Session,
    pub liters: f64,
    pub fat: f64,
    pub amount: f64,
}

/// Entry joined with its customer's display fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkEntryDetail {
    #[serde(flatten)]
    pub entry: MilkEntry,
    /// `None` when the customer record no longer exists
    pub customer_name: Option<String>,
    pub customer_mobile: Option<String>,
}

impl MilkEntry {
    /// Record id as "milk_entry:xxx"
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Parsed calendar day; `None` for a malformed stored date
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milk_entry_wire_format() {
        let entry: MilkEntry = serde_json::from_str(
            r#"{
                "id": "milk_entry:e1",
                "customerId": "customer:asha",
                "date": "2024-03-02",
                "session": "morning",
                "liters": 5.0,
                "fat": 4.0,
                "amount": 40.0
            }"#,
        )
        .unwrap();
        assert_eq!(entry.customer_id.to_string(), "customer:asha");
        assert_eq!(entry.session, Session::Morning);
        assert_eq!(entry.day(), NaiveDate::from_ymd_opt(2024, 3, 2));

        let detail = MilkEntryDetail {
            entry,
            customer_name: Some("Asha".to_string()),
            customer_mobile: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["customerId"], "customer:asha");
        assert_eq!(json["customerName"], "Asha");
        assert_eq!(json["amount"], 40.0);
    }

    #[test]
    fn test_malformed_day() {
        let entry = MilkEntry {
            id: None,
            customer_id: RecordId::from_table_key("customer", "asha"),
            date: "yesterday".to_string(),
            session: Session::Evening,
            liters: 1.0,
            fat: 1.0,
            amount: 1.0,
            created_at: 0,
            updated_at: 0,
        };
        assert!(entry.day().is_none());
    }
}
