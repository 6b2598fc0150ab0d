//! Customer Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{DEFAULT_BASE_FAT_RATE, PaymentMode};
use surrealdb::RecordId;

/// Customer ID type
pub type CustomerId = RecordId;

/// Milk supplier; logs in with the mobile number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CustomerId>,
    pub full_name: String,
    /// Unique among customers
    pub mobile: String,
    #[serde(
        default = "default_base_fat_rate",
        deserialize_with = "serde_helpers::base_rate"
    )]
    pub base_fat_rate: f64,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default, skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_base_fat_rate() -> f64 {
    DEFAULT_BASE_FAT_RATE
}

/// Validated create payload
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub full_name: String,
    pub mobile: String,
    pub base_fat_rate: f64,
    pub payment_mode: PaymentMode,
}

/// Validated update payload; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub base_fat_rate: Option<f64>,
    pub payment_mode: Option<PaymentMode>,
}

impl Customer {
    /// Record id as "customer:xxx"
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_defaults() {
        let customer: Customer =
            serde_json::from_str(r#"{"fullName":"Asha","mobile":"9800000000"}"#).unwrap();
        assert_eq!(customer.base_fat_rate, 1.0);
        assert_eq!(customer.payment_mode, PaymentMode::Weekly);
        assert!(customer.id.is_none());
        assert_eq!(customer.id_string(), "");
    }

    #[test]
    fn test_customer_serialize() {
        let customer = Customer {
            id: Some(RecordId::from_table_key("customer", "asha")),
            full_name: "Asha".to_string(),
            mobile: "9800000000".to_string(),
            base_fat_rate: 7.5,
            payment_mode: PaymentMode::Monthly,
            refresh_token: Some("t".to_string()),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], "customer:asha");
        assert_eq!(json["baseFatRate"], 7.5);
        assert_eq!(json["paymentMode"], "monthly");
        assert!(json.get("refreshToken").is_none());
    }
}
