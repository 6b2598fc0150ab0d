//! Customer Model

use serde::{Deserialize, Serialize};

/// Billing cadence of a customer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Weekly,
    Monthly,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Default base fat rate for new customers
pub const DEFAULT_BASE_FAT_RATE: f64 = 1.0;

/// Create customer payload
///
/// Fields are optional so that a missing field surfaces as a 400 with the
/// field name instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreate {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub base_fat_rate: Option<f64>,
    pub payment_mode: Option<PaymentMode>,
}

/// Update customer payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub base_fat_rate: Option<f64>,
    pub payment_mode: Option<PaymentMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_mode_default_and_wire_format() {
        assert_eq!(PaymentMode::default(), PaymentMode::Weekly);
        assert_eq!(
            serde_json::to_string(&PaymentMode::Monthly).unwrap(),
            "\"monthly\""
        );
    }

    #[test]
    fn test_customer_create_partial_body() {
        let req: CustomerCreate =
            serde_json::from_str(r#"{"fullName":"Asha","mobile":"9800000000"}"#).unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Asha"));
        assert!(req.base_fat_rate.is_none());
        assert!(req.payment_mode.is_none());
    }
}
