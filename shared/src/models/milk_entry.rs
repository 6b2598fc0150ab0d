//! Milk Entry Model

use serde::{Deserialize, Serialize};

/// Collection session of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Morning,
    Evening,
}

impl Session {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(Self::Morning),
            "evening" => Some(Self::Evening),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }
}

/// Create milk entry payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkEntryCreate {
    pub customer_id: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    pub date: Option<String>,
    pub session: Option<String>,
    pub liters: Option<f64>,
    pub fat: Option<f64>,
}

/// Update milk entry payload; amount is always recomputed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkEntryUpdate {
    pub liters: Option<f64>,
    pub fat: Option<f64>,
}

/// `GET /api/v1/milkentry?customerId&date`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkEntryQuery {
    pub customer_id: Option<String>,
    pub date: Option<String>,
}

/// `GET /api/v1/milkentry/customer-milk-entry?customerId`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEntriesQuery {
    pub customer_id: Option<String>,
}

/// `GET /api/v1/milkentry/summary/weekly?customerId&startDate&endDate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryQuery {
    pub customer_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parse() {
        assert_eq!(Session::parse("morning"), Some(Session::Morning));
        assert_eq!(Session::parse(" Evening "), Some(Session::Evening));
        assert_eq!(Session::parse("night"), None);
    }

    #[test]
    fn test_summary_query_camel_case() {
        let q: WeeklySummaryQuery = serde_json::from_str(
            r#"{"customerId":"customer:a","startDate":"2024-03-02","endDate":"2024-03-08"}"#,
        )
        .unwrap();
        assert_eq!(q.customer_id.as_deref(), Some("customer:a"));
        assert_eq!(q.end_date.as_deref(), Some("2024-03-08"));
    }
}
