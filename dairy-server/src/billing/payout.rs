//! Fleet-wide weekly payout report

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::{to_decimal, to_f64};
use super::week::WeekWindow;
use crate::db::models::{Customer, MilkEntry};

/// Amount owed to one customer for the window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRow {
    pub customer_id: String,
    /// `None` when the customer record no longer exists
    pub customer_name: Option<String>,
    pub total_amount: f64,
    /// `"YYYY-MM-DD to YYYY-MM-DD"`
    pub week_range: String,
    /// Same value as `total_amount`, read by the payout report's profit column
    pub profit: f64,
}

/// Sum entry amounts per customer inside `window` and join customer names
///
/// Customers without entries in the window get no row. An entry whose
/// customer is missing still yields a row, with `customer_name = None`.
/// Rows are ordered by customer id.
pub fn aggregate_payouts(
    entries: &[MilkEntry],
    customers: &[Customer],
    window: &WeekWindow,
) -> Vec<PayoutRow> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for entry in entries {
        if !entry.day().is_some_and(|day| window.contains_day(day)) {
            continue;
        }
        *totals.entry(entry.customer_id.to_string()).or_default() += to_decimal(entry.amount);
    }

    let names: HashMap<String, &str> = customers
        .iter()
        .filter_map(|c| c.id.as_ref().map(|id| (id.to_string(), c.full_name.as_str())))
        .collect();
    let week_range = window.label();

    totals
        .into_iter()
        .map(|(customer_id, total)| {
            let customer_name = names.get(&customer_id).map(|name| name.to_string());
            if customer_name.is_none() {
                tracing::warn!(customer_id = %customer_id, "Payout row references a missing customer");
            }
            let total_amount = to_f64(total);
            PayoutRow {
                customer_id,
                customer_name,
                total_amount,
                week_range: week_range.clone(),
                profit: total_amount,
            }
        })
        .collect()
}
