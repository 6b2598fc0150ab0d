//! Per-customer weekly summary

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::{to_decimal, to_f64};
use super::week::WeekWindow;
use crate::db::models::MilkEntry;

/// One calendar day of a customer's deliveries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// `YYYY-MM-DD`
    pub day: String,
    pub total_liters: f64,
    pub total_fat: f64,
    pub total_amount: f64,
    pub entries: Vec<MilkEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyTotal {
    pub liters: f64,
    pub fat: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// Ascending by day
    pub daily: Vec<DayBucket>,
    pub weekly_total: WeeklyTotal,
}

#[derive(Default)]
struct DaySums {
    liters: Decimal,
    fat: Decimal,
    amount: Decimal,
    entries: Vec<MilkEntry>,
}

/// Group `customer_id`'s entries inside `window` by day and total them
///
/// Entries of other customers, outside the window, or with an unparseable
/// date are skipped. No matches gives an empty `daily` and zero totals.
pub fn aggregate_week(entries: &[MilkEntry], customer_id: &str, window: &WeekWindow) -> WeeklySummary {
    let mut days: BTreeMap<String, DaySums> = BTreeMap::new();

    for entry in entries {
        if entry.customer_id.to_string() != customer_id {
            continue;
        }
        let Some(day) = entry.day() else {
            tracing::warn!(entry_id = %entry.id_string(), date = %entry.date, "Skipping milk entry with malformed date");
            continue;
        };
        if !window.contains_day(day) {
            continue;
        }

        let sums = days.entry(entry.date.clone()).or_default();
        sums.liters += to_decimal(entry.liters);
        sums.fat += to_decimal(entry.fat);
        sums.amount += to_decimal(entry.amount);
        sums.entries.push(entry.clone());
    }

    let (mut liters, mut fat, mut amount) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    let daily: Vec<DayBucket> = days
        .into_iter()
        .map(|(day, sums)| {
            liters += sums.liters;
            fat += sums.fat;
            amount += sums.amount;
            DayBucket {
                day,
                total_liters: to_f64(sums.liters),
                total_fat: to_f64(sums.fat),
                total_amount: to_f64(sums.amount),
                entries: sums.entries,
            }
        })
        .collect();

    WeeklySummary {
        daily,
        weekly_total: WeeklyTotal {
            liters: to_f64(liters),
            fat: to_f64(fat),
            amount: to_f64(amount),
        },
    }
}
