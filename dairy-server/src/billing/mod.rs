//! Billing calculations: amounts, the settlement week, weekly summaries
//!
//! Pure functions with no database access and no clock reads:
//! - [`compute_amount`] - liters × fat × base rate, rounded to 2dp
//! - [`resolve_week`] - Saturday 00:00 to Friday 23:59:59.999 window
//! - [`aggregate_week`] - one customer's per-day totals
//! - [`aggregate_payouts`] - amount owed to every customer for the week
//!
//! All sums are accumulated in `Decimal` and converted to `f64` on output.

mod amount;
mod payout;
mod summary;
mod week;


pub use amount::{compute_amount, to_decimal, to_f64};
pub use payout::{PayoutRow, aggregate_payouts};
pub use summary::{DayBucket, WeeklySummary, WeeklyTotal, aggregate_week};
pub use week::{WeekWindow, resolve_week};
