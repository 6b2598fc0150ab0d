//! Weekly billing window (Saturday to Friday)

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::utils::time::format_date;

/// Inclusive `[start, end]` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// Whether an entry dated `day` (at 00:00) falls inside the window
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        let at = day.and_time(NaiveTime::MIN);
        self.start <= at && at <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Display label: `"YYYY-MM-DD to YYYY-MM-DD"`
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            format_date(self.start_date()),
            format_date(self.end_date())
        )
    }
}

/// Resolve the billing window for `reference`
///
/// Both explicit bounds are used verbatim. Otherwise the window runs from the
/// most recent Saturday 00:00:00.000 on or before the reference date to the
/// following Friday 23:59:59.999.
pub fn resolve_week(
    reference: NaiveDateTime,
    explicit: Option<(NaiveDateTime, NaiveDateTime)>,
) -> WeekWindow {
    if let Some((start, end)) = explicit {
        return WeekWindow { start, end };
    }

    let today = reference.date();
    // 0 = Sunday … 6 = Saturday
    let dow = today.weekday().num_days_from_sunday();
    let days_since_saturday = (dow + 1) % 7;

    let saturday = today
        .checked_sub_days(Days::new(u64::from(days_since_saturday)))
        .unwrap_or(today);
    let start = saturday.and_time(NaiveTime::MIN);
    let end = start + TimeDelta::days(7) - TimeDelta::milliseconds(1);

    WeekWindow { start, end }
}
