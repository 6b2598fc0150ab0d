//! 时间工具函数
//!
//! 所有字符串 → 日期转换统一在 API handler 层完成，
//! billing 与 repository 层只接收 `NaiveDate` / `NaiveDateTime`。

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::{AppError, AppResult, ErrorCode};

/// 存储格式 (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析日期字符串
///
/// 接受 `YYYY-MM-DD` 或 RFC 3339 时间戳；时间戳取本地时区的日历日期。
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|_| invalid_date(value, field))
}

/// 解析查询区间边界
///
/// `YYYY-MM-DD` 取当日 00:00:00；RFC 3339 时间戳保留时分秒 (本地时区)。
pub fn parse_bound(value: &str, field: &str) -> AppResult<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|_| invalid_date(value, field))
}

/// 格式化为存储格式
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 当前本地时间 (只在 HTTP 边界读取墙上时钟)
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn invalid_date(value: &str, field: &str) -> AppError {
    AppError::with_message(
        ErrorCode::MilkEntryInvalidDate,
        format!("Invalid date for {}: {}", field, value),
    )
    .with_detail("field", field)
}
