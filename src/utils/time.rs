//! 时间工具
//!
//! 所有时间戳统一使用 Unix 毫秒 (i64, UTC)。
//! 看板与支出汇总的"当天"/"当月"边界在 UTC 下计算。

use chrono::{DateTime, Datelike, Utc};

/// 当前 Unix 毫秒时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 给定时间戳所在 UTC 日历日的边界 `[start, end)` (毫秒)
pub fn day_bounds(at_millis: i64) -> (i64, i64) {
    let dt = DateTime::<Utc>::from_timestamp_millis(at_millis).unwrap_or_else(Utc::now);
    let start = dt
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
        .timestamp_millis();
    (start, start + 86_400_000)
}

/// 给定年月的日历月边界 `[start, end)` (毫秒)
///
/// `month` 为 1-12，非法月份返回 None
pub fn month_bounds(year: i32, month: u32) -> Option<(i64, i64)> {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = chrono::NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some((
        start
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis(),
        end.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis(),
    ))
}

/// 给定时间戳所在 UTC 日历月的边界 `[start, end)` (毫秒)
pub fn current_month_bounds(at_millis: i64) -> (i64, i64) {
    let dt = DateTime::<Utc>::from_timestamp_millis(at_millis).unwrap_or_else(Utc::now);
    month_bounds(dt.year(), dt.month()).expect("current month is always valid")
}

/// 给定年月的上一个月
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let noon = millis(2026, 8, 25, 12, 30, 0);
        let (start, end) = day_bounds(noon);
        assert_eq!(start, millis(2026, 8, 25, 0, 0, 0));
        assert_eq!(end, millis(2026, 8, 26, 0, 0, 0));
        assert!(start <= noon && noon < end);
    }

    #[test]
    fn month_bounds_handle_year_rollover() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, millis(2025, 12, 1, 0, 0, 0));
        assert_eq!(end, millis(2026, 1, 1, 0, 0, 0));
    }

    #[test]
    fn month_bounds_reject_invalid_month() {
        assert!(month_bounds(2026, 0).is_none());
        assert!(month_bounds(2026, 13).is_none());
    }

    #[test]
    fn current_month_contains_its_timestamp() {
        let ts = millis(2026, 2, 28, 23, 59, 59);
        let (start, end) = current_month_bounds(ts);
        assert_eq!(start, millis(2026, 2, 1, 0, 0, 0));
        assert_eq!(end, millis(2026, 3, 1, 0, 0, 0));
    }

    #[test]
    fn previous_month_wraps_january() {
        assert_eq!(previous_month(2026, 1), (2025, 12));
        assert_eq!(previous_month(2026, 8), (2026, 7));
    }
}
