use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

static STRICT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date pattern"));

/// 解析日期或時間戳，只保留日曆日（時間部分直接截斷）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    // Postgres 風格的 "2024-01-05 10:00:00+00"
    match value.as_bytes().get(10) {
        Some(b'T') | Some(b' ') => {
            NaiveDate::parse_from_str(&value[..10], ISO_DATE_FORMAT).ok()
        }
        _ => None,
    }
}

/// `DD/MM/YYYY`；缺值回傳空字串，無法解析時原樣輸出
pub fn format_date(value: Option<&str>) -> String {
    match value.map(str::trim) {
        None | Some("") => String::new(),
        Some(raw) => parse_date(raw)
            .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

/// Formats a value only when it is exactly `YYYY-MM-DD` and a real calendar date.
pub fn format_strict_date(field: &str, value: &str) -> Result<String> {
    let malformed = || ReportError::MalformedDateValue {
        field: field.to_string(),
        value: value.to_string(),
    };

    if !STRICT_DATE.is_match(value) {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .map_err(|_| malformed())
}

/// Whole calendar days from `today` until `expiry`. Negative once expired.
pub fn days_left(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Inclusive span, e.g. a leave from Monday to Friday is 5 days.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days() + 1
}
