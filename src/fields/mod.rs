//! Display formatting for record field values, driven by the field's schema type.

mod number;

pub use number::{format_currency, is_truthy, to_display_string, to_number};

use crate::schema::{FieldType, TableField};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Render `value` for display. Null is empty; anything that cannot be formatted as its type
/// falls back to plain stringification.
pub fn format_field_value(value: &Value, field: Option<&TableField>) -> String {
    if value.is_null() {
        return String::new();
    }
    let Some(field) = field else {
        return match value {
            Value::Array(_) | Value::Object(_) => value.to_string(),
            other => to_display_string(other),
        };
    };
    match field.field_type {
        FieldType::Date => format_date_value(value, false),
        FieldType::DateTime => format_date_value(value, true),
        FieldType::Checkbox => format_boolean_value(value),
        FieldType::Number => format_number_value(value, field.decimals),
        FieldType::Currency => format_currency_value(
            value,
            field.locale.as_deref().unwrap_or(DEFAULT_LOCALE),
            field.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        ),
        FieldType::Percent => format_percent_value(value, field.decimals),
        FieldType::Duration => format_duration_value(value),
        FieldType::MultiSelect => format_multi_select_value(value),
        FieldType::Json | FieldType::User | FieldType::Attachment => format_json_value(value),
        _ => to_display_string(value),
    }
}

/// Dates render in UTC: `M/D/YYYY`, or `M/D/YYYY, h:mm:ss AM` with time.
pub fn format_date_value(value: &Value, include_time: bool) -> String {
    let Some(at) = parse_timestamp(value) else {
        return to_display_string(value);
    };
    if include_time {
        at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}

/// Accepts RFC 3339, naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` (taken as UTC), bare dates and epoch
/// milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_f64()? as i64),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(at) = DateTime::parse_from_rfc3339(s) {
                return Some(at.with_timezone(&Utc));
            }
            for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

pub fn format_boolean_value(value: &Value) -> String {
    let text = if is_truthy(value) { "Yes" } else { "No" };
    text.to_string()
}

pub fn format_number_value(value: &Value, decimals: Option<u32>) -> String {
    match (to_number(value), decimals) {
        (Some(n), Some(d)) if n.is_finite() => {
            number::to_fixed(n, d).unwrap_or_else(|| to_display_string(value))
        }
        (Some(n), _) => number::format_number(n),
        (None, _) => to_display_string(value),
    }
}

pub fn format_currency_value(value: &Value, locale: &str, currency: &str) -> String {
    to_number(value)
        .and_then(|n| format_currency(n, locale, currency))
        .unwrap_or_else(|| to_display_string(value))
}

/// `0.256` with no decimals is `26%`.
pub fn format_percent_value(value: &Value, decimals: Option<u32>) -> String {
    match to_number(value) {
        Some(n) if n.is_finite() => number::to_fixed(n * 100.0, decimals.unwrap_or(0))
            .map(|fixed| format!("{}%", fixed))
            .unwrap_or_else(|| to_display_string(value)),
        _ => to_display_string(value),
    }
}

/// Milliseconds as `Hh Mm Ss`.
pub fn format_duration_value(value: &Value) -> String {
    let Some(ms) = to_number(value).filter(|n| n.is_finite()) else {
        return to_display_string(value);
    };
    let hours = (ms / 3_600_000.0).floor();
    let minutes = ((ms % 3_600_000.0) / 60_000.0).floor();
    let seconds = ((ms % 60_000.0) / 1_000.0).floor();
    format!(
        "{}h {}m {}s",
        number::format_number(hours),
        number::format_number(minutes),
        number::format_number(seconds)
    )
}

pub fn format_multi_select_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => to_display_string(other),
    }
}

/// Pretty JSON with two-space indent.
pub fn format_json_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| to_display_string(value))
}
