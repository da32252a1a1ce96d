use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::Value;

use crate::locale::{Locale, resolve_field};

/// List endpoints answer either with a bare array or an object wrapping one.
pub fn items(payload: Option<&Value>) -> &[Value] {
    match payload {
        None | Some(Value::Null) => &[],
        Some(Value::Array(list)) => list,
        Some(Value::Object(map)) => {
            for key in ["data", "results"] {
                if let Some(Value::Array(list)) = map.get(key) {
                    return list;
                }
            }
            &[]
        }
        Some(other) => {
            debug_assert!(false, "expected a list payload, got {other}");
            &[]
        }
    }
}

/// `uuid` (string or number) falling back to `id`.
pub fn entity_id(entity: &Value) -> Option<String> {
    ["uuid", "id"].iter().find_map(|key| match entity.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-negative integer field; absent, negative or non-numeric reads as 0.
pub fn count(entity: Option<&Value>, key: &str) -> u32 {
    let Some(value) = entity.and_then(|e| e.get(key)) else {
        return 0;
    };
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

pub fn str_field<'a>(entity: Option<&'a Value>, key: &str) -> Option<&'a str> {
    entity
        .and_then(|e| e.get(key))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

/// Case-insensitive substring test. A blank term matches everything.
pub fn contains_ci(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&term.to_lowercase())
}

pub fn matches_text(entity: &Value, field: &str, term: &str, locale: Locale) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    contains_ci(&resolve_field(Some(entity), field, locale), term)
}

pub fn filter_by_text<'a>(
    payload: Option<&'a Value>,
    field: &str,
    term: &str,
    locale: Locale,
) -> Vec<&'a Value> {
    items(payload)
        .iter()
        .filter(|entity| matches_text(entity, field, term, locale))
        .collect()
}

/// Case-folded comparison so "ali" and "Ali" sort together; raw order breaks
/// exact folded ties.
pub fn compare_localized(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Next "load more" request size.
pub fn grow_size(current: u32, step: u32, max: u32) -> u32 {
    current.saturating_add(step).min(max)
}

/// Leading `YYYY-MM-DD` of a date or timestamp string.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// `dd.mm.yyyy`, or the input untouched when it is not a date.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => raw.trim().to_string(),
    }
}

/// `HH:MM` from `HH:MM:SS`.
pub fn format_time(raw: &str) -> String {
    let raw = raw.trim();
    raw.get(..5).unwrap_or(raw).to_string()
}
