//! Normalization of values before comparison.
//!
//! Rich-text descriptions are flattened to plain text, dates are brought to
//! one canonical UTC form, attribute values become order-insensitive and
//! numbers compare by value rather than by JSON spelling.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::types::display_value;

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

const FLOAT_TOLERANCE: f64 = 1e-9;

/// Reduces a description to comparable plain text.
///
/// Accepts plain strings, HTML fragments and block-structured rich-text
/// documents (as an object or as a JSON-encoded string).
#[must_use]
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.starts_with('{') {
                if let Ok(doc) = serde_json::from_str::<Value>(trimmed) {
                    if doc.get("blocks").is_some() {
                        return flatten_blocks(&doc);
                    }
                }
            }
            strip_markup(trimmed)
        }
        Value::Object(_) if value.get("blocks").is_some() => flatten_blocks(value),
        other => strip_markup(&other.to_string()),
    }
}

fn flatten_blocks(doc: &Value) -> String {
    let Some(blocks) = doc.get("blocks").and_then(Value::as_array) else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for block in blocks {
        let Some(data) = block.get("data") else {
            continue;
        };
        if let Some(text) = data.get("text").and_then(Value::as_str) {
            parts.push(text.to_string());
        }
        if let Some(items) = data.get("items").and_then(Value::as_array) {
            parts.extend(items.iter().map(|item| match item {
                Value::String(s) => s.clone(),
                other => other
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }));
        }
    }

    strip_markup(&parts.join(" "))
}

/// Strips HTML tags, decodes entities and collapses whitespace.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let text = RE_TAG.replace_all(text, " ");
    let text = html_escape::decode_html_entities(&text);
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Normalizes a date or date-time to UTC RFC 3339.
///
/// Date-only values become midnight UTC; unparsable values are returned
/// trimmed.
#[must_use]
pub fn normalize_datetime(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return format_utc(parsed.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return format_utc(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return format_utc(midnight.and_utc());
    }

    raw.to_string()
}

fn format_utc(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Normalizes an optional date field into a JSON value.
#[must_use]
pub fn datetime_value(raw: Option<&str>) -> Value {
    raw.map_or(Value::Null, |r| Value::String(normalize_datetime(r)))
}

/// Normalizes an attribute value so that element order does not matter.
///
/// Arrays become sorted string arrays; a single-element array collapses to
/// its only element.
#[must_use]
pub fn normalize_attribute_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut values: Vec<String> = items
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| display_value(v).trim().to_string())
                .collect();
            values.sort();
            values.dedup();
            if values.len() == 1 {
                values.pop().map_or(Value::Null, Value::String)
            } else {
                Value::Array(values.into_iter().map(Value::String).collect())
            }
        }
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Number(_) | Value::Bool(_) => Value::String(display_value(value)),
        other => other.clone(),
    }
}

/// Renders a rate as a percentage.
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{rate}%")
}

/// Compares two floats with a small tolerance.
#[must_use]
pub fn floats_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < FLOAT_TOLERANCE
}

/// Structural equality where numbers compare by value.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => floats_equal(x, y),
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}
