//! Field helpers shared by several comparators.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::{EntityRef, sorted_keys};
use crate::diff::kernel::{field_change, join_path};
use crate::diff::normalize::{normalize_attribute_value, plain_text, values_equal};
use crate::diff::types::DiffChange;

/// Collects keyed records in order; a repeated key keeps its first record.
pub fn first_by_key(
    records: impl IntoIterator<Item = (String, Value)>,
) -> IndexMap<String, Value> {
    let mut map = IndexMap::new();
    for (key, record) in records {
        map.entry(key).or_insert(record);
    }
    map
}

/// Compares an optional text field; unmanaged when the desired side is absent.
pub fn text_change(
    field: impl Into<String>,
    current: Option<&str>,
    desired: Option<&str>,
) -> Option<DiffChange> {
    let wanted = desired?.trim();
    let actual = current.map(str::trim);
    if actual == Some(wanted) {
        return None;
    }
    Some(field_change(
        field,
        actual.map_or(Value::Null, Value::from),
        Value::from(wanted),
        None,
    ))
}

/// Compares descriptions by their plain-text content.
pub fn description_change(
    field: impl Into<String>,
    current: Option<&Value>,
    desired: Option<&Value>,
) -> Option<DiffChange> {
    let wanted = plain_text(desired?);
    let actual = current.map(plain_text).unwrap_or_default();
    if wanted == actual {
        return None;
    }
    Some(field_change(
        field,
        Value::String(actual),
        Value::String(wanted),
        None,
    ))
}

/// Compares a reference to another entity by its normalized key.
pub fn reference_change(
    field: &str,
    current: Option<&EntityRef>,
    desired: Option<&EntityRef>,
) -> Option<DiffChange> {
    text_change(
        field,
        current.map(EntityRef::key),
        desired.map(EntityRef::key),
    )
}

/// Compares two reference lists as sorted sets.
pub fn membership_change(
    field: &str,
    current: &[EntityRef],
    desired: &[EntityRef],
) -> Option<DiffChange> {
    let wanted = sorted_keys(desired);
    let actual = sorted_keys(current);
    if wanted == actual {
        return None;
    }
    Some(field_change(
        field,
        Value::from(actual),
        Value::from(wanted),
        None,
    ))
}

/// Compares attribute values by name, ignoring element order.
///
/// Only attributes named on the desired side are managed.
pub fn attribute_map_changes(
    prefix: &str,
    current: &BTreeMap<String, Value>,
    desired: &BTreeMap<String, Value>,
) -> Vec<DiffChange> {
    desired
        .iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(name, value)| {
            let wanted = normalize_attribute_value(value);
            let actual = current
                .get(name)
                .map_or(Value::Null, normalize_attribute_value);
            if values_equal(&actual, &wanted) {
                None
            } else {
                Some(field_change(
                    join_path(prefix, name),
                    actual,
                    wanted,
                    None,
                ))
            }
        })
        .collect()
}

/// Builds a JSON object from pairs, dropping null values.
pub fn compact<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Value::Object(map)
}

/// Converts an optional number into a JSON value.
pub fn number(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::from)
}
