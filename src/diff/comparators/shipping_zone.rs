//! Shipping zone comparator.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::EntityComparator;
use super::common::{compact, membership_change, number};
use crate::config::{ConfigTree, ShippingMethod, ShippingZone};
use crate::diff::kernel::{Direction, EntityMatcher, field_change, fixed_field_changes, managed_fields_differ};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const ZONE_FIELDS: &[&str] = &["description", "default"];

/// Compares shipping zones by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingZoneComparator;

impl EntityComparator for ShippingZoneComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::ShippingZones
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        EntityMatcher::new(self.entity_type())
            .direction(direction)
            .run(
                &desired.shipping_zones,
                &observed.shipping_zones,
                zone_changes,
            )
    }
}

fn zone_changes(desired: &ShippingZone, observed: &ShippingZone) -> Vec<DiffChange> {
    let mut changes = fixed_field_changes("", observed, desired, ZONE_FIELDS);

    changes.extend(
        [
            membership_change("countries", &observed.countries, &desired.countries),
            membership_change("warehouses", &observed.warehouses, &desired.warehouses),
            membership_change("channels", &observed.channels, &desired.channels),
            methods_change(&observed.shipping_methods, &desired.shipping_methods),
        ]
        .into_iter()
        .flatten(),
    );

    changes
}

/// Collapses flat and nested price/weight spellings into one shape.
fn normalize_method(method: &ShippingMethod) -> Value {
    let mut listings: Vec<(String, Value)> = method
        .channel_listings
        .iter()
        .map(|listing| {
            let channel = listing.channel.key().trim().to_string();
            let record = compact([
                ("channel", Value::from(channel.as_str())),
                ("price", number(listing.price.map(|a| a.value()))),
                (
                    "minimumOrderPrice",
                    number(listing.minimum_order_price.map(|a| a.value())),
                ),
                (
                    "maximumOrderPrice",
                    number(listing.maximum_order_price.map(|a| a.value())),
                ),
            ]);
            (channel, record)
        })
        .collect();
    listings.sort_by(|a, b| a.0.cmp(&b.0));

    compact([
        ("name", Value::from(method.name.trim())),
        ("description", json!(method.description)),
        ("type", json!(method.method_type)),
        ("minimumDeliveryDays", json!(method.minimum_delivery_days)),
        ("maximumDeliveryDays", json!(method.maximum_delivery_days)),
        (
            "minimumOrderWeight",
            number(method.minimum_order_weight.as_ref().map(|w| w.value())),
        ),
        (
            "maximumOrderWeight",
            number(method.maximum_order_weight.as_ref().map(|w| w.value())),
        ),
        (
            "channelListings",
            Value::Array(listings.into_iter().map(|(_, v)| v).collect()),
        ),
    ])
}

fn methods_by_name(methods: &[ShippingMethod]) -> IndexMap<&str, Value> {
    let mut map = IndexMap::new();
    for method in methods {
        let name = method.name.trim();
        if !name.is_empty() {
            map.entry(name).or_insert_with(|| normalize_method(method));
        }
    }
    map
}

/// Builds one consolidated change covering every added, removed and
/// updated method of the zone.
fn methods_change(current: &[ShippingMethod], desired: &[ShippingMethod]) -> Option<DiffChange> {
    let current = methods_by_name(current);
    let desired = methods_by_name(desired);

    let added: Vec<&str> = desired
        .keys()
        .filter(|name| !current.contains_key(*name))
        .copied()
        .collect();
    let removed: Vec<&str> = current
        .keys()
        .filter(|name| !desired.contains_key(*name))
        .copied()
        .collect();
    let updated: Vec<&str> = desired
        .iter()
        .filter(|(name, wanted)| {
            current
                .get(*name)
                .is_some_and(|actual| managed_fields_differ(actual, wanted))
        })
        .map(|(name, _)| *name)
        .collect();

    if added.is_empty() && removed.is_empty() && updated.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    for (verb, names) in [("added", &added), ("removed", &removed), ("updated", &updated)] {
        if !names.is_empty() {
            parts.push(format!("{verb} {}", names.join(", ")));
        }
    }

    Some(field_change(
        "shippingMethods",
        Value::Array(current.into_values().collect()),
        Value::Array(desired.into_values().collect()),
        Some(format!("Shipping methods: {}", parts.join("; "))),
    ))
}
