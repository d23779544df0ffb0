//! Warehouse comparator.

use serde_json::Value;

use super::EntityComparator;
use crate::config::{ConfigTree, Warehouse};
use crate::diff::kernel::{Direction, EntityMatcher, fixed_field_changes, fixed_field_changes_by};
use crate::diff::normalize::values_equal;
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const WAREHOUSE_FIELDS: &[&str] = &["name", "email", "isPrivate", "clickAndCollectOption"];

const ADDRESS_FIELDS: &[&str] = &[
    "companyName",
    "streetAddress1",
    "streetAddress2",
    "city",
    "cityArea",
    "postalCode",
    "country",
    "countryArea",
    "phone",
];

/// Compares warehouses by slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarehouseComparator;

impl EntityComparator for WarehouseComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Warehouses
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
                &desired.warehouses,
                &observed.warehouses,
                warehouse_changes,
            )
    }
}

fn warehouse_changes(desired: &Warehouse, observed: &Warehouse) -> Vec<DiffChange> {
    let mut changes = fixed_field_changes("", observed, desired, WAREHOUSE_FIELDS);

    if let Some(wanted) = &desired.address {
        let current = observed.address.clone().unwrap_or_default();
        changes.extend(fixed_field_changes_by(
            "address",
            &current,
            wanted,
            ADDRESS_FIELDS,
            address_field_equal,
        ));
    }

    changes
}

// The platform upper-cases city names.
fn address_field_equal(field: &str, current: &Value, desired: &Value) -> bool {
    match (field, current, desired) {
        ("city", Value::String(a), Value::String(b)) => {
            a.trim().to_lowercase() == b.trim().to_lowercase()
        }
        _ => values_equal(current, desired),
    }
}
