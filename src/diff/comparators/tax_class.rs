//! Tax class comparator.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::EntityComparator;
use crate::config::{ConfigTree, TaxClass};
use crate::diff::kernel::{Direction, EntityMatcher, field_change};
use crate::diff::normalize::{floats_equal, format_percent};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

/// Compares tax classes by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxClassComparator;

impl EntityComparator for TaxClassComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::TaxClasses
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
                &desired.tax_classes,
                &observed.tax_classes,
                rate_changes,
            )
    }
}

fn rate_table(class: &TaxClass) -> BTreeMap<String, f64> {
    class
        .country_rates
        .iter()
        .map(|r| (r.country_code.trim().to_uppercase(), r.rate))
        .collect()
}

fn rate_changes(desired: &TaxClass, observed: &TaxClass) -> Vec<DiffChange> {
    let wanted = rate_table(desired);
    let current = rate_table(observed);
    let countries: BTreeSet<&String> = wanted.keys().chain(current.keys()).collect();

    countries
        .into_iter()
        .filter_map(|country| {
            let field = format!("countryRates.{country}");
            match (current.get(country), wanted.get(country)) {
                (Some(&old), Some(&new)) if !floats_equal(old, new) => Some(field_change(
                    field,
                    Value::from(old),
                    Value::from(new),
                    Some(format!(
                        "{country} tax rate: {} -> {}",
                        format_percent(old),
                        format_percent(new)
                    )),
                )),
                (None, Some(&new)) => Some(field_change(
                    field,
                    Value::Null,
                    Value::from(new),
                    Some(format!("{country} tax rate added: {}", format_percent(new))),
                )),
                (Some(&old), None) => Some(field_change(
                    field,
                    Value::from(old),
                    Value::Null,
                    Some(format!("{country} tax rate removed: {}", format_percent(old))),
                )),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountryRate;
    use serde_json::json;

    fn class(rates: &[(&str, f64)]) -> TaxClass {
        TaxClass {
            name: String::from("Standard"),
            country_rates: rates
                .iter()
                .map(|(code, rate)| CountryRate {
                    country_code: (*code).to_string(),
                    rate: *rate,
                })
                .collect(),
        }
    }

    #[test]
    fn test_added_changed_removed() {
        let changes = rate_changes(
            &class(&[("US", 9.0), ("CA", 12.0)]),
            &class(&[("US", 8.5), ("GB", 20.0)]),
        );
        let fields: Vec<&str> = changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["countryRates.CA", "countryRates.GB", "countryRates.US"]
        );
        assert_eq!(changes[0].description, "CA tax rate added: 12%");
        assert_eq!(changes[1].description, "GB tax rate removed: 20%");
        assert_eq!(changes[2].description, "US tax rate: 8.5% -> 9%");
        assert_eq!(changes[2].current_value, json!(8.5));
    }

    #[test]
    fn test_order_insensitive() {
        let a = class(&[("US", 9.0), ("GB", 20.0)]);
        let b = class(&[("GB", 20.0), ("us", 9.0)]);
        assert!(rate_changes(&a, &b).is_empty());
    }
}
