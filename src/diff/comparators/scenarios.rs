//! End-to-end comparator scenarios and matching properties.

use serde_json::json;

use super::*;
use crate::config::ConfigTree;
use crate::diff::types::DiffOperation;
use crate::error::{EntityValidationError, Side, StoresyncError};

fn tree(yaml: &str) -> ConfigTree {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn scenario_channel_created() {
    let desired = tree(
        r"
channels:
  - slug: de
    currencyCode: EUR
    country: DE
",
    );
    let results = ChannelComparator
        .compare(&desired, &ConfigTree::default())
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, DiffOperation::Create);
    assert_eq!(results[0].entity_name, "de");
    assert!(results[0].current.is_none());
    assert_eq!(results[0].desired.as_ref().unwrap()["defaultCountry"], json!("DE"));
}

#[test]
fn scenario_channel_deleted() {
    let observed = tree(
        r"
channels:
  - slug: de
    currencyCode: EUR
    defaultCountry: DE
",
    );
    let results = ChannelComparator
        .compare(&ConfigTree::default(), &observed)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, DiffOperation::Delete);
    assert_eq!(results[0].entity_name, "de");
    assert!(results[0].desired.is_none());
}

#[test]
fn scenario_channel_currency_updated() {
    let desired = tree("channels: [{slug: de, currencyCode: EUR}]");
    let observed = tree("channels: [{slug: de, currencyCode: USD}]");
    let results = ChannelComparator.compare(&desired, &observed).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, DiffOperation::Update);
    assert_eq!(results[0].changes.len(), 1);
    let change = &results[0].changes[0];
    assert_eq!(change.field, "currencyCode");
    assert_eq!(change.current_value, json!("USD"));
    assert_eq!(change.desired_value, json!("EUR"));
}

#[test]
fn scenario_category_child_added() {
    let desired = tree(
        r"
categories:
  - slug: electronics
    children:
      - slug: laptops
",
    );
    let observed = tree(
        r"
categories:
  - slug: electronics
    children: []
",
    );
    let results = CategoryComparator.compare(&desired, &observed).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, DiffOperation::Update);
    assert_eq!(results[0].entity_name, "electronics");
    assert_eq!(results[0].changes.len(), 1);
    assert!(results[0].changes[0].description.contains("laptops"));
    assert!(results[0].changes[0].description.contains("added"));
}

#[test]
fn scenario_tax_rates() {
    let desired = tree(
        r"
taxClasses:
  - name: Standard
    countryRates:
      - {countryCode: US, rate: 9.0}
      - {countryCode: GB, rate: 20}
      - {countryCode: CA, rate: 12}
",
    );
    let observed = tree(
        r"
taxClasses:
  - name: Standard
    countryRates:
      - {countryCode: US, rate: 8.5}
      - {countryCode: GB, rate: 20}
",
    );
    let results = TaxClassComparator.compare(&desired, &observed).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, DiffOperation::Update);
    let changes = &results[0].changes;
    assert_eq!(changes.len(), 2);
    let us = changes.iter().find(|c| c.field == "countryRates.US").unwrap();
    assert_eq!(us.current_value, json!(8.5));
    assert_eq!(us.desired_value, json!(9.0));
    let ca = changes.iter().find(|c| c.field == "countryRates.CA").unwrap();
    assert!(ca.current_value.is_null());
    assert_eq!(ca.desired_value, json!(12.0));
}

#[test]
fn scenario_menu_reordered() {
    let desired = tree(
        r"
menus:
  - slug: main
    items: [{name: A}, {name: B}]
",
    );
    let observed = tree(
        r"
menus:
  - slug: main
    items: [{name: B}, {name: A}]
",
    );
    let results = MenuComparator.compare(&desired, &observed).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].changes.len(), 1);
    assert_eq!(results[0].changes[0].field, "items.order");
}

#[test]
fn property_one_result_per_identity() {
    let desired = tree(
        r"
warehouses:
  - {slug: a, email: a@example.com}
  - {slug: b, email: b@example.com}
  - {slug: c, email: c@example.com}
",
    );
    let observed = tree(
        r"
warehouses:
  - {slug: b, email: b@example.com}
  - {slug: c, email: other@example.com}
  - {slug: d, email: d@example.com}
",
    );
    let results = WarehouseComparator.compare(&desired, &observed).unwrap();
    let summary: Vec<(DiffOperation, &str)> = results
        .iter()
        .map(|r| (r.operation, r.entity_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (DiffOperation::Create, "a"),
            (DiffOperation::Update, "c"),
            (DiffOperation::Delete, "d"),
        ]
    );
}

#[test]
fn property_reordering_is_irrelevant() {
    let desired = tree(
        r"
shippingZones:
  - name: Europe
    countries: [DE, FR, IT]
    warehouses: [berlin, paris]
  - name: Americas
    countries: [US, CA]
",
    );
    let observed = tree(
        r"
shippingZones:
  - name: Americas
    countries: [CA, US]
  - name: Europe
    countries: [IT, DE, FR]
    warehouses: [paris, berlin]
",
    );
    assert!(ShippingZoneComparator
        .compare(&desired, &observed)
        .unwrap()
        .is_empty());
    assert!(ShippingZoneComparator
        .compare(&observed, &desired)
        .unwrap()
        .is_empty());
}

#[test]
fn property_desired_duplicates_name_every_identifier() {
    let desired = tree(
        r"
collections:
  - slug: summer
  - slug: winter
  - slug: summer
  - slug: winter
",
    );
    let err = CollectionComparator
        .compare(&desired, &ConfigTree::default())
        .unwrap_err();
    match err {
        StoresyncError::EntityValidation(EntityValidationError::DuplicateIdentifiers {
            identifiers,
            side,
            ..
        }) => {
            assert_eq!(identifiers, vec!["summer", "winter"]);
            assert_eq!(side, Side::Desired);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn property_missing_identity_fails() {
    let desired = tree("products: [{name: Nameless}]");
    let err = ProductComparator
        .compare(&desired, &ConfigTree::default())
        .unwrap_err();
    assert!(matches!(
        err,
        StoresyncError::EntityValidation(EntityValidationError::MissingIdentity {
            field: "slug",
            ..
        })
    ));
}

#[test]
fn property_observed_duplicates_tolerated_only_where_declared() {
    let observed = tree(
        r"
productTypes: [{name: Computer}, {name: Computer}]
channels: [{slug: de}, {slug: de}]
",
    );
    let desired = tree(
        r"
productTypes: [{name: Computer}]
channels: [{slug: de}]
",
    );
    assert!(ProductTypeComparator
        .compare(&desired, &observed)
        .unwrap()
        .is_empty());
    assert!(ChannelComparator.compare(&desired, &observed).is_err());
}
