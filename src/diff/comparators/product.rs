//! Product comparator.
//!
//! Products are the deepest entities in the tree: besides their own fields
//! they carry channel listings, variants keyed by SKU (each with its own
//! listings) and a media gallery.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::EntityComparator;
use super::common::{
    attribute_map_changes, compact, description_change, first_by_key, number, reference_change,
    text_change,
};
use crate::config::{ConfigTree, Product, ProductVariant};
use crate::diff::kernel::{
    Direction, EntityMatcher, field_change, join_path, keyed_changes, snapshot,
};
use crate::diff::normalize::{datetime_value, floats_equal};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

/// Compares products by slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductComparator;

impl EntityComparator for ProductComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Products
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
                &desired.products,
                &observed.products,
                product_changes,
            )
    }
}

fn product_changes(desired: &Product, observed: &Product) -> Vec<DiffChange> {
    let mut changes: Vec<DiffChange> = [
        text_change("name", observed.name.as_deref(), desired.name.as_deref()),
        description_change(
            "description",
            observed.description.as_ref(),
            desired.description.as_ref(),
        ),
        reference_change(
            "productType",
            observed.product_type.as_ref(),
            desired.product_type.as_ref(),
        ),
        reference_change(
            "category",
            observed.category.as_ref(),
            desired.category.as_ref(),
        ),
        reference_change(
            "taxClass",
            observed.tax_class.as_ref(),
            desired.tax_class.as_ref(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    changes.extend(attribute_map_changes(
        "attributes",
        &observed.attributes,
        &desired.attributes,
    ));
    changes.extend(keyed_changes(
        "channelListings",
        "Channel listing",
        &product_listings(observed),
        &product_listings(desired),
    ));
    changes.extend(variant_changes(&observed.variants, &desired.variants));
    changes.extend(media_change(observed, desired));
    changes
}

fn product_listings(product: &Product) -> IndexMap<String, Value> {
    first_by_key(
        product
            .channel_listings
            .iter()
            .map(|listing| {
                let record = compact([
                    ("isPublished", json!(listing.is_published)),
                    ("publishedAt", datetime_value(listing.published_at.as_deref())),
                    ("visibleInListings", json!(listing.visible_in_listings)),
                    (
                        "isAvailableForPurchase",
                        json!(listing.is_available_for_purchase),
                    ),
                    (
                        "availableForPurchaseAt",
                        datetime_value(listing.available_for_purchase_at.as_deref()),
                    ),
                ]);
                (listing.channel.key().trim().to_string(), record)
            }),
    )
}

fn priced_listings(variant: &ProductVariant) -> usize {
    variant
        .channel_listings
        .iter()
        .filter(|listing| listing.price.is_some())
        .count()
}

/// Indexes variants by SKU; a repeated SKU keeps the variant with more prices.
fn variants_by_sku(variants: &[ProductVariant]) -> IndexMap<&str, &ProductVariant> {
    let mut map: IndexMap<&str, &ProductVariant> = IndexMap::new();
    for variant in variants {
        let sku = variant.sku.trim();
        if sku.is_empty() {
            continue;
        }
        match map.get_mut(sku) {
            Some(kept) if priced_listings(variant) > priced_listings(*kept) => *kept = variant,
            Some(_) => {}
            None => {
                map.insert(sku, variant);
            }
        }
    }
    map
}

fn variant_listings(variant: &ProductVariant) -> IndexMap<String, Value> {
    first_by_key(
        variant
            .channel_listings
            .iter()
            .map(|listing| {
                let record = compact([
                    ("price", number(listing.price.map(|a| a.value()))),
                    ("costPrice", number(listing.cost_price.map(|a| a.value()))),
                ]);
                (listing.channel.key().trim().to_string(), record)
            }),
    )
}

fn variant_changes(current: &[ProductVariant], desired: &[ProductVariant]) -> Vec<DiffChange> {
    let current = variants_by_sku(current);
    let desired = variants_by_sku(desired);
    let mut changes = Vec::new();

    for (sku, wanted) in &desired {
        let path = join_path("variants", sku);
        let Some(actual) = current.get(sku) else {
            changes.push(field_change(
                path,
                Value::Null,
                snapshot(*wanted),
                Some(format!("Variant \"{sku}\" added")),
            ));
            continue;
        };

        changes.extend(text_change(
            join_path(&path, "name"),
            actual.name.as_deref(),
            wanted.name.as_deref(),
        ));

        if let Some(weight) = wanted.weight.as_ref().map(|w| w.value()) {
            let old = actual.weight.as_ref().map(|w| w.value());
            if !old.is_some_and(|old| floats_equal(old, weight)) {
                changes.push(field_change(
                    join_path(&path, "weight"),
                    number(old),
                    Value::from(weight),
                    None,
                ));
            }
        }

        changes.extend(attribute_map_changes(
            &join_path(&path, "attributes"),
            &actual.attributes,
            &wanted.attributes,
        ));
        changes.extend(keyed_changes(
            &join_path(&path, "channelListings"),
            "Channel listing",
            &variant_listings(actual),
            &variant_listings(wanted),
        ));
    }

    for (sku, actual) in &current {
        if !desired.contains_key(sku) {
            changes.push(field_change(
                join_path("variants", sku),
                snapshot(*actual),
                Value::Null,
                Some(format!("Variant \"{sku}\" removed")),
            ));
        }
    }

    changes
}

fn media_set(product: &Product) -> Vec<(String, String)> {
    let mut media: Vec<(String, String)> = product
        .media
        .iter()
        .filter_map(|m| {
            let url = m.external_url.as_deref()?.trim();
            if url.is_empty() {
                return None;
            }
            let alt = m.alt.as_deref().unwrap_or_default().trim();
            Some((url.to_string(), alt.to_string()))
        })
        .collect();
    media.sort();
    media.dedup();
    media
}

fn media_value(media: &[(String, String)]) -> Value {
    Value::Array(
        media
            .iter()
            .map(|(url, alt)| json!({"url": url, "alt": alt}))
            .collect(),
    )
}

fn media_change(current: &Product, desired: &Product) -> Option<DiffChange> {
    let wanted = media_set(desired);
    let actual = media_set(current);
    if wanted == actual {
        return None;
    }
    Some(field_change(
        "media",
        media_value(&actual),
        media_value(&wanted),
        Some(format!(
            "media: {} item(s) -> {} item(s)",
            actual.len(),
            wanted.len()
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::DiffOperation;

    fn products(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn fields(results: &[DiffResult]) -> Vec<&str> {
        results[0].changes.iter().map(|c| c.field.as_str()).collect()
    }

    #[test]
    fn test_equivalent_shapes_produce_nothing() {
        let desired = products(
            r"
products:
  - slug: laptop
    name: Laptop
    description: Fast and light
    productType: Computer
    category: laptops
    attributes:
      Color: [Silver, Black]
    channelListings:
      - channel: de
        isPublished: true
        publishedAt: 2024-03-01
    variants:
      - sku: LP-1
        weight: 1.4
        channelListings:
          - channel: de
            price: 999
    media:
      - url: https://cdn.example.com/a.jpg
        alt: Front
",
        );
        let observed = products(
            r#"
products:
  - slug: laptop
    name: Laptop
    description: '{"blocks": [{"type": "paragraph", "data": {"text": "<p>Fast and light</p>"}}]}'
    productType: {name: Computer}
    category: {slug: laptops}
    attributes:
      Color: [Black, Silver]
    channelListings:
      - channel: {slug: de}
        isPublished: true
        publishedAt: "2024-03-01T00:00:00+00:00"
    variants:
      - sku: LP-1
        weight: {value: 1.4, unit: KG}
        channelListings:
          - channel: {slug: de}
            price: {amount: 999.0, currency: EUR}
    media:
      - externalUrl: " https://cdn.example.com/a.jpg "
        alt: Front
"#,
        );
        let results = ProductComparator.compare(&desired, &observed).unwrap();
        assert!(results.is_empty(), "{results:?}");
    }

    #[test]
    fn test_variant_and_listing_changes() {
        let desired = products(
            r"
products:
  - slug: laptop
    variants:
      - sku: LP-1
        weight: 1.5
        channelListings:
          - channel: de
            price: 899
      - sku: LP-2
",
        );
        let observed = products(
            r"
products:
  - slug: laptop
    variants:
      - sku: LP-1
        weight: 1.4
        channelListings:
          - channel: de
            price: 999
      - sku: LP-3
",
        );
        let results = ProductComparator.compare(&desired, &observed).unwrap();
        assert_eq!(results[0].operation, DiffOperation::Update);
        assert_eq!(
            fields(&results),
            vec![
                "variants.LP-1.weight",
                "variants.LP-1.channelListings.de.price",
                "variants.LP-2",
                "variants.LP-3",
            ]
        );
    }

    #[test]
    fn test_duplicate_sku_keeps_richer_pricing() {
        let observed = products(
            r"
products:
  - slug: laptop
    variants:
      - sku: LP-1
      - sku: LP-1
        channelListings:
          - channel: de
            price: 999
",
        );
        let desired = products(
            r"
products:
  - slug: laptop
    variants:
      - sku: LP-1
        channelListings:
          - channel: de
            price: 999
",
        );
        assert!(ProductComparator.compare(&desired, &observed).unwrap().is_empty());
    }

    #[test]
    fn test_listing_date_and_reference_changes() {
        let desired = products(
            r"
products:
  - slug: laptop
    category: notebooks
    channelListings:
      - channel: de
        publishedAt: 2024-04-01
",
        );
        let observed = products(
            r"
products:
  - slug: laptop
    category: {slug: laptops}
    channelListings:
      - channel: de
        publishedAt: 2024-03-01T00:00:00Z
      - channel: us
",
        );
        let results = ProductComparator.compare(&desired, &observed).unwrap();
        assert_eq!(
            fields(&results),
            vec![
                "category",
                "channelListings.de.publishedAt",
                "channelListings.us",
            ]
        );
        assert_eq!(
            results[0].changes[1].desired_value,
            Value::from("2024-04-01T00:00:00Z")
        );
    }

    #[test]
    fn test_media_change() {
        let desired = products(
            r"
products:
  - slug: laptop
    media:
      - url: https://cdn.example.com/b.jpg
",
        );
        let observed = products(
            r"
products:
  - slug: laptop
    media:
      - url: https://cdn.example.com/a.jpg
",
        );
        let results = ProductComparator.compare(&desired, &observed).unwrap();
        assert_eq!(fields(&results), vec!["media"]);
    }

    #[test]
    fn test_repeated_listing_channel_keeps_first() {
        let desired = products(
            r"
products:
  - slug: mug
    channelListings:
      - {channel: de, isPublished: true}
    variants:
      - sku: MUG-1
        channelListings:
          - {channel: de, price: 12}
",
        );
        let observed = products(
            r"
products:
  - slug: mug
    channelListings:
      - {channel: de, isPublished: true}
      - {channel: de, isPublished: false}
    variants:
      - sku: MUG-1
        channelListings:
          - {channel: de, price: 12}
          - {channel: de, price: 15}
",
        );
        let results = ProductComparator.compare(&desired, &observed).unwrap();
        assert!(results.is_empty(), "{results:?}");
    }
}
