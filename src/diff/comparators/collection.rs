//! Collection comparator.

use indexmap::IndexMap;
use serde_json::{Value, json};

use super::EntityComparator;
use super::common::{compact, description_change, first_by_key, membership_change, text_change};
use crate::config::{Collection, ConfigTree};
use crate::diff::kernel::{Direction, EntityMatcher, keyed_changes};
use crate::diff::normalize::datetime_value;
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

/// Compares collections by slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionComparator;

impl EntityComparator for CollectionComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Collections
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
                &desired.collections,
                &observed.collections,
                collection_changes,
            )
    }
}

fn collection_changes(desired: &Collection, observed: &Collection) -> Vec<DiffChange> {
    let mut changes: Vec<DiffChange> = [
        text_change("name", observed.name.as_deref(), desired.name.as_deref()),
        description_change(
            "description",
            observed.description.as_ref(),
            desired.description.as_ref(),
        ),
        membership_change("products", &observed.products, &desired.products),
    ]
    .into_iter()
    .flatten()
    .collect();

    changes.extend(keyed_changes(
        "channelListings",
        "Channel listing",
        &listings(observed),
        &listings(desired),
    ));
    changes
}

fn listings(collection: &Collection) -> IndexMap<String, Value> {
    first_by_key(
        collection
            .channel_listings
            .iter()
            .map(|listing| {
                let record = compact([
                    ("isPublished", json!(listing.is_published)),
                    ("publishedAt", datetime_value(listing.published_at.as_deref())),
                ]);
                (listing.channel.key().trim().to_string(), record)
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collections(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_member_order_irrelevant() {
        let desired = collections(
            r"
collections:
  - slug: summer
    products: [sandals, hat]
    channelListings:
      - channel: de
        isPublished: true
",
        );
        let observed = collections(
            r"
collections:
  - slug: summer
    products:
      - slug: hat
      - slug: sandals
    channelListings:
      - channelSlug: de
        isPublished: true
",
        );
        let results = CollectionComparator.compare(&desired, &observed).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_membership_and_publication_changes() {
        let desired = collections(
            r"
collections:
  - slug: summer
    products: [sandals, hat]
    channelListings:
      - channel: de
        isPublished: true
",
        );
        let observed = collections(
            r"
collections:
  - slug: summer
    products: [sandals]
    channelListings:
      - channel: de
        isPublished: false
",
        );
        let results = CollectionComparator.compare(&desired, &observed).unwrap();
        let fields: Vec<&str> = results[0].changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["products", "channelListings.de.isPublished"]);
        assert_eq!(results[0].changes[0].desired_value, json!(["hat", "sandals"]));
    }

    #[test]
    fn test_repeated_listing_channel_keeps_first() {
        let desired = collections(
            r"
collections:
  - slug: summer
    channelListings:
      - {channel: de, isPublished: true}
",
        );
        let observed = collections(
            r"
collections:
  - slug: summer
    channelListings:
      - {channel: de, isPublished: true}
      - {channel: de, isPublished: false}
",
        );
        assert!(CollectionComparator.compare(&desired, &observed).unwrap().is_empty());
    }
}
