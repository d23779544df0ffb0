//! Product type and page type comparators.
//!
//! Both group attributes by name. The platform occasionally returns the
//! same type twice, so observed duplicates collapse to the first record;
//! desired duplicates still fail.

use serde_json::Value;
use std::collections::HashSet;

use super::EntityComparator;
use crate::config::{AttributeAssignment, ConfigTree, PageType, ProductType};
use crate::diff::kernel::{Direction, EntityMatcher, field_change, fixed_field_changes};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

/// Compares product types by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductTypeComparator;

/// Compares page types by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTypeComparator;

impl EntityComparator for ProductTypeComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::ProductTypes
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        EntityMatcher::new(self.entity_type())
            .direction(direction)
            .dedupe_observed()
            .on_create(|product_type: &ProductType| {
                let mut changes =
                    attributes_to_create("productAttributes", &product_type.product_attributes);
                changes.extend(attributes_to_create(
                    "variantAttributes",
                    &product_type.variant_attributes,
                ));
                changes
            })
            .run(
                &desired.product_types,
                &observed.product_types,
                product_type_changes,
            )
    }
}

impl EntityComparator for PageTypeComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::PageTypes
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        EntityMatcher::new(self.entity_type())
            .direction(direction)
            .dedupe_observed()
            .on_create(|page_type: &PageType| {
                attributes_to_create("attributes", &page_type.attributes)
            })
            .run(&desired.page_types, &observed.page_types, |wanted, current| {
                attribute_list_changes("attributes", &current.attributes, &wanted.attributes)
            })
    }
}

fn product_type_changes(desired: &ProductType, observed: &ProductType) -> Vec<DiffChange> {
    let mut changes = fixed_field_changes("", observed, desired, &["isShippingRequired"]);
    changes.extend(attribute_list_changes(
        "productAttributes",
        &observed.product_attributes,
        &desired.product_attributes,
    ));
    changes.extend(attribute_list_changes(
        "variantAttributes",
        &observed.variant_attributes,
        &desired.variant_attributes,
    ));
    changes
}

fn attribute_names(assignments: &[AttributeAssignment]) -> Vec<&str> {
    let mut seen = HashSet::new();
    assignments
        .iter()
        .map(|a| a.name().trim())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .collect()
}

fn attribute_list_changes(
    field: &str,
    current: &[AttributeAssignment],
    desired: &[AttributeAssignment],
) -> Vec<DiffChange> {
    let current = attribute_names(current);
    let desired = attribute_names(desired);

    let added = desired.iter().filter(|name| !current.contains(*name)).map(|name| {
        field_change(
            field,
            Value::Null,
            Value::from(*name),
            Some(format!("Attribute \"{name}\" added")),
        )
    });
    let removed = current.iter().filter(|name| !desired.contains(*name)).map(|name| {
        field_change(
            field,
            Value::from(*name),
            Value::Null,
            Some(format!("Attribute \"{name}\" removed")),
        )
    });

    added.chain(removed).collect()
}

fn attributes_to_create(field: &str, desired: &[AttributeAssignment]) -> Vec<DiffChange> {
    attribute_names(desired)
        .into_iter()
        .map(|name| {
            field_change(
                field,
                Value::Null,
                Value::from(name),
                Some(format!("Attribute \"{name}\" will be created")),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::DiffOperation;
    use crate::error::StoresyncError;

    fn tree(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_attribute_added_and_removed() {
        let desired = tree(
            r"
productTypes:
  - name: Computer
    productAttributes:
      - attribute: Color
      - attribute: RAM
",
        );
        let observed = tree(
            r"
productTypes:
  - name: Computer
    productAttributes:
      - name: Color
      - name: Weight
",
        );
        let results = ProductTypeComparator.compare(&desired, &observed).unwrap();
        let descriptions: Vec<&str> = results[0]
            .changes
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Attribute \"RAM\" added", "Attribute \"Weight\" removed"]
        );
    }

    #[test]
    fn test_create_phrases_will_be_created() {
        let desired = tree(
            r"
productTypes:
  - name: Computer
    productAttributes:
      - attribute: Color
    variantAttributes:
      - attribute: Size
",
        );
        let results = ProductTypeComparator
            .compare(&desired, &ConfigTree::default())
            .unwrap();
        assert_eq!(results[0].operation, DiffOperation::Create);
        assert_eq!(results[0].changes.len(), 2);
        assert_eq!(
            results[0].changes[1].description,
            "Attribute \"Size\" will be created"
        );
        assert_eq!(results[0].changes[1].field, "variantAttributes");
    }

    #[test]
    fn test_observed_duplicates_tolerated() {
        let desired = tree(
            r"
pageTypes:
  - name: Article
    attributes:
      - attribute: Author
",
        );
        let observed = tree(
            r"
pageTypes:
  - name: Article
    attributes:
      - attribute: Author
  - name: Article
    attributes: []
",
        );
        assert!(PageTypeComparator.compare(&desired, &observed).unwrap().is_empty());
    }

    #[test]
    fn test_desired_duplicates_fail() {
        let desired = tree(
            r"
pageTypes:
  - name: Article
  - name: Article
",
        );
        let err = PageTypeComparator
            .compare(&desired, &ConfigTree::default())
            .unwrap_err();
        assert!(matches!(err, StoresyncError::EntityValidation(_)));
        assert!(err.to_string().contains("Article"));
    }
}
