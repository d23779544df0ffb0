//! Shared attribute comparator.

use serde_json::Value;

use super::EntityComparator;
use crate::config::{AttributeDefinition, ConfigTree};
use crate::diff::kernel::{Direction, EntityMatcher, field_change, fixed_field_changes};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const ATTRIBUTE_FIELDS: &[&str] = &["inputType", "entityType"];

/// Input kinds whose allowed values are diffed one by one.
const CHOICE_INPUT_TYPES: &[&str] = &["DROPDOWN", "MULTISELECT", "SWATCH", "RADIO"];

/// Compares attribute definitions by name.
///
/// The same logic serves product and content attributes; the label and the
/// collection it reads are supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct AttributeComparator {
    entity_type: EntityType,
    select: fn(&ConfigTree) -> &[AttributeDefinition],
}

impl AttributeComparator {
    /// Creates a comparator for an arbitrary label and collection.
    #[must_use]
    pub const fn new(
        entity_type: EntityType,
        select: fn(&ConfigTree) -> &[AttributeDefinition],
    ) -> Self {
        Self {
            entity_type,
            select,
        }
    }

    /// Comparator for attributes used by product and variant types.
    #[must_use]
    pub const fn product() -> Self {
        Self::new(EntityType::ProductAttributes, product_attributes)
    }

    /// Comparator for attributes used by page types.
    #[must_use]
    pub const fn content() -> Self {
        Self::new(EntityType::ContentAttributes, content_attributes)
    }
}

fn product_attributes(tree: &ConfigTree) -> &[AttributeDefinition] {
    &tree.product_attributes
}

fn content_attributes(tree: &ConfigTree) -> &[AttributeDefinition] {
    &tree.content_attributes
}

impl EntityComparator for AttributeComparator {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        EntityMatcher::new(self.entity_type)
            .direction(direction)
            .run(
                (self.select)(desired),
                (self.select)(observed),
                attribute_changes,
            )
    }
}

fn is_choice(definition: &AttributeDefinition) -> bool {
    definition
        .input_type
        .as_deref()
        .is_some_and(|kind| CHOICE_INPUT_TYPES.contains(&kind.trim().to_uppercase().as_str()))
}

fn value_names(definition: &AttributeDefinition) -> Vec<&str> {
    let mut names: Vec<&str> = definition
        .values
        .iter()
        .map(|v| v.name().trim())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

fn attribute_changes(
    desired: &AttributeDefinition,
    observed: &AttributeDefinition,
) -> Vec<DiffChange> {
    let mut changes = fixed_field_changes("", observed, desired, ATTRIBUTE_FIELDS);

    if is_choice(desired) || (desired.input_type.is_none() && is_choice(observed)) {
        let wanted = value_names(desired);
        let current = value_names(observed);

        changes.extend(wanted.iter().filter(|v| !current.contains(*v)).map(|v| {
            field_change(
                "values",
                Value::Null,
                Value::from(*v),
                Some(format!("Value \"{v}\" added")),
            )
        }));
        changes.extend(current.iter().filter(|v| !wanted.contains(*v)).map(|v| {
            field_change(
                "values",
                Value::from(*v),
                Value::Null,
                Some(format!("Value \"{v}\" removed")),
            )
        }));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_values_diffed_individually() {
        let desired = tree(
            r"
productAttributes:
  - name: Color
    inputType: DROPDOWN
    values: [Red, Blue, Green]
",
        );
        let observed = tree(
            r"
productAttributes:
  - name: Color
    inputType: DROPDOWN
    values:
      - name: Blue
        slug: blue
      - name: Black
        slug: black
      - name: Red
        slug: red
",
        );
        let results = AttributeComparator::product()
            .compare(&desired, &observed)
            .unwrap();
        let descriptions: Vec<&str> = results[0]
            .changes
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Value \"Green\" added", "Value \"Black\" removed"]
        );
    }

    #[test]
    fn test_value_order_irrelevant() {
        let desired = tree(
            r"
contentAttributes:
  - name: Tone
    inputType: RADIO
    values: [Warm, Cold]
",
        );
        let observed = tree(
            r"
contentAttributes:
  - name: Tone
    inputType: RADIO
    values: [Cold, Warm]
",
        );
        let results = AttributeComparator::content()
            .compare(&desired, &observed)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_plain_text_values_ignored() {
        let desired = tree(
            r"
productAttributes:
  - name: Notes
    inputType: PLAIN_TEXT
",
        );
        let observed = tree(
            r"
productAttributes:
  - name: Notes
    inputType: PLAIN_TEXT
    values: [leftover]
",
        );
        let results = AttributeComparator::product()
            .compare(&desired, &observed)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_input_type_and_label() {
        let desired = tree(
            r"
contentAttributes:
  - name: Author
    inputType: REFERENCE
    entityType: PAGE
",
        );
        let observed = tree(
            r"
contentAttributes:
  - name: Author
    inputType: PLAIN_TEXT
",
        );
        let results = AttributeComparator::content()
            .compare(&desired, &observed)
            .unwrap();
        assert_eq!(results[0].entity_type, EntityType::ContentAttributes);
        let fields: Vec<&str> = results[0].changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["inputType", "entityType"]);
    }
}
