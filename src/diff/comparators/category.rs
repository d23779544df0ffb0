//! Category tree comparator.

use super::EntityComparator;
use super::common::{description_change, text_change};
use crate::config::{Category, ConfigTree};
use crate::diff::kernel::{Direction, EntityMatcher, join_path};
use crate::diff::tree::{TreeShape, diff_tree};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const CATEGORY_TREE: TreeShape<Category> = TreeShape {
    key_of: category_key,
    label_of: category_label,
    children_of: category_children,
    node_changes: category_fields,
    children_field: "subcategories",
    noun: "subcategory",
    detect_reorder: false,
};

/// Compares category trees by slug at every level.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryComparator;

impl EntityComparator for CategoryComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Categories
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
                &desired.categories,
                &observed.categories,
                category_changes,
            )
    }
}

fn category_changes(desired: &Category, observed: &Category) -> Vec<DiffChange> {
    let mut changes = category_fields(desired, observed, "");
    changes.extend(diff_tree(
        &desired.subcategories,
        &observed.subcategories,
        &CATEGORY_TREE,
        CATEGORY_TREE.children_field,
        category_label(desired),
    ));
    changes
}

fn category_key(category: &Category) -> &str {
    &category.slug
}

fn category_label(category: &Category) -> &str {
    category.name.as_deref().unwrap_or(&category.slug)
}

fn category_children(category: &Category) -> &[Category] {
    &category.subcategories
}

fn category_fields(desired: &Category, observed: &Category, path: &str) -> Vec<DiffChange> {
    [
        text_change(
            join_path(path, "name"),
            observed.name.as_deref(),
            desired.name.as_deref(),
        ),
        description_change(
            join_path(path, "description"),
            observed.description.as_ref(),
            desired.description.as_ref(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::DiffOperation;

    fn categories(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_nested_child_removed() {
        let desired = categories(
            r"
categories:
  - slug: electronics
    name: Electronics
    subcategories:
      - slug: computers
        name: Computers
        subcategories: []
",
        );
        let observed = categories(
            r"
categories:
  - slug: electronics
    name: Electronics
    subcategories:
      - slug: computers
        name: Computers
        subcategories:
          - slug: tablets
            name: Tablets
",
        );

        let results = CategoryComparator.compare(&desired, &observed).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].operation, DiffOperation::Update);
        let change = &results[0].changes[0];
        assert_eq!(change.field, "subcategories.computers.subcategories");
        assert_eq!(change.description, "Subcategory \"Tablets\" removed from \"Computers\"");
    }

    #[test]
    fn test_description_formatting_ignored() {
        let desired = categories(
            r#"
categories:
  - slug: electronics
    description: "Gadgets & more"
"#,
        );
        let observed = categories(
            r#"
categories:
  - slug: electronics
    description: '{"blocks": [{"type": "paragraph", "data": {"text": "<b>Gadgets</b> &amp; more"}}]}'
"#,
        );
        assert!(CategoryComparator.compare(&desired, &observed).unwrap().is_empty());
    }

    #[test]
    fn test_child_name_change() {
        let desired = categories(
            r"
categories:
  - slug: electronics
    subcategories:
      - slug: laptops
        name: Notebooks
",
        );
        let observed = categories(
            r"
categories:
  - slug: electronics
    subcategories:
      - slug: laptops
        name: Laptops
",
        );
        let results = CategoryComparator.compare(&desired, &observed).unwrap();
        assert_eq!(results[0].changes[0].field, "subcategories.laptops.name");
    }
}
