//! Menu tree comparator.

use super::EntityComparator;
use super::common::text_change;
use crate::config::{ConfigTree, Menu, MenuItem};
use crate::diff::kernel::{Direction, EntityMatcher, fixed_field_changes};
use crate::diff::tree::{TreeShape, diff_tree};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const ITEM_FIELDS: &[&str] = &["url", "category", "collection", "page"];

const MENU_TREE: TreeShape<MenuItem> = TreeShape {
    key_of: item_name,
    label_of: item_name,
    children_of: item_children,
    node_changes: item_fields,
    children_field: "children",
    noun: "item",
    detect_reorder: true,
};

/// Compares menus by slug and their items by name at every level.
///
/// Unlike categories, a pure reordering of items is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuComparator;

impl EntityComparator for MenuComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Menus
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        EntityMatcher::new(self.entity_type())
            .direction(direction)
            .run(&desired.menus, &observed.menus, menu_changes)
    }
}

fn menu_changes(desired: &Menu, observed: &Menu) -> Vec<DiffChange> {
    let mut changes: Vec<DiffChange> =
        text_change("name", observed.name.as_deref(), desired.name.as_deref())
            .into_iter()
            .collect();

    let label = desired.name.as_deref().unwrap_or(&desired.slug);
    changes.extend(diff_tree(
        &desired.items,
        &observed.items,
        &MENU_TREE,
        "items",
        label,
    ));
    changes
}

fn item_name(item: &MenuItem) -> &str {
    &item.name
}

fn item_children(item: &MenuItem) -> &[MenuItem] {
    &item.children
}

fn item_fields(desired: &MenuItem, observed: &MenuItem, path: &str) -> Vec<DiffChange> {
    fixed_field_changes(path, observed, desired, ITEM_FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menus(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_nested_reorder_path() {
        let desired = menus(
            r"
menus:
  - slug: main
    items:
      - name: Shop
        children:
          - name: Laptops
          - name: Phones
",
        );
        let observed = menus(
            r"
menus:
  - slug: main
    items:
      - name: Shop
        children:
          - name: Phones
          - name: Laptops
",
        );
        let results = MenuComparator.compare(&desired, &observed).unwrap();
        assert_eq!(results[0].changes.len(), 1);
        assert_eq!(results[0].changes[0].field, "items.Shop.children.order");
    }

    #[test]
    fn test_item_link_change() {
        let desired = menus(
            r"
menus:
  - slug: main
    items:
      - name: Laptops
        category: laptops
",
        );
        let observed = menus(
            r"
menus:
  - slug: main
    items:
      - name: Laptops
        category: notebooks
",
        );
        let results = MenuComparator.compare(&desired, &observed).unwrap();
        let change = &results[0].changes[0];
        assert_eq!(change.field, "items.Laptops.category");
        assert_eq!(change.description, "items.Laptops.category: notebooks -> laptops");
    }

    #[test]
    fn test_item_added_mentions_parent() {
        let desired = menus(
            r"
menus:
  - slug: main
    name: Main
    items:
      - name: Sale
",
        );
        let observed = menus(
            r"
menus:
  - slug: main
    name: Main
",
        );
        let results = MenuComparator.compare(&desired, &observed).unwrap();
        assert_eq!(results[0].changes[0].description, "Item \"Sale\" added to \"Main\"");
    }
}
