//! Entity comparators.
//!
//! Each comparator is one strategy behind [`EntityComparator`]: it supplies
//! the identity rule and the field-comparison rule for one entity type and
//! borrows everything else from the kernel.

mod attribute;
mod category;
mod channel;
mod collection;
mod common;
mod grouping_type;
mod menu;
mod product;
mod shipping_zone;
mod shop;
mod tax_class;
mod warehouse;

#[cfg(test)]
mod scenarios;

pub use attribute::AttributeComparator;
pub use category::CategoryComparator;
pub use channel::ChannelComparator;
pub use collection::CollectionComparator;
pub use grouping_type::{PageTypeComparator, ProductTypeComparator};
pub use menu::MenuComparator;
pub use product::ProductComparator;
pub use shipping_zone::ShippingZoneComparator;
pub use shop::ShopComparator;
pub use tax_class::TaxClassComparator;
pub use warehouse::WarehouseComparator;

use super::kernel::Direction;
use super::selection::ConfigurationSection;
use super::types::{DiffResult, EntityType};
use crate::config::ConfigTree;
use crate::error::Result;

/// Strategy comparing one entity type across two configuration trees.
pub trait EntityComparator: Send + Sync {
    /// Label attached to every result of this comparator.
    fn entity_type(&self) -> EntityType;

    /// Compares a target tree against a baseline tree.
    ///
    /// `direction` names the source of `target`, so that duplicate
    /// tolerance and validation messages follow the source rather than the
    /// argument position.
    ///
    /// # Errors
    ///
    /// Returns an error if identity validation fails on either side.
    fn compare_directed(
        &self,
        target: &ConfigTree,
        baseline: &ConfigTree,
        direction: Direction,
    ) -> Result<Vec<DiffResult>>;

    /// Compares the desired tree against the observed tree.
    ///
    /// # Errors
    ///
    /// Returns an error if identity validation fails on either side.
    fn compare(&self, desired: &ConfigTree, observed: &ConfigTree) -> Result<Vec<DiffResult>> {
        self.compare_directed(desired, observed, Direction::Forward)
    }
}

/// Returns the comparators responsible for a section, in run order.
#[must_use]
pub fn comparators_for(section: ConfigurationSection) -> Vec<Box<dyn EntityComparator>> {
    match section {
        ConfigurationSection::Shop => vec![Box::new(ShopComparator)],
        ConfigurationSection::Channels => vec![Box::new(ChannelComparator)],
        ConfigurationSection::Warehouses => vec![Box::new(WarehouseComparator)],
        ConfigurationSection::ShippingZones => vec![Box::new(ShippingZoneComparator)],
        ConfigurationSection::TaxClasses => vec![Box::new(TaxClassComparator)],
        ConfigurationSection::Attributes => vec![
            Box::new(AttributeComparator::product()),
            Box::new(AttributeComparator::content()),
        ],
        ConfigurationSection::ProductTypes => vec![Box::new(ProductTypeComparator)],
        ConfigurationSection::PageTypes => vec![Box::new(PageTypeComparator)],
        ConfigurationSection::Categories => vec![Box::new(CategoryComparator)],
        ConfigurationSection::Collections => vec![Box::new(CollectionComparator)],
        ConfigurationSection::Products => vec![Box::new(ProductComparator)],
        ConfigurationSection::Menus => vec![Box::new(MenuComparator)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_section_has_comparators() {
        for section in ConfigurationSection::ALL {
            assert!(!comparators_for(section).is_empty(), "{section}");
        }
    }

    #[test]
    fn test_attributes_section_has_two_labels() {
        let labels: Vec<EntityType> = comparators_for(ConfigurationSection::Attributes)
            .iter()
            .map(|c| c.entity_type())
            .collect();
        assert_eq!(
            labels,
            vec![EntityType::ProductAttributes, EntityType::ContentAttributes]
        );
    }

    #[test]
    fn test_identical_trees_yield_nothing() {
        let tree: ConfigTree = serde_yaml::from_str(
            r"
shop:
  defaultMailSenderName: Store
channels:
  - slug: de
    currencyCode: EUR
categories:
  - slug: electronics
    subcategories:
      - slug: laptops
menus:
  - slug: main
    items:
      - name: A
      - name: B
",
        )
        .unwrap();

        for section in ConfigurationSection::ALL {
            for comparator in comparators_for(section) {
                assert!(comparator.compare(&tree, &tree).unwrap().is_empty());
            }
        }
    }
}
