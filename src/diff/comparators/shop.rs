//! Shop settings singleton comparator.

use super::EntityComparator;
use crate::config::ConfigTree;
use crate::diff::kernel::{
    Direction, create_result, delete_result, fixed_field_changes, update_result,
};
use crate::diff::types::{DiffResult, EntityType};
use crate::error::Result;

const SHOP_FIELDS: &[&str] = &[
    "defaultMailSenderName",
    "defaultMailSenderAddress",
    "displayGrossPrices",
    "enableAccountConfirmationByEmail",
    "limitQuantityPerCheckout",
    "trackInventoryByDefault",
    "reserveStockDurationAnonymousUser",
    "reserveStockDurationAuthenticatedUser",
    "defaultDigitalMaxDownloads",
    "defaultDigitalUrlValidDays",
    "defaultWeightUnit",
    "allowLoginWithoutConfirmation",
    "fulfillmentAutoApprove",
    "fulfillmentAllowUnpaid",
    "description",
    "headerText",
];

/// Compares the shop settings singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopComparator;

impl EntityComparator for ShopComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::ShopSettings
    }

    fn compare_directed(
        &self,
        desired: &ConfigTree,
        observed: &ConfigTree,
        _direction: Direction,
    ) -> Result<Vec<DiffResult>> {
        let entity_type = self.entity_type();
        let name = entity_type.label();

        let results = match (desired.shop.as_ref(), observed.shop.as_ref()) {
            (None, None) => Vec::new(),
            (None, Some(current)) => vec![delete_result(entity_type, name, current)],
            (Some(wanted), None) => vec![create_result(entity_type, name, wanted, Vec::new())],
            (Some(wanted), Some(current)) => {
                let changes = fixed_field_changes("", current, wanted, SHOP_FIELDS);
                if changes.is_empty() {
                    Vec::new()
                } else {
                    vec![update_result(entity_type, name, current, wanted, changes)]
                }
            }
        };

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopSettings;
    use crate::diff::types::DiffOperation;
    use serde_json::json;

    fn tree(shop: Option<ShopSettings>) -> ConfigTree {
        ConfigTree {
            shop,
            ..Default::default()
        }
    }

    fn settings(name: &str, track: bool) -> ShopSettings {
        ShopSettings {
            default_mail_sender_name: Some(name.to_string()),
            track_inventory_by_default: Some(track),
            ..Default::default()
        }
    }

    #[test]
    fn test_three_way_branch() {
        let cmp = ShopComparator;
        assert!(cmp.compare(&tree(None), &tree(None)).unwrap().is_empty());

        let deleted = cmp
            .compare(&tree(None), &tree(Some(settings("A", true))))
            .unwrap();
        assert_eq!(deleted[0].operation, DiffOperation::Delete);

        let created = cmp
            .compare(&tree(Some(settings("A", true))), &tree(None))
            .unwrap();
        assert_eq!(created[0].operation, DiffOperation::Create);
        assert_eq!(created[0].entity_name, "Shop Settings");
    }

    #[test]
    fn test_fixed_field_diff() {
        let results = ShopComparator
            .compare(
                &tree(Some(settings("New", true))),
                &tree(Some(settings("Old", true))),
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].changes.len(), 1);
        assert_eq!(results[0].changes[0].field, "defaultMailSenderName");
        assert_eq!(results[0].changes[0].current_value, json!("Old"));
    }

    #[test]
    fn test_unmanaged_fields_ignored() {
        let desired = ShopSettings {
            default_mail_sender_name: Some(String::from("A")),
            ..Default::default()
        };
        let results = ShopComparator
            .compare(&tree(Some(desired)), &tree(Some(settings("A", false))))
            .unwrap();
        assert!(results.is_empty());
    }
}
