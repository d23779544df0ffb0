//! Sales channel comparator.

use super::EntityComparator;
use super::common::text_change;
use crate::config::{Channel, ConfigTree};
use crate::diff::kernel::{Direction, EntityMatcher, fixed_field_changes};
use crate::diff::types::{DiffChange, DiffResult, EntityType};
use crate::error::Result;

const CHANNEL_FLAGS: &[&str] = &["isActive"];

const SETTINGS_FIELDS: &[&str] = &[
    "allocationStrategy",
    "automaticallyConfirmAllNewOrders",
    "automaticallyFulfillNonShippableGiftCard",
    "expireOrdersAfter",
    "deleteExpiredOrdersAfter",
    "markAsPaidStrategy",
    "allowUnpaidOrders",
    "includeDraftOrderInVoucherUsage",
    "useLegacyErrorFlow",
    "automaticallyCompleteFullyPaidCheckouts",
    "defaultTransactionFlowStrategy",
];

/// Compares sales channels by slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelComparator;

impl EntityComparator for ChannelComparator {
    fn entity_type(&self) -> EntityType {
        EntityType::Channels
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
                &desired.channels,
                &observed.channels,
                channel_changes,
            )
    }
}

fn channel_changes(desired: &Channel, observed: &Channel) -> Vec<DiffChange> {
    let mut changes: Vec<DiffChange> = [
        text_change("name", observed.name.as_deref(), desired.name.as_deref()),
        text_change(
            "currencyCode",
            observed.currency_code.as_deref(),
            desired.currency_code.as_deref(),
        ),
        text_change(
            "defaultCountry",
            observed.default_country.as_deref(),
            desired.default_country.as_deref(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect();
    changes.extend(fixed_field_changes("", observed, desired, CHANNEL_FLAGS));

    if let Some(wanted) = &desired.settings {
        let current = observed.settings.clone().unwrap_or_default();
        changes.extend(fixed_field_changes(
            "settings",
            &current,
            wanted,
            SETTINGS_FIELDS,
        ));
    }

    changes
}
