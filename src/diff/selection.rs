//! Section selection: which parts of the configuration get compared.

use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use crate::error::SelectionError;

/// A named, independently selectable part of the configuration.
///
/// Declaration order is the order in which section results are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigurationSection {
    /// Shop settings.
    Shop,
    /// Sales channels.
    Channels,
    /// Warehouses.
    Warehouses,
    /// Shipping zones.
    ShippingZones,
    /// Tax classes.
    TaxClasses,
    /// Product and content attributes.
    Attributes,
    /// Product types.
    ProductTypes,
    /// Page types.
    PageTypes,
    /// Categories.
    Categories,
    /// Collections.
    Collections,
    /// Products.
    Products,
    /// Menus.
    Menus,
}

/// Include/exclude policy over configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSelection {
    include: BTreeSet<ConfigurationSection>,
    exclude: BTreeSet<ConfigurationSection>,
}

impl ConfigurationSection {
    /// Every section, in aggregation order.
    pub const ALL: [Self; 12] = [
        Self::Shop,
        Self::Channels,
        Self::Warehouses,
        Self::ShippingZones,
        Self::TaxClasses,
        Self::Attributes,
        Self::ProductTypes,
        Self::PageTypes,
        Self::Categories,
        Self::Collections,
        Self::Products,
        Self::Menus,
    ];

    /// Returns the configuration key of the section.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Channels => "channels",
            Self::Warehouses => "warehouses",
            Self::ShippingZones => "shippingZones",
            Self::TaxClasses => "taxClasses",
            Self::Attributes => "attributes",
            Self::ProductTypes => "productTypes",
            Self::PageTypes => "pageTypes",
            Self::Categories => "categories",
            Self::Collections => "collections",
            Self::Products => "products",
            Self::Menus => "menus",
        }
    }
}

impl FromStr for ConfigurationSection {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|section| section.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| SelectionError::UnknownSection {
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for ConfigurationSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl SectionSelection {
    /// Selects every section.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a selection from include and exclude lists.
    ///
    /// A non-empty include list selects exactly those sections and makes the
    /// exclude list irrelevant; an empty include list selects everything
    /// except the excluded sections.
    ///
    /// # Errors
    ///
    /// Returns an error if any section appears in both lists.
    pub fn new(
        include: impl IntoIterator<Item = ConfigurationSection>,
        exclude: impl IntoIterator<Item = ConfigurationSection>,
    ) -> Result<Self, SelectionError> {
        let include: BTreeSet<_> = include.into_iter().collect();
        let exclude: BTreeSet<_> = exclude.into_iter().collect();

        let conflicts: Vec<String> = include
            .intersection(&exclude)
            .map(ToString::to_string)
            .collect();
        if !conflicts.is_empty() {
            return Err(SelectionError::Conflict {
                sections: conflicts,
            });
        }

        if !include.is_empty() && !exclude.is_empty() {
            debug!("Include list given, exclude list has no effect");
        }

        Ok(Self { include, exclude })
    }

    /// Returns true if the section should be compared.
    #[must_use]
    pub fn includes(&self, section: ConfigurationSection) -> bool {
        if self.include.is_empty() {
            !self.exclude.contains(&section)
        } else {
            self.include.contains(&section)
        }
    }

    /// Returns the selected sections in aggregation order.
    #[must_use]
    pub fn sections(&self) -> Vec<ConfigurationSection> {
        ConfigurationSection::ALL
            .into_iter()
            .filter(|s| self.includes(*s))
            .collect()
    }
}
