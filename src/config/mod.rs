//! Configuration module for storesync.
//!
//! This module handles all configuration-related functionality:
//! - The configuration tree shared by desired and observed snapshots
//! - Normalization of two-shape references
//! - Loading snapshots from YAML/JSON files and the environment
//! - Runtime options for a comparison run

mod options;
mod parser;
mod reference;
mod spec;

pub use options::{
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_REMOTE_TIMEOUT_SECS, DiffOptions, ENV_CONCURRENCY,
    ENV_TIMEOUT_SECS,
};
pub use parser::{
    ConfigFormat, ConfigParser, DEFAULT_CONFIG_FILES, ENV_REMOTE_TOKEN, ENV_REMOTE_URL,
    find_config_file,
};
pub use reference::{Amount, AttributeValueRef, EntityRef, RefObject, WeightValue, sorted_keys};
pub use spec::{
    Address, AttributeAssignment, AttributeDefinition, Category, Channel, ChannelSettings,
    Collection, CollectionChannelListing, ConfigTree, CountryRate, Menu, MenuItem, PageType,
    Product, ProductChannelListing, ProductMedia, ProductType, ProductVariant, ShippingMethod,
    ShippingMethodChannelListing, ShippingZone, ShopSettings, TaxClass, VariantChannelListing,
    Warehouse,
};
