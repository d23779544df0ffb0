//! Configuration tree types shared by the desired and observed snapshots.
//!
//! This module defines all the structs that map to the `storesync.yaml` file.
//! The remote accessor produces the same tree, so the comparators see one
//! shape on both sides; fields that the platform spells differently are
//! modelled with the unions from [`super::reference`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::reference::{Amount, AttributeValueRef, EntityRef, WeightValue};

/// The root of a configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigTree {
    /// Shop-wide settings singleton.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<ShopSettings>,
    /// Sales channels.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Stock locations.
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    /// Shipping zones with their methods.
    #[serde(default)]
    pub shipping_zones: Vec<ShippingZone>,
    /// Tax classes with per-country rates.
    #[serde(default)]
    pub tax_classes: Vec<TaxClass>,
    /// Attributes used by product and variant types.
    #[serde(default)]
    pub product_attributes: Vec<AttributeDefinition>,
    /// Attributes used by page (content) types.
    #[serde(default)]
    pub content_attributes: Vec<AttributeDefinition>,
    /// Product types.
    #[serde(default)]
    pub product_types: Vec<ProductType>,
    /// Page types.
    #[serde(default)]
    pub page_types: Vec<PageType>,
    /// Category tree roots.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Product collections.
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// Catalog products.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Navigation menus.
    #[serde(default)]
    pub menus: Vec<Menu>,
}

/// Shop-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    /// Sender name for outgoing mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mail_sender_name: Option<String>,
    /// Sender address for outgoing mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mail_sender_address: Option<String>,
    /// Whether prices are displayed gross.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_gross_prices: Option<bool>,
    /// Whether new accounts must confirm their email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_account_confirmation_by_email: Option<bool>,
    /// Maximum quantity of one line per checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_quantity_per_checkout: Option<u32>,
    /// Whether new products track inventory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_inventory_by_default: Option<bool>,
    /// Stock reservation for anonymous checkouts, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_stock_duration_anonymous_user: Option<u32>,
    /// Stock reservation for signed-in checkouts, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_stock_duration_authenticated_user: Option<u32>,
    /// Download limit for digital products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_digital_max_downloads: Option<u32>,
    /// Validity of digital download links, in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_digital_url_valid_days: Option<u32>,
    /// Default weight unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_weight_unit: Option<String>,
    /// Whether unconfirmed accounts may sign in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_login_without_confirmation: Option<bool>,
    /// Whether fulfillments are approved automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_auto_approve: Option<bool>,
    /// Whether unpaid orders may be fulfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_allow_unpaid: Option<bool>,
    /// Shop description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Storefront header text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
}

/// A sales channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Currency used by the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Default country code.
    #[serde(default, alias = "country", skip_serializing_if = "Option::is_none")]
    pub default_country: Option<String>,
    /// Whether the channel is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Order and checkout settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ChannelSettings>,
}

/// Order and checkout settings of a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSettings {
    /// Stock allocation strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_strategy: Option<String>,
    /// Whether new orders are confirmed automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatically_confirm_all_new_orders: Option<bool>,
    /// Whether non-shippable gift cards are fulfilled automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatically_fulfill_non_shippable_gift_card: Option<bool>,
    /// Minutes after which unpaid orders expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_orders_after: Option<u32>,
    /// Days after which expired orders are deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_expired_orders_after: Option<u32>,
    /// Strategy used to mark orders as paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_as_paid_strategy: Option<String>,
    /// Whether unpaid orders are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unpaid_orders: Option<bool>,
    /// Whether draft orders count toward voucher usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_draft_order_in_voucher_usage: Option<bool>,
    /// Whether the legacy checkout error flow is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_error_flow: Option<bool>,
    /// Whether fully paid checkouts complete automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatically_complete_fully_paid_checkouts: Option<bool>,
    /// Default transaction flow strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_transaction_flow_strategy: Option<String>,
}

/// A stock location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the warehouse is private.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Click-and-collect mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_and_collect_option: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// A postal address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// First street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address1: Option<String>,
    /// Second street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address2: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// City area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_area: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Country area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_area: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A shipping zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingZone {
    /// Identity.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is the default zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// Member countries.
    #[serde(default)]
    pub countries: Vec<EntityRef>,
    /// Member warehouses.
    #[serde(default)]
    pub warehouses: Vec<EntityRef>,
    /// Member channels.
    #[serde(default)]
    pub channels: Vec<EntityRef>,
    /// Shipping methods offered in the zone.
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
}

/// A shipping method within a zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    /// Identity within the zone.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Method kind (PRICE or WEIGHT).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    /// Minimum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_delivery_days: Option<u32>,
    /// Maximum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_delivery_days: Option<u32>,
    /// Minimum order weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_order_weight: Option<WeightValue>,
    /// Maximum order weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_order_weight: Option<WeightValue>,
    /// Per-channel pricing.
    #[serde(default)]
    pub channel_listings: Vec<ShippingMethodChannelListing>,
}

/// Per-channel pricing of a shipping method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodChannelListing {
    /// Channel reference.
    pub channel: EntityRef,
    /// Price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    /// Minimum order price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_order_price: Option<Amount>,
    /// Maximum order price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_order_price: Option<Amount>,
}

/// A tax class.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxClass {
    /// Identity.
    #[serde(default)]
    pub name: String,
    /// Per-country rates.
    #[serde(default)]
    pub country_rates: Vec<CountryRate>,
}

/// A tax rate for one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryRate {
    /// ISO country code.
    pub country_code: String,
    /// Rate in percent.
    pub rate: f64,
}

/// An attribute definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Identity.
    #[serde(default)]
    pub name: String,
    /// Optional slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Input kind (DROPDOWN, PLAIN_TEXT, REFERENCE, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Reference target kind for REFERENCE inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Allowed values for choice-like inputs.
    #[serde(default)]
    pub values: Vec<AttributeValueRef>,
}

/// An attribute attached to a product or page type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AttributeAssignment {
    /// Reference to an attribute defined elsewhere.
    Reference {
        /// Referenced attribute name.
        attribute: String,
    },
    /// Inline attribute definition.
    Inline(AttributeDefinition),
}

impl AttributeAssignment {
    /// Returns the attribute name regardless of shape.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Reference { attribute } => attribute.as_str(),
            Self::Inline(def) => def.name.as_str(),
        }
    }
}

/// A product type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    /// Identity.
    #[serde(default)]
    pub name: String,
    /// Whether products of this type ship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shipping_required: Option<bool>,
    /// Product-level attributes.
    #[serde(default)]
    pub product_attributes: Vec<AttributeAssignment>,
    /// Variant-level attributes.
    #[serde(default)]
    pub variant_attributes: Vec<AttributeAssignment>,
}

/// A page type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageType {
    /// Identity.
    #[serde(default)]
    pub name: String,
    /// Page attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeAssignment>,
}

/// A category node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Description (plain text or rich-text document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Child categories.
    #[serde(default, alias = "children")]
    pub subcategories: Vec<Category>,
}

/// A product collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Description (plain text or rich-text document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Member products, by slug.
    #[serde(default)]
    pub products: Vec<EntityRef>,
    /// Per-channel publication state.
    #[serde(default)]
    pub channel_listings: Vec<CollectionChannelListing>,
}

/// Per-channel publication state of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionChannelListing {
    /// Channel reference.
    #[serde(alias = "channelSlug")]
    pub channel: EntityRef,
    /// Whether the collection is published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    /// Publication date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Description (plain text or rich-text document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// Product type, by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<EntityRef>,
    /// Category, by slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRef>,
    /// Tax class, by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_class: Option<EntityRef>,
    /// Attribute values by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Per-channel publication state.
    #[serde(default)]
    pub channel_listings: Vec<ProductChannelListing>,
    /// Sellable variants.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Media gallery.
    #[serde(default)]
    pub media: Vec<ProductMedia>,
}

/// Per-channel publication state of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductChannelListing {
    /// Channel reference.
    pub channel: EntityRef,
    /// Whether the product is published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    /// Publication date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Whether the product shows in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_in_listings: Option<bool>,
    /// Whether the product can be bought.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available_for_purchase: Option<bool>,
    /// Date from which the product can be bought.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_purchase_at: Option<String>,
}

/// A sellable product variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity within the product.
    #[serde(default)]
    pub sku: String,
    /// Shipping weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<WeightValue>,
    /// Attribute values by attribute name.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Per-channel pricing.
    #[serde(default)]
    pub channel_listings: Vec<VariantChannelListing>,
}

/// Per-channel pricing of a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantChannelListing {
    /// Channel reference.
    pub channel: EntityRef,
    /// Selling price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    /// Cost price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Amount>,
}

/// A media item of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMedia {
    /// External media URL.
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A navigation menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity.
    #[serde(default)]
    pub slug: String,
    /// Top-level items.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A menu item node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Identity within its parent.
    #[serde(default)]
    pub name: String,
    /// External link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Linked category slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Linked collection slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Linked page slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Child items.
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl ConfigTree {
    /// Returns the number of top-level entities across all sections.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        usize::from(self.shop.is_some())
            + self.channels.len()
            + self.warehouses.len()
            + self.shipping_zones.len()
            + self.tax_classes.len()
            + self.product_attributes.len()
            + self.content_attributes.len()
            + self.product_types.len()
            + self.page_types.len()
            + self.categories.len()
            + self.collections.len()
            + self.products.len()
            + self.menus.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_accepts_children_alias() {
        let yaml = r"
slug: electronics
children:
  - slug: laptops
";
        let category: Category = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(category.subcategories.len(), 1);
        assert_eq!(category.subcategories[0].slug, "laptops");
    }

    #[test]
    fn test_attribute_assignment_shapes() {
        let yaml = r"
- attribute: Color
- name: Size
  inputType: DROPDOWN
  values:
    - S
    - name: M
";
        let assignments: Vec<AttributeAssignment> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(assignments[0].name(), "Color");
        assert_eq!(assignments[1].name(), "Size");
        match &assignments[1] {
            AttributeAssignment::Inline(def) => assert_eq!(def.values.len(), 2),
            AttributeAssignment::Reference { .. } => panic!("expected inline definition"),
        }
    }

    #[test]
    fn test_empty_tree_defaults() {
        let tree: ConfigTree = serde_yaml::from_str("{}").unwrap();
        assert_eq!(tree.entity_count(), 0);
        assert!(tree.shop.is_none());
    }
}
