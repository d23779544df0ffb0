//! Two-shape inputs and their canonical forms.
//!
//! The desired configuration usually spells references as bare strings,
//! while the remote platform returns nested objects. Each union below
//! accepts both spellings and exposes exactly one normalization function,
//! so comparators never coerce between shapes themselves.

use serde::{Deserialize, Serialize};

/// A reference to another entity: a bare key or a nested reference object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EntityRef {
    /// Bare key (slug, name or country code).
    Key(String),
    /// Nested reference object as returned by the remote platform.
    Object(RefObject),
}

/// Nested reference object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefObject {
    /// Country or currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Slug of the referenced entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Name of the referenced entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRef {
    /// Returns the canonical key: code, then slug, then name.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Key(key) => key.as_str(),
            Self::Object(obj) => obj
                .code
                .as_deref()
                .or(obj.slug.as_deref())
                .or(obj.name.as_deref())
                .unwrap_or_default(),
        }
    }
}

impl From<&str> for EntityRef {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

/// A monetary amount: a bare number or `{amount, currency}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    /// Bare number.
    Flat(f64),
    /// Nested money object.
    Nested {
        /// Numeric amount.
        amount: f64,
    },
}

impl Amount {
    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Flat(v) | Self::Nested { amount: v } => *v,
        }
    }
}

/// A weight: a bare number or `{value, unit}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WeightValue {
    /// Bare number.
    Flat(f64),
    /// Nested weight object.
    Nested {
        /// Numeric weight.
        value: f64,
        /// Unit label, ignored for comparison.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl WeightValue {
    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Flat(v) | Self::Nested { value: v, .. } => *v,
        }
    }
}

/// An attribute value: a bare name or `{name, slug}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AttributeValueRef {
    /// Bare value name.
    Plain(String),
    /// Nested value object.
    Named {
        /// Value name.
        name: String,
        /// Optional value slug.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
}

impl AttributeValueRef {
    /// Returns the value name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) | Self::Named { name, .. } => name.as_str(),
        }
    }
}

/// Normalizes a list of references into a sorted, de-duplicated key list.
#[must_use]
pub fn sorted_keys(refs: &[EntityRef]) -> Vec<String> {
    let mut keys: Vec<String> = refs
        .iter()
        .map(|r| r.key().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
