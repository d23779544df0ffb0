//! Result and summary types produced by the comparators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DiffSummaryError;

/// Reconciliation action for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffOperation {
    /// Entity exists only on the target side.
    Create,
    /// Entity exists on both sides and differs.
    Update,
    /// Entity exists only on the baseline side.
    Delete,
}

/// Label of the comparator that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// Shop settings singleton.
    #[serde(rename = "Shop Settings")]
    ShopSettings,
    /// Sales channels.
    #[serde(rename = "Channels")]
    Channels,
    /// Warehouses.
    #[serde(rename = "Warehouses")]
    Warehouses,
    /// Shipping zones.
    #[serde(rename = "Shipping Zones")]
    ShippingZones,
    /// Tax classes.
    #[serde(rename = "Tax Classes")]
    TaxClasses,
    /// Product attributes.
    #[serde(rename = "Product Attributes")]
    ProductAttributes,
    /// Content attributes.
    #[serde(rename = "Content Attributes")]
    ContentAttributes,
    /// Product types.
    #[serde(rename = "Product Types")]
    ProductTypes,
    /// Page types.
    #[serde(rename = "Page Types")]
    PageTypes,
    /// Categories.
    #[serde(rename = "Categories")]
    Categories,
    /// Collections.
    #[serde(rename = "Collections")]
    Collections,
    /// Products.
    #[serde(rename = "Products")]
    Products,
    /// Menus.
    #[serde(rename = "Menus")]
    Menus,
}

/// One attribute-level delta between a matched pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffChange {
    /// Dotted field path.
    pub field: String,
    /// Value on the observed side.
    pub current_value: Value,
    /// Value on the desired side.
    pub desired_value: Value,
    /// Human-readable description.
    pub description: String,
}

/// Reconciliation result for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Action to take.
    pub operation: DiffOperation,
    /// Comparator label.
    pub entity_type: EntityType,
    /// Entity identity.
    pub entity_name: String,
    /// Observed snapshot (UPDATE and DELETE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Value>,
    /// Desired snapshot (CREATE and UPDATE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<Value>,
    /// Field-level changes; never empty for UPDATE.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<DiffChange>,
}

/// Aggregated outcome of a comparison run.
///
/// Counts are always derived from `results`; they are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffSummary {
    results: Vec<DiffResult>,
}

/// Counts as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    /// Total number of results.
    pub total_changes: i64,
    /// Number of CREATE results.
    pub creates: i64,
    /// Number of UPDATE results.
    pub updates: i64,
    /// Number of DELETE results.
    pub deletes: i64,
}

impl EntityType {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShopSettings => "Shop Settings",
            Self::Channels => "Channels",
            Self::Warehouses => "Warehouses",
            Self::ShippingZones => "Shipping Zones",
            Self::TaxClasses => "Tax Classes",
            Self::ProductAttributes => "Product Attributes",
            Self::ContentAttributes => "Content Attributes",
            Self::ProductTypes => "Product Types",
            Self::PageTypes => "Page Types",
            Self::Categories => "Categories",
            Self::Collections => "Collections",
            Self::Products => "Products",
            Self::Menus => "Menus",
        }
    }
}

impl DiffSummary {
    /// Builds a summary from a flattened result list.
    #[must_use]
    pub const fn from_results(results: Vec<DiffResult>) -> Self {
        Self { results }
    }

    /// Returns all results.
    #[must_use]
    pub fn results(&self) -> &[DiffResult] {
        &self.results
    }

    /// Consumes the summary, returning its results.
    #[must_use]
    pub fn into_results(self) -> Vec<DiffResult> {
        self.results
    }

    /// Returns the total number of changes.
    #[must_use]
    pub const fn total_changes(&self) -> usize {
        self.results.len()
    }

    /// Returns the number of CREATE results.
    #[must_use]
    pub fn creates(&self) -> usize {
        self.count(DiffOperation::Create)
    }

    /// Returns the number of UPDATE results.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.count(DiffOperation::Update)
    }

    /// Returns the number of DELETE results.
    #[must_use]
    pub fn deletes(&self) -> usize {
        self.count(DiffOperation::Delete)
    }

    /// Returns true if there are any changes.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        !self.results.is_empty()
    }

    /// Returns the counts as reported to consumers.
    #[must_use]
    pub fn counts(&self) -> SummaryCounts {
        SummaryCounts {
            total_changes: to_count(self.total_changes()),
            creates: to_count(self.creates()),
            updates: to_count(self.updates()),
            deletes: to_count(self.deletes()),
        }
    }

    fn count(&self, operation: DiffOperation) -> usize {
        self.results
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }
}

impl SummaryCounts {
    /// Checks the count invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a count is negative or the per-operation counts
    /// do not add up to the total.
    pub fn validate(&self) -> Result<(), DiffSummaryError> {
        let fields = [
            ("totalChanges", self.total_changes),
            ("creates", self.creates),
            ("updates", self.updates),
            ("deletes", self.deletes),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, value)| *value < 0) {
            return Err(DiffSummaryError::NegativeCount { field, value });
        }

        if self.creates + self.updates + self.deletes != self.total_changes {
            return Err(DiffSummaryError::CountMismatch {
                total: self.total_changes,
                creates: self.creates,
                updates: self.updates,
                deletes: self.deletes,
            });
        }

        Ok(())
    }
}

impl Serialize for DiffSummary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let counts = self.counts();
        let mut state = serializer.serialize_struct("DiffSummary", 5)?;
        state.serialize_field("totalChanges", &counts.total_changes)?;
        state.serialize_field("creates", &counts.creates)?;
        state.serialize_field("updates", &counts.updates)?;
        state.serialize_field("deletes", &counts.deletes)?;
        state.serialize_field("results", &self.results)?;
        state.end()
    }
}

/// Renders a value for use in change descriptions.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the default `"<field>: <current> -> <desired>"` description.
#[must_use]
pub fn default_description(field: &str, current: &Value, desired: &Value) -> String {
    format!(
        "{field}: {} -> {}",
        display_value(current),
        display_value(desired)
    )
}

fn to_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl std::fmt::Display for DiffOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for DiffResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} \"{}\"", self.operation, self.entity_type, self.entity_name)?;
        if !self.changes.is_empty() {
            write!(f, " (")?;
            for (i, change) in self.changes.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", change.field)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
