//! Diff engine for storesync.
//!
//! This module turns two configuration trees into a list of per-entity
//! create/update/delete results:
//! - [`kernel`] holds the identity matching shared by every entity type
//! - [`comparators`] holds one strategy per entity type
//! - [`tree`] diffs recursive structures (category trees, menu items)
//! - [`normalize`] makes differently-shaped but equivalent values compare equal
//! - [`selection`] restricts a run to a subset of sections
//! - [`types`] holds the results and the aggregated summary

pub mod comparators;
pub mod kernel;
pub mod normalize;
pub mod selection;
pub mod tree;
pub mod types;

pub use comparators::{EntityComparator, comparators_for};
pub use kernel::Direction;
pub use selection::{ConfigurationSection, SectionSelection};
pub use types::{DiffChange, DiffOperation, DiffResult, DiffSummary, EntityType, SummaryCounts};
