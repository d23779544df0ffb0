//! Reconciler comparing desired and observed configuration.
//!
//! This module implements the comparison run: both snapshots are loaded
//! concurrently, every selected section is handed to its comparators on a
//! bounded pool, and the results are aggregated into one summary.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::{ConfigTree, DiffOptions};
use crate::diff::{
    ConfigurationSection, Direction, DiffResult, DiffSummary, EntityComparator, comparators_for,
};
use crate::error::{DiffComparisonError, RemoteConfigurationError, Result, StoresyncError};
use crate::source::{ConfigurationStore, RemoteAccessor};

/// Reconciler comparing a desired store against a remote accessor.
pub struct Reconciler<'a, S: ConfigurationStore, R: RemoteAccessor> {
    /// Desired configuration source.
    store: &'a S,
    /// Observed configuration source.
    remote: &'a R,
    /// Scheduling and selection options.
    options: DiffOptions,
}

impl<'a, S: ConfigurationStore, R: RemoteAccessor> Reconciler<'a, S, R> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(store: &'a S, remote: &'a R, options: DiffOptions) -> Self {
        Self {
            store,
            remote,
            options,
        }
    }

    /// Returns the options of this reconciler.
    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Computes what must change on the remote platform to match the
    /// desired configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot cannot be obtained, if retrieval
    /// times out, or if any comparator fails.
    pub async fn compare(&self) -> Result<DiffSummary> {
        let (desired, observed) = self.load_snapshots().await?;
        self.diff_snapshots(desired, observed).await
    }

    /// Computes what must change in the local file to match the remote
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Self::compare`].
    pub async fn compare_for_introspect(&self) -> Result<DiffSummary> {
        let (desired, observed) = self.load_snapshots().await?;
        self.introspect_snapshots(desired, observed).await
    }

    /// Compares two already materialized trees, oriented towards the
    /// remote platform.
    ///
    /// Sections are aggregated in their fixed order regardless of which
    /// comparator finishes first.
    ///
    /// # Errors
    ///
    /// Returns the first comparator failure; no partial summary is returned.
    pub async fn diff_snapshots(
        &self,
        desired: ConfigTree,
        observed: ConfigTree,
    ) -> Result<DiffSummary> {
        self.run_sections(desired, observed, Direction::Forward).await
    }

    /// Compares two already materialized trees, oriented towards the local
    /// file.
    ///
    /// The observed tree becomes the target: CREATE means "add to the file"
    /// and every description reads in that direction. Duplicate tolerance
    /// stays with the observed tree.
    ///
    /// # Errors
    ///
    /// Returns the first comparator failure; no partial summary is returned.
    pub async fn introspect_snapshots(
        &self,
        desired: ConfigTree,
        observed: ConfigTree,
    ) -> Result<DiffSummary> {
        self.run_sections(observed, desired, Direction::Introspect).await
    }

    /// Loads both snapshots concurrently.
    async fn load_snapshots(&self) -> Result<(ConfigTree, ConfigTree)> {
        self.options.validate()?;
        info!(
            "Comparing {} against {}",
            self.store.describe(),
            self.remote.describe()
        );

        tokio::try_join!(self.store.load(), self.retrieve_observed())
    }

    async fn run_sections(
        &self,
        target: ConfigTree,
        baseline: ConfigTree,
        direction: Direction,
    ) -> Result<DiffSummary> {
        let sections = self.options.selection.sections();
        debug!(
            "Running {} section(s) ({direction:?}) with concurrency limit {}",
            sections.len(),
            self.options.concurrency_limit
        );

        let target = Arc::new(target);
        let baseline = Arc::new(baseline);
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency_limit.max(1)));
        let mut tasks = JoinSet::new();

        for section in sections {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| StoresyncError::internal(format!("Comparator pool closed: {e}")))?;
            let target = Arc::clone(&target);
            let baseline = Arc::clone(&baseline);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let comparators = comparators_for(section);
                let outcome = run_comparators(section, &comparators, &target, &baseline, direction);
                (section, outcome)
            });
        }

        let mut by_section: BTreeMap<ConfigurationSection, Vec<DiffResult>> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (section, outcome) = joined
                .map_err(|e| StoresyncError::internal(format!("Comparator task failed: {e}")))?;
            match outcome {
                Ok(results) => {
                    by_section.insert(section, results);
                }
                Err(e) => {
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        let summary = DiffSummary::from_results(by_section.into_values().flatten().collect());
        info!(
            "Comparison finished: {} change(s) ({} create, {} update, {} delete)",
            summary.total_changes(),
            summary.creates(),
            summary.updates(),
            summary.deletes()
        );
        Ok(summary)
    }

    /// Retrieves the observed tree, bounded by the configured timeout.
    async fn retrieve_observed(&self) -> Result<ConfigTree> {
        let limit = self.options.remote_timeout;
        tokio::time::timeout(limit, self.remote.retrieve())
            .await
            .map_err(|_| RemoteConfigurationError::Timeout { timeout: limit })?
    }
}

/// Runs the comparators of one section in order.
///
/// Identity validation failures pass through unchanged; anything else,
/// panics included, is reported against the section.
fn run_comparators(
    section: ConfigurationSection,
    comparators: &[Box<dyn EntityComparator>],
    target: &ConfigTree,
    baseline: &ConfigTree,
    direction: Direction,
) -> Result<Vec<DiffResult>> {
    let mut results = Vec::new();

    for comparator in comparators {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            comparator.compare_directed(target, baseline, direction)
        }))
        .map_err(|_| DiffComparisonError::new(section.key(), "comparator panicked"))?;

        let found = outcome.map_err(|e| match e {
            StoresyncError::EntityValidation(_) => e,
            other => DiffComparisonError::new(section.key(), other.to_string()).into(),
        })?;

        debug!(
            "{}: {} result(s)",
            comparator.entity_type().label(),
            found.len()
        );
        results.extend(found);
    }

    Ok(results)
}
