//! Runtime options for a comparison run.

use std::time::Duration;
use tracing::debug;

use crate::diff::SectionSelection;
use crate::error::{ConfigurationLoadError, Result};

/// Environment variable overriding the comparator concurrency limit.
pub const ENV_CONCURRENCY: &str = "STORESYNC_CONCURRENCY";

/// Environment variable overriding the remote retrieval timeout.
pub const ENV_TIMEOUT_SECS: &str = "STORESYNC_TIMEOUT_SECS";

/// Default number of comparators allowed in flight.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;

/// Default remote retrieval timeout in seconds.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Options controlling how a comparison run is scheduled.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Maximum number of comparators running at once.
    pub concurrency_limit: usize,
    /// Upper bound on observed-snapshot retrieval.
    pub remote_timeout: Duration,
    /// Which sections to compare.
    pub selection: SectionSelection,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            selection: SectionSelection::all(),
        }
    }
}

impl DiffOptions {
    /// Sets the concurrency limit.
    #[must_use]
    pub const fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Sets the remote retrieval timeout.
    #[must_use]
    pub const fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Sets the section selection.
    #[must_use]
    pub fn with_selection(mut self, selection: SectionSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Applies `STORESYNC_CONCURRENCY` and `STORESYNC_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not a number.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(ENV_CONCURRENCY) {
            debug!("Overriding concurrency limit from environment");
            self.concurrency_limit = parse_number(&raw, ENV_CONCURRENCY)?;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            debug!("Overriding remote timeout from environment");
            self.remote_timeout = Duration::from_secs(parse_number(&raw, ENV_TIMEOUT_SECS)?);
        }

        Ok(self)
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns an error if the concurrency limit or timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(ConfigurationLoadError::validation(
                "Concurrency limit must be at least 1",
                "concurrency_limit",
            )
            .into());
        }

        if self.remote_timeout.is_zero() {
            return Err(ConfigurationLoadError::validation(
                "Remote timeout must be greater than zero",
                "remote_timeout",
            )
            .into());
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        ConfigurationLoadError::validation(format!("{name} must be a number, got '{raw}'"), name)
            .into()
    })
}
