//! Error types for the storesync diff engine.
//!
//! This module provides the error hierarchy for every phase of a comparison
//! run: loading the desired configuration, retrieving the observed
//! configuration, validating entity identities, running comparators and
//! checking summary invariants.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for storesync.
#[derive(Debug, Error)]
pub enum StoresyncError {
    /// The desired configuration could not be loaded.
    #[error("Configuration load error: {0}")]
    ConfigurationLoad(#[from] ConfigurationLoadError),

    /// The observed configuration could not be retrieved.
    #[error("Remote configuration error: {0}")]
    RemoteConfiguration(#[from] RemoteConfigurationError),

    /// An entity collection failed identity validation.
    #[error("Entity validation error: {0}")]
    EntityValidation(#[from] EntityValidationError),

    /// A comparator failed for a reason other than identity validation.
    #[error("Diff comparison error: {0}")]
    DiffComparison(#[from] DiffComparisonError),

    /// A summary violated its count invariants.
    #[error("Diff summary error: {0}")]
    DiffSummary(#[from] DiffSummaryError),

    /// The section selection is invalid.
    #[error("Section selection error: {0}")]
    Selection(#[from] SelectionError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading the desired configuration.
#[derive(Debug, Error)]
pub enum ConfigurationLoadError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be read or parsed.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A configuration or option value is invalid.
    #[error("Configuration validation failed: {message}")]
    Validation {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },
}

/// Errors raised while retrieving the observed configuration.
#[derive(Debug, Error)]
pub enum RemoteConfigurationError {
    /// Retrieval did not finish within the configured timeout.
    #[error("Timed out after {timeout:?} retrieving remote configuration")]
    Timeout {
        /// Timeout that was exceeded.
        timeout: Duration,
    },

    /// The remote platform rejected the credentials.
    #[error("Remote authentication failed: {message}")]
    Authentication {
        /// Description of the auth failure.
        message: String,
    },

    /// The remote platform answered with a non-success status.
    #[error("Remote request failed: {status} - {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the platform.
        message: String,
    },

    /// Transport-level failure.
    #[error("Network error communicating with remote platform: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The response could not be decoded into a configuration tree.
    #[error("Invalid response from remote platform: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Which snapshot an entity collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The desired (local) configuration.
    Desired,
    /// The observed (remote) configuration.
    Observed,
}

/// Identity validation failures within one side of one entity collection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityValidationError {
    /// An entity has no usable identity value.
    #[error("{entity_type} entity at position {index} in {side} configuration has no {field}")]
    MissingIdentity {
        /// Entity type label.
        entity_type: String,
        /// Name of the identity field.
        field: &'static str,
        /// Position of the entity in its collection.
        index: usize,
        /// Side the entity came from.
        side: Side,
    },

    /// One or more identities appear more than once.
    #[error("Duplicate {entity_type} identifiers in {side} configuration: {}", .identifiers.join(", "))]
    DuplicateIdentifiers {
        /// Entity type label.
        entity_type: String,
        /// Every duplicated identifier, each listed once.
        identifiers: Vec<String>,
        /// Side the collection came from.
        side: Side,
    },
}

/// A comparator failed while processing a specific section.
#[derive(Debug, Error)]
#[error("Comparison of section '{section}' failed: {message}")]
pub struct DiffComparisonError {
    /// Section whose comparator failed.
    pub section: String,
    /// Description of the failure.
    pub message: String,
}

/// Summary count invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffSummaryError {
    /// A count is negative.
    #[error("Summary count '{field}' is negative: {value}")]
    NegativeCount {
        /// Name of the count.
        field: &'static str,
        /// Offending value.
        value: i64,
    },

    /// Per-operation counts do not add up to the total.
    #[error(
        "Summary counts are inconsistent: {creates} creates + {updates} updates + {deletes} deletes != {total} total"
    )]
    CountMismatch {
        /// Total change count.
        total: i64,
        /// Create count.
        creates: i64,
        /// Update count.
        updates: i64,
        /// Delete count.
        deletes: i64,
    },
}

/// Section selection errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A section name is not recognized.
    #[error("Unknown configuration section: {name}")]
    UnknownSection {
        /// The unrecognized name.
        name: String,
    },

    /// The same sections were both included and excluded.
    #[error("Sections listed in both include and exclude: {}", .sections.join(", "))]
    Conflict {
        /// Sections present in both lists.
        sections: Vec<String>,
    },
}

/// Result type alias for storesync operations.
pub type Result<T> = std::result::Result<T, StoresyncError>;

impl StoresyncError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the error comes from the remote side.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteConfiguration(_))
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Desired => "desired",
            Self::Observed => "observed",
        };
        write!(f, "{s}")
    }
}

impl ConfigurationLoadError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a parse error with an optional location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location,
        }
    }
}

impl RemoteConfigurationError {
    /// Creates a request error.
    #[must_use]
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }
}

impl DiffComparisonError {
    /// Creates a comparison error for a section.
    #[must_use]
    pub fn new(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_lists_every_identifier() {
        let err = EntityValidationError::DuplicateIdentifiers {
            entity_type: String::from("Channels"),
            identifiers: vec![String::from("de"), String::from("us")],
            side: Side::Desired,
        };
        assert_eq!(
            err.to_string(),
            "Duplicate Channels identifiers in desired configuration: de, us"
        );
    }

    #[test]
    fn test_comparison_error_names_section() {
        let err = StoresyncError::from(DiffComparisonError::new("products", "boom"));
        assert!(err.to_string().contains("'products'"));
        assert!(!err.is_remote());
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = RemoteConfigurationError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms retrieving remote configuration"
        );
    }
}
