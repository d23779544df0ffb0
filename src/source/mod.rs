//! Snapshot sources.
//!
//! This module provides the two input collaborators of a comparison run:
//! - [`ConfigurationStore`] loads the desired configuration
//! - [`RemoteAccessor`] retrieves the observed configuration
//!
//! File-backed implementations of both live in [`local`]; the HTTP
//! accessor for the live platform lives in [`remote`].

mod local;
mod remote;
mod store;

pub use local::{FileConfigurationStore, SnapshotFileAccessor};
pub use remote::HttpRemoteAccessor;
pub use store::{ConfigurationStore, RemoteAccessor};
