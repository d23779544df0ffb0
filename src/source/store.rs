//! Source trait definitions.
//!
//! This module defines the common interface for desired and observed
//! snapshot sources.

use async_trait::async_trait;

use crate::config::ConfigTree;
use crate::error::Result;

/// Source of the desired configuration.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Loads the desired configuration tree.
    ///
    /// # Errors
    ///
    /// Returns a configuration load error if the source is unreadable or
    /// unparsable.
    async fn load(&self) -> Result<ConfigTree>;

    /// Human-readable description of the source, used in logs.
    fn describe(&self) -> String;
}

/// Source of the observed configuration.
///
/// Implementations perform their own transport and authentication.
#[async_trait]
pub trait RemoteAccessor: Send + Sync {
    /// Retrieves the observed configuration tree.
    ///
    /// # Errors
    ///
    /// Returns a remote configuration error if retrieval fails.
    async fn retrieve(&self) -> Result<ConfigTree>;

    /// Human-readable description of the source, used in logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl ConfigurationStore for Box<dyn ConfigurationStore> {
    async fn load(&self) -> Result<ConfigTree> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl RemoteAccessor for Box<dyn RemoteAccessor> {
    async fn retrieve(&self) -> Result<ConfigTree> {
        (**self).retrieve().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
