//! File-backed snapshot sources.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{ConfigParser, ConfigTree};
use crate::error::{RemoteConfigurationError, Result, StoresyncError};

use super::store::{ConfigurationStore, RemoteAccessor};

/// Desired configuration read from a YAML or JSON file.
#[derive(Debug)]
pub struct FileConfigurationStore {
    /// Path to the configuration file.
    path: PathBuf,
    /// Parser used to read the file.
    parser: ConfigParser,
}

impl FileConfigurationStore {
    /// Creates a store reading the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            path,
            parser: ConfigParser::new().with_base_path(base),
        }
    }

    /// Returns the path of the configuration file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the `.env` file that sits next to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        self.parser.load_dotenv()
    }
}

#[async_trait]
impl ConfigurationStore for FileConfigurationStore {
    async fn load(&self) -> Result<ConfigTree> {
        self.parser.load_file(&self.path).await
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Observed configuration read from a previously exported snapshot file.
///
/// Any failure is reported as a remote configuration error, since the file
/// stands in for the live platform.
#[derive(Debug)]
pub struct SnapshotFileAccessor {
    /// Path to the snapshot file.
    path: PathBuf,
}

impl SnapshotFileAccessor {
    /// Creates an accessor reading the given snapshot file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RemoteAccessor for SnapshotFileAccessor {
    async fn retrieve(&self) -> Result<ConfigTree> {
        debug!("Reading observed snapshot from: {}", self.path.display());
        ConfigParser::new()
            .load_file(&self.path)
            .await
            .map_err(|e| match e {
                StoresyncError::ConfigurationLoad(inner) => {
                    RemoteConfigurationError::InvalidResponse {
                        message: inner.to_string(),
                    }
                    .into()
                }
                other => other,
            })
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_store_loads_yaml() {
        let file = write_file(".yaml", "channels:\n  - slug: de\n    currencyCode: EUR\n");
        let store = FileConfigurationStore::new(file.path());
        let tree = store.load().await.unwrap();
        assert_eq!(tree.channels.len(), 1);
        assert_eq!(tree.channels[0].slug, "de");
        assert!(store.describe().starts_with("file "));
    }

    #[tokio::test]
    async fn test_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigurationStore::new(dir.path().join("absent.yaml"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoresyncError::ConfigurationLoad(_)));
    }

    #[tokio::test]
    async fn test_snapshot_reads_json() {
        let file = write_file(".json", r#"{"warehouses": [{"slug": "berlin"}]}"#);
        let accessor = SnapshotFileAccessor::new(file.path());
        let tree = accessor.retrieve().await.unwrap();
        assert_eq!(tree.warehouses[0].slug, "berlin");
    }

    #[tokio::test]
    async fn test_snapshot_failure_is_remote() {
        let file = write_file(".json", "{not json");
        let accessor = SnapshotFileAccessor::new(file.path());
        let err = accessor.retrieve().await.unwrap_err();
        assert!(err.is_remote());
    }
}
