//! Configuration parser for loading configuration snapshots from disk.
//!
//! This module handles loading a configuration tree from YAML or JSON files,
//! the `.env` file next to it, and the environment variables that locate
//! the remote platform.

use crate::error::{ConfigurationLoadError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::ConfigTree;

/// Environment variable holding the remote platform URL.
pub const ENV_REMOTE_URL: &str = "STORESYNC_URL";

/// Environment variable holding the remote platform token.
pub const ENV_REMOTE_TOKEN: &str = "STORESYNC_TOKEN";

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

/// Configuration parser for loading configuration trees.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a configuration tree from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<ConfigTree> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigurationLoadError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ConfigurationLoadError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        self.parse(&content, ConfigFormat::from_path(path), Some(path))
    }

    /// Parses a configuration tree from a string in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid.
    pub fn parse(
        &self,
        content: &str,
        format: ConfigFormat,
        source: Option<&Path>,
    ) -> Result<ConfigTree> {
        debug!("Parsing {format:?} configuration");
        let location = || source.map(|p| p.display().to_string());

        let tree: ConfigTree = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                ConfigurationLoadError::parse(format!("YAML parse error: {e}"), location())
            })?,
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                ConfigurationLoadError::parse(format!("JSON parse error: {e}"), location())
            })?,
        };

        debug!("Parsed configuration with {} entities", tree.entity_count());
        Ok(tree)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ConfigurationLoadError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                )
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Gets the remote platform URL and token, preferring explicit values
    /// over the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is missing everywhere.
    pub fn remote_credentials(
        url: Option<String>,
        token: Option<String>,
    ) -> Result<(String, String)> {
        let url = url
            .or_else(|| std::env::var(ENV_REMOTE_URL).ok())
            .ok_or_else(|| ConfigurationLoadError::MissingEnvVar {
                name: String::from(ENV_REMOTE_URL),
            })?;
        let token = token
            .or_else(|| std::env::var(ENV_REMOTE_TOKEN).ok())
            .ok_or_else(|| ConfigurationLoadError::MissingEnvVar {
                name: String::from(ENV_REMOTE_TOKEN),
            })?;
        Ok((url, token))
    }
}

impl ConfigFormat {
    /// Picks the format from a file extension, defaulting to YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "storesync.yaml",
    "storesync.yml",
    "config.yaml",
    "config.yml",
];

/// Finds the configuration file in the current directory or parent directories.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ConfigurationLoadError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoresyncError;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r"
channels:
  - slug: de
    currencyCode: EUR
    defaultCountry: DE
";
        let parser = ConfigParser::new();
        let tree = parser.parse(yaml, ConfigFormat::Yaml, None).unwrap();
        assert_eq!(tree.channels.len(), 1);
        assert_eq!(tree.channels[0].slug, "de");
        assert_eq!(tree.channels[0].currency_code.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
shop:
  defaultMailSenderName: Store
  trackInventoryByDefault: true
channels:
  - name: Germany
    slug: de
    currencyCode: EUR
    defaultCountry: DE
    settings:
      allocationStrategy: PRIORITIZE_HIGH_STOCK
taxClasses:
  - name: Standard
    countryRates:
      - countryCode: DE
        rate: 19
categories:
  - name: Electronics
    slug: electronics
    subcategories:
      - name: Laptops
        slug: laptops
products:
  - name: Laptop
    slug: laptop-pro
    productType: Computer
    category: laptops
    attributes:
      Color: [Silver, Black]
    variants:
      - sku: LP-1
        weight: 1.4
        channelListings:
          - channel: de
            price: 999
menus:
  - name: Main
    slug: main
    items:
      - name: Shop
        children:
          - name: Laptops
            category: laptops
"#;
        let tree = ConfigParser::new()
            .parse(yaml, ConfigFormat::Yaml, None)
            .unwrap();
        assert!(tree.shop.is_some());
        assert_eq!(tree.categories[0].subcategories.len(), 1);
        assert_eq!(tree.products[0].variants[0].sku, "LP-1");
        assert_eq!(tree.menus[0].items[0].children[0].name, "Laptops");
        assert_eq!(tree.entity_count(), 6);
    }

    #[test]
    fn test_parse_invalid_yaml_is_load_error() {
        let err = ConfigParser::new()
            .parse("channels: [", ConfigFormat::Yaml, None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoresyncError::ConfigurationLoad(ConfigurationLoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("noext")), ConfigFormat::Yaml);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = ConfigParser::new()
            .load_file(temp.path().join("missing.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoresyncError::ConfigurationLoad(ConfigurationLoadError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("storesync.yaml"), "{}").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("storesync.yaml"));
    }
}
