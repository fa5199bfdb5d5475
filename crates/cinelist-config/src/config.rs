use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },
    #[error("api.timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("storage.version must be at least 1")]
    InvalidStorageVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_config")]
    pub api: ApiConfig,
    #[serde(default)]
    pub discover: DiscoverConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Account shown by `cinelist account` when no id is given
    #[serde(default)]
    pub account_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Upper bound on response bodies; unlimited when unset
    #[serde(default)]
    pub max_body_bytes: Option<usize>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub app_error: AppErrorConfig,
}

/// Rule for spotting application errors inside 2xx bodies.
///
/// A body whose numeric `field` is at least `min` is treated as a failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppErrorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_app_error_field")]
    pub field: String,
    #[serde(default = "default_app_error_min")]
    pub min: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverConfig {
    #[serde(default = "default_popular_min_votes")]
    pub popular_min_votes: u32,
    #[serde(default = "default_upcoming_months")]
    pub upcoming_months: u32,
    #[serde(default = "default_release_types")]
    pub release_types: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_storage_version")]
    pub version: u32,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_app_error_field() -> String {
    "code".to_string()
}

fn default_app_error_min() -> i64 {
    400
}

fn default_popular_min_votes() -> u32 {
    50
}

fn default_upcoming_months() -> u32 {
    6
}

fn default_release_types() -> String {
    "2|3".to_string() // theatrical (limited) | theatrical
}

fn default_namespace() -> String {
    "root".to_string()
}

fn default_storage_version() -> u32 {
    1
}

pub fn default_api_config() -> ApiConfig {
    ApiConfig {
        base_url: default_base_url(),
        image_base_url: default_image_base_url(),
        timeout_ms: default_timeout_ms(),
        max_body_bytes: None,
        language: default_language(),
        region: default_region(),
        app_error: AppErrorConfig::default(),
    }
}

impl Default for AppErrorConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            field: default_app_error_field(),
            min: default_app_error_min(),
        }
    }
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            popular_min_votes: default_popular_min_votes(),
            upcoming_months: default_upcoming_months(),
            release_types: default_release_types(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            version: default_storage_version(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: default_api_config(),
            discover: DiscoverConfig::default(),
            storage: StorageConfig::default(),
            account_id: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.image_base_url", &self.api.image_base_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl { field, value: value.clone() }.into());
            }
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout.into());
        }

        if self.api.language.trim().is_empty() {
            return Err(ConfigError::Empty { field: "api.language" }.into());
        }

        if self.api.app_error.enabled && self.api.app_error.field.trim().is_empty() {
            return Err(ConfigError::Empty { field: "api.app_error.field" }.into());
        }

        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::Empty { field: "storage.namespace" }.into());
        }

        if self.storage.version == 0 {
            return Err(ConfigError::InvalidStorageVersion.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.api.region = "GB".to_string();
        config.account_id = Some(20321280);
        config.discover.popular_min_votes = 100;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.region, "GB");
        assert_eq!(loaded.account_id, Some(20321280));
        assert_eq!(loaded.discover.popular_min_votes, 100);
        assert_eq!(loaded.api.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:8080/3"

            [api.app_error]
            min = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080/3");
        assert_eq!(config.api.image_base_url, DEFAULT_IMAGE_BASE_URL);
        assert_eq!(config.api.language, "en-US");
        assert!(config.api.app_error.enabled);
        assert_eq!(config.api.app_error.field, "code");
        assert_eq!(config.api.app_error.min, 500);
        assert_eq!(config.storage.namespace, "root");
        assert_eq!(config.discover.release_types, "2|3");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "api.themoviedb.org".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = DEFAULT_BASE_URL.to_string();
        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());

        config.api.timeout_ms = DEFAULT_TIMEOUT_MS;
        config.storage.version = 0;
        assert!(config.validate().is_err());
    }
}
