pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    default_api_config, ApiConfig, AppErrorConfig, Config, ConfigError, DiscoverConfig, StorageConfig,
    DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_TIMEOUT_MS,
};
pub use credentials::{CredentialStore, TOKEN_ENV_VAR};
pub use paths::{container_base_path, PathManager, BASE_PATH_ENV_VAR};
