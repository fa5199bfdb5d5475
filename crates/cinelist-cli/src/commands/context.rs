use cinelist_api::Services;
use cinelist_config::{Config, CredentialStore, PathManager};
use cinelist_core::{FileStorage, PersistConfig, WishlistStore};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing::debug;

/// Configuration, services and paths shared by every command.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub services: Services,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();

        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {:#}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {:#}", e))?;
        let token = credentials.resolve_api_token();
        if token.is_none() {
            debug!("No API read token configured, requests are sent without authorization");
        }

        let services = Services::from_config(&config, token).wrap_err("Failed to build API client")?;

        Ok(Self {
            paths,
            config,
            services,
        })
    }

    pub fn open_wishlist(&self) -> Result<WishlistStore<FileStorage>> {
        let storage = FileStorage::new(self.paths.storage_dir())
            .map_err(|e| eyre!("Failed to open wishlist storage: {:#}", e))?;
        WishlistStore::open(storage, PersistConfig::from_config(&self.config.storage))
            .map_err(|e| eyre!("Failed to load wishlist: {:#}", e))
    }

    pub fn image_url(&self, path: &str) -> String {
        self.services.client.image_url(path)
    }
}
