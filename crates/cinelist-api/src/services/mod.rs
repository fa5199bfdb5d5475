//! Typed facades over [`ApiClient`], one per resource family.

pub mod account;
pub mod movies;
pub mod params;

pub use account::AccountService;
pub use movies::MovieService;
pub use params::CatalogSettings;

use cinelist_config::Config;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Every service, built once from configuration and sharing a single client.
#[derive(Debug, Clone)]
pub struct Services {
    pub client: Arc<ApiClient>,
    pub movies: Arc<MovieService>,
    pub account: Arc<AccountService>,
}

impl Services {
    pub fn new(client: Arc<ApiClient>, settings: CatalogSettings) -> Self {
        Self {
            movies: Arc::new(MovieService::new(client.clone(), settings)),
            account: Arc::new(AccountService::new(client.clone())),
            client,
        }
    }

    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self, ApiError> {
        let client = Arc::new(ApiClient::from_config(&config.api, token)?);
        Ok(Self::new(client, CatalogSettings::from_config(config)))
    }
}
