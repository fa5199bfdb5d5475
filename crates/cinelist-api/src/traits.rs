use async_trait::async_trait;
use cinelist_models::{AccountDetails, Category, Movie, MovieCredits, MovieDetail, PagedResult};

use crate::error::ApiError;

/// Read access to the movie catalog.
///
/// The feed controller and the CLI only talk to this trait, so tests can swap in a
/// canned catalog.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn discover(
        &self,
        category: Category,
        page: u32,
        sort_by: &str,
    ) -> Result<PagedResult<Movie>, ApiError>;

    async fn search(&self, query: &str, page: u32) -> Result<PagedResult<Movie>, ApiError>;

    async fn details(&self, movie_id: u64) -> Result<MovieDetail, ApiError>;

    async fn credits(&self, movie_id: u64) -> Result<MovieCredits, ApiError>;

    async fn recommendations(&self, movie_id: u64, page: u32)
        -> Result<PagedResult<Movie>, ApiError>;
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn account_details(&self, account_id: u64) -> Result<AccountDetails, ApiError>;
}
