pub mod client;
pub mod error;
pub mod interceptor;
pub mod markup;
pub mod normalize;
pub mod query;
pub mod services;
pub mod traits;

pub use client::{ApiClient, ApiClientBuilder, ApiResponse, ContentKind, RequestOptions};
pub use error::{ApiError, NormalizedError};
pub use interceptor::{
    AppErrorRule, BearerAuth, NormalizingInterceptor, RawResponse, RequestInterceptor,
    RequestLogger, ResponseInterceptor,
};
pub use normalize::{camel_case, normalize, normalize_body, normalize_text};
pub use services::{AccountService, CatalogSettings, MovieService, Services};
pub use traits::{AccountDirectory, MovieCatalog};
