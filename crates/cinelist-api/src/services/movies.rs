use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use cinelist_models::{Category, Movie, MovieCredits, MovieDetail, PagedResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::params::{self, CatalogSettings};
use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::traits::MovieCatalog;

#[derive(Debug, Clone)]
pub struct MovieService {
    client: Arc<ApiClient>,
    settings: CatalogSettings,
}

impl MovieService {
    pub fn new(client: Arc<ApiClient>, settings: CatalogSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn now_playing(&self, page: u32, sort_by: &str) -> Result<PagedResult<Movie>, ApiError> {
        let params = params::now_playing(&self.settings, page, sort_by, today());
        self.fetch("/discover/movie", &params).await
    }

    pub async fn popular(&self, page: u32, sort_by: &str) -> Result<PagedResult<Movie>, ApiError> {
        let params = params::popular(&self.settings, page, sort_by);
        self.fetch("/discover/movie", &params).await
    }

    pub async fn upcoming(&self, page: u32, sort_by: &str) -> Result<PagedResult<Movie>, ApiError> {
        let params = params::upcoming(&self.settings, page, sort_by, today());
        self.fetch("/discover/movie", &params).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, params: &Value) -> Result<T, ApiError> {
        debug!(path, "Fetching catalog data");
        self.client
            .get(path, Some(params), &RequestOptions::default(), None)
            .await?
            .into_data()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[async_trait]
impl MovieCatalog for MovieService {
    async fn discover(
        &self,
        category: Category,
        page: u32,
        sort_by: &str,
    ) -> Result<PagedResult<Movie>, ApiError> {
        match category {
            Category::NowPlaying => self.now_playing(page, sort_by).await,
            Category::Upcoming => self.upcoming(page, sort_by).await,
            Category::Popular => self.popular(page, sort_by).await,
        }
    }

    async fn search(&self, query: &str, page: u32) -> Result<PagedResult<Movie>, ApiError> {
        let params = params::search(&self.settings, query, page);
        self.fetch("/search/movie", &params).await
    }

    async fn details(&self, movie_id: u64) -> Result<MovieDetail, ApiError> {
        let params = params::details(&self.settings);
        self.fetch(&format!("/movie/{}", movie_id), &params).await
    }

    async fn credits(&self, movie_id: u64) -> Result<MovieCredits, ApiError> {
        let params = params::credits(&self.settings);
        self.fetch(&format!("/movie/{}/credits", movie_id), &params).await
    }

    async fn recommendations(
        &self,
        movie_id: u64,
        page: u32,
    ) -> Result<PagedResult<Movie>, ApiError> {
        let params = params::recommendations(&self.settings, page);
        self.fetch(&format!("/movie/{}/recommendations", movie_id), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_for(server: &MockServer) -> MovieService {
        let client = ApiClient::builder()
            .base_url(format!("{}/3", server.uri()))
            .build()
            .unwrap();
        MovieService::new(Arc::new(client), CatalogSettings::default())
    }

    #[tokio::test]
    async fn test_popular_discover_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .and(query_param("page", "2"))
            .and(query_param("sort_by", "vote_average.desc"))
            .and(query_param("vote_count.gte", "50"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 2,
                "results": [{"id": 238, "title": "The Godfather", "vote_average": 8.7}],
                "total_pages": 40,
                "total_results": 800
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let page = service
            .discover(Category::Popular, 2, "vote_average.desc")
            .await
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 40);
        assert_eq!(page.results[0].title, "The Godfather");
        assert_eq!(page.results[0].vote_average, 8.7);
    }

    #[tokio::test]
    async fn test_now_playing_is_regional() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .and(query_param("region", "US"))
            .and(query_param("with_release_type", "2|3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 1, "results": []})))
            .expect(2)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        service
            .discover(Category::NowPlaying, 1, "original_title.asc")
            .await
            .unwrap();
        service
            .discover(Category::Upcoming, 1, "original_title.asc")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_and_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "blade runner"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 78, "title": "Blade Runner"}],
                "total_pages": 1,
                "total_results": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/78"))
            .and(query_param("append_to_response", "release_dates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 78,
                "title": "Blade Runner",
                "runtime": 117,
                "genres": [{"id": 878, "name": "Science Fiction"}],
                "release_dates": {"results": [
                    {"iso_3166_1": "US", "release_dates": [{"certification": "R", "type": 3}]}
                ]}
            })))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let found = service.search("blade runner", 1).await.unwrap();
        assert_eq!(found.results.len(), 1);

        let detail = service.details(78).await.unwrap();
        assert_eq!(detail.runtime, Some(117));
        assert_eq!(detail.genres[0].name, "Science Fiction");
        let release_dates = detail.release_dates.unwrap();
        let us = &release_dates.results[0];
        assert_eq!(us.iso_3166_1, "US");
        assert_eq!(us.release_dates[0].release_type, Some(3));
    }

    #[tokio::test]
    async fn test_credits_and_recommendations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/603/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0}],
                "crew": [{"id": 9340, "name": "Lana Wachowski", "job": "Director", "known_for_department": "Directing"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/603/recommendations"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 604}, {"id": 605}],
                "total_pages": 2,
                "total_results": 40
            })))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let credits = service.credits(603).await.unwrap();
        assert_eq!(credits.cast[0].character, "Neo");
        assert_eq!(credits.crew[0].known_for_department.as_deref(), Some("Directing"));

        let recommended = service.recommendations(603, 1).await.unwrap();
        assert_eq!(recommended.results.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_surfaces_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let err = service.details(1).await.unwrap_err();
        assert_eq!(err.status().as_deref(), Some("404"));
    }
}
