use async_trait::async_trait;
use cinelist_models::AccountDetails;
use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::traits::AccountDirectory;

#[derive(Debug, Clone)]
pub struct AccountService {
    client: Arc<ApiClient>,
}

impl AccountService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountDirectory for AccountService {
    async fn account_details(&self, account_id: u64) -> Result<AccountDetails, ApiError> {
        self.client
            .get(&format!("/account/{}", account_id), None, &RequestOptions::default(), None)
            .await?
            .into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_account_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/account/20321280"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "avatar": {"gravatar": {"hash": "abc"}, "tmdb": {"avatar_path": null}},
                "id": 20321280,
                "iso_639_1": "en",
                "iso_3166_1": "US",
                "name": "",
                "include_adult": false,
                "username": "moviegoer"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::builder()
            .base_url(format!("{}/3", server.uri()))
            .build()
            .unwrap();
        let service = AccountService::new(Arc::new(client));
        let account = service.account_details(20321280).await.unwrap();

        assert_eq!(account.username, "moviegoer");
        assert_eq!(account.iso_3166_1, "US");
        assert_eq!(account.display_name(), "moviegoer");
        assert_eq!(account.avatar_path(), None);
    }
}
