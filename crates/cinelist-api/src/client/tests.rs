use super::*;
use serde_json::json;
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(format!("{}/3", server.uri()))
        .token(Some("test-token".to_string()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_sends_auth_and_normalizes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/550"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/json"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 550,
            "original_title": "Fight Club",
            "release_date": "1999-10-15"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .get("/movie/550", Some(&json!({"language": "en-US"})), &RequestOptions::new(), None)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        response.data,
        json!({"id": 550, "originalTitle": "Fight Club", "releaseDate": "1999-10-15"})
    );
}

#[tokio::test]
async fn test_get_without_token_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/3", server.uri()))
        .build()
        .unwrap();
    client
        .get("/configuration", None, &RequestOptions::new(), None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_application_error_in_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 404, "message": "not found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get("/movie/0", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Application(_)));
    let normalized = err.normalized().unwrap();
    assert_eq!(normalized.status(), "200");
    assert_eq!(normalized.message(), Some("not found"));
}

#[tokio::test]
async fn test_http_error_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key.",
            "success": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get("/movie/1", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    let normalized = err.normalized().unwrap();
    assert_eq!(normalized.status(), "401");
    assert_eq!(normalized.http_status(), Some(401));
    assert_eq!(normalized.message(), Some("Request failed with status code 401"));
    assert_eq!(normalized.field("statusCode"), Some(&json!(7)));
    assert_eq!(normalized.field("success"), Some(&json!(false)));
}

#[tokio::test]
async fn test_html_error_page_becomes_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string("<html><head><title>Service Unavailable</title></head></html>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get("/discover/movie", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    assert_eq!(
        err.normalized().unwrap().field("html"),
        Some(&json!({"head": {"title": "Service Unavailable"}}))
    );
}

#[tokio::test]
async fn test_base_url_override_is_per_call() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/list/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&secondary)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/list/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&primary)
        .await;

    let client = client_for(&primary).await;
    let override_base = format!("{}/v4", secondary.uri());
    let first = client
        .get("/list/1", None, &RequestOptions::new(), Some(&override_base))
        .await
        .unwrap();
    let second = client
        .get("/list/1", None, &RequestOptions::new(), None)
        .await
        .unwrap();

    assert_eq!(first.data, json!({"id": 1}));
    assert_eq!(second.data, json!({"id": 2}));
    assert_eq!(client.base_url(), format!("{}/3", primary.uri()));
}

#[tokio::test]
async fn test_post_json_and_url_encoded_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/3/movie/550/rating"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"value":8.5}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status_code": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/3/authentication/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("grant%5Btype%5D=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let rated = client
        .post("/movie/550/rating", Some(&json!({"value": 8.5})), &RequestOptions::new(), None)
        .await
        .unwrap();
    assert_eq!(rated.status, 201);
    assert_eq!(rated.data, json!({"statusCode": 1}));

    let token = client
        .post_url_encoded(
            "/authentication/token",
            &json!({"grant": {"type": "password"}}),
            &RequestOptions::new(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(token.data, json!({"success": true}));
}

#[tokio::test]
async fn test_multipart_form_sets_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/3/list/7/image"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .put_form("/list/7/image", &json!({"name": "poster"}), &RequestOptions::new(), None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("poster"));
}

#[tokio::test]
async fn test_options_add_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/3/list/9"))
        .and(query_param("session_id", "abc"))
        .and(header("x-trace", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let options = RequestOptions::new()
        .header("x-trace", "1")
        .query(json!({"session_id": "abc"}));
    client.delete("/list/9", None, &options, None).await.unwrap();
}

#[tokio::test]
async fn test_body_size_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/3", server.uri()))
        .max_body_bytes(Some(16))
        .build()
        .unwrap();
    let err = client
        .get("/movie/popular", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::BodyTooLarge { limit: 16, actual: 64 }));
}

#[tokio::test]
async fn test_body_size_limit_without_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("transfer-encoding", "chunked")
                .set_body_string("x".repeat(64)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/3", server.uri()))
        .max_body_bytes(Some(16))
        .build()
        .unwrap();
    let err = client
        .get("/movie/popular", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::BodyTooLarge { limit: 16, actual } if actual > 16));
}

#[tokio::test]
async fn test_body_within_limit_is_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("transfer-encoding", "chunked")
                .set_body_string(r#"{"page":1}"#),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/3", server.uri()))
        .max_body_bytes(Some(16))
        .build()
        .unwrap();
    let response = client
        .get("/movie/popular", None, &RequestOptions::new(), None)
        .await
        .unwrap();

    assert_eq!(response.data, json!({"page": 1}));
}

#[tokio::test]
async fn test_transport_error_is_not_normalized() {
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:9/3")
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let err = client
        .get("/movie/1", None, &RequestOptions::new(), None)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.normalized().is_none());
}

#[test]
fn test_image_url_concatenates_prefix() {
    let client = ApiClient::builder().build().unwrap();
    assert_eq!(
        client.image_url("/abc.jpg"),
        "https://image.tmdb.org/t/p/w500/abc.jpg"
    );
}

#[test]
fn test_from_config() {
    let mut config = cinelist_config::default_api_config();
    config.base_url = "http://localhost:1234/3/".to_string();
    let client = ApiClient::from_config(&config, None).unwrap();
    let url = client
        .resolve_url("movie/5", None, Some(&json!({"page": 1})), &RequestOptions::new())
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:1234/3/movie/5?page=1");
}
