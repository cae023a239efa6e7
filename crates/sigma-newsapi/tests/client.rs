//! Integration tests for `NewsApiClient` and `PageScraper` using wiremock HTTP mocks.

use std::sync::Arc;

use sigma_core::CredentialPool;
use sigma_newsapi::{NewsApiClient, NewsApiError, PageScraper};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pool(keys: &[&str]) -> Arc<CredentialPool> {
    Arc::new(CredentialPool::new("newsapi", keys.iter().copied()))
}

fn test_client(keys: Arc<CredentialPool>, base_url: &str) -> NewsApiClient {
    NewsApiClient::with_base_url(keys, base_url).expect("client construction should not fail")
}

fn articles_body() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": { "id": "reuters", "name": "Reuters" },
                "author": "Staff",
                "title": "SpaceX Starship launch succeeds",
                "description": "The rocket lifted off from Texas.",
                "url": "https://reuters.example/starship",
                "urlToImage": "https://reuters.example/starship.jpg",
                "publishedAt": "2025-03-14T10:30:00Z",
                "content": "SpaceX launched Starship on Friday… [+2300 chars]"
            },
            {
                "source": { "id": null, "name": "AP" },
                "title": "Election results certified",
                "description": null,
                "url": "https://ap.example/election",
                "urlToImage": null,
                "publishedAt": null,
                "content": null
            }
        ]
    })
}

#[tokio::test]
async fn search_returns_parsed_articles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("apiKey", "key-a"))
        .and(query_param("q", "starship"))
        .and(query_param("sortBy", "relevancy"))
        .and(query_param("pageSize", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .mount(&server)
        .await;

    let client = test_client(pool(&["key-a"]), &server.uri());
    let articles = client
        .search(Some("starship"), None, 1, 15)
        .await
        .expect("should parse articles");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].source_name, "Reuters");
    assert_eq!(articles[0].title, "SpaceX Starship launch succeeds");
    assert_eq!(articles[1].description, "");
    assert!(articles[1].image_url.is_none());
}

#[tokio::test]
async fn feed_request_hits_top_headlines_with_country() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("country", "in"))
        .and(query_param("category", "general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(pool(&["key-a"]), &server.uri());
    let articles = client.search(None, Some("india"), 1, 10).await.unwrap();
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn search_truncates_to_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .mount(&server)
        .await;

    let client = test_client(pool(&["key-a"]), &server.uri());
    let articles = client.search(None, None, 1, 1).await.unwrap();
    assert_eq!(articles.len(), 1);
}

#[tokio::test]
async fn rate_limited_key_rotates_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("apiKey", "key-a"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("apiKey", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(1)
        .mount(&server)
        .await;

    let keys = pool(&["key-a", "key-b"]);
    let client = test_client(Arc::clone(&keys), &server.uri());
    let articles = client.search(Some("starship"), None, 1, 15).await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(keys.position(), 1, "pool should have advanced exactly once");
    assert_eq!(keys.active().as_deref(), Some("key-b"));
}

#[tokio::test]
async fn exhausted_key_code_in_200_body_also_rotates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("apiKey", "key-a"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "code": "apiKeyExhausted",
            "message": "Your API key has no more requests available."
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("apiKey", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .mount(&server)
        .await;

    let keys = pool(&["key-a", "key-b"]);
    let client = test_client(Arc::clone(&keys), &server.uri());
    let articles = client.search(None, None, 1, 15).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(keys.position(), 1);
}

#[tokio::test]
async fn all_keys_rate_limited_stops_after_one_attempt_each() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(pool(&["k1", "k2", "k3"]), &server.uri());
    let result = client.search(Some("starship"), None, 1, 15).await;

    assert!(
        matches!(result, Err(NewsApiError::KeysExhausted { attempts: 3 })),
        "expected KeysExhausted, got: {result:?}"
    );
}

#[tokio::test]
async fn api_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "error",
            "code": "parameterInvalid",
            "message": "You've included a parameter in your request which is currently not supported."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let keys = pool(&["k1", "k2"]);
    let client = test_client(Arc::clone(&keys), &server.uri());
    let result = client.search(None, Some("sports"), 1, 10).await;

    assert!(
        matches!(result, Err(NewsApiError::Api { ref code, .. }) if code == "parameterInvalid"),
        "expected Api error, got: {result:?}"
    );
    assert_eq!(keys.position(), 0);
}

#[tokio::test]
async fn empty_key_pool_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(pool(&[]), &server.uri());
    let result = client.search(None, None, 1, 10).await;
    assert!(matches!(result, Err(NewsApiError::NoCredentials)));
}

#[tokio::test]
async fn malformed_success_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(pool(&["secret-key"]), &server.uri());
    let err = client.search(None, None, 1, 10).await.unwrap_err();
    assert!(matches!(err, NewsApiError::Deserialize { .. }));
    assert!(
        !err.to_string().contains("secret-key"),
        "error context must not leak the key: {err}"
    );
}

#[tokio::test]
async fn scraper_returns_cleaned_page_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/story"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><script>x()</script></head><body><nav>Menu</nav><p>Starship flew.</p></body></html>",
        ))
        .mount(&server)
        .await;

    let scraper = PageScraper::new(5, "sigma-test/0.1").unwrap();
    let text = scraper.fetch_text(&format!("{}/story", server.uri())).await;
    assert_eq!(text, "Starship flew.");
}

#[tokio::test]
async fn scraper_returns_empty_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<p>Forbidden page body</p>"))
        .mount(&server)
        .await;

    let scraper = PageScraper::new(5, "sigma-test/0.1").unwrap();
    assert_eq!(scraper.fetch_text(&server.uri()).await, "");
}

#[tokio::test]
async fn scraper_returns_empty_on_unreachable_host() {
    let scraper = PageScraper::new(1, "sigma-test/0.1").unwrap();
    assert_eq!(scraper.fetch_text("http://127.0.0.1:1/nothing").await, "");
}
