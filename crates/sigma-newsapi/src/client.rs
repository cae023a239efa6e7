//! HTTP client for the NewsAPI REST API.
//!
//! Wraps `reqwest` with NewsAPI-specific error handling, key rotation, and
//! typed response deserialization. Quota errors (`rateLimited`,
//! `apiKeyExhausted`, HTTP 429) rotate the shared key pool and retry, at most
//! once per key.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use sigma_core::{call_with_rotation, CredentialPool, SourceArticle};

use crate::error::NewsApiError;
use crate::query::{plan_query, PlannedQuery};
use crate::types::{ApiEnvelope, RATE_LIMIT_CODES};

const DEFAULT_BASE_URL: &str = "https://newsapi.org/";

/// Client for the NewsAPI REST API.
///
/// Holds a handle to the shared NewsAPI key pool; the active key is read right
/// before each request. Use [`NewsApiClient::new`] for production or
/// [`NewsApiClient::with_base_url`] to point at a mock server in tests.
pub struct NewsApiClient {
    client: Client,
    keys: Arc<CredentialPool>,
    base_url: Url,
}

impl NewsApiClient {
    /// Creates a new client pointed at the production NewsAPI.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(keys: Arc<CredentialPool>) -> Result<Self, NewsApiError> {
        Self::with_base_url(keys, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NewsApiError::InvalidBaseUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(keys: Arc<CredentialPool>, base_url: &str) -> Result<Self, NewsApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sigma/0.1 (news-engine)")
            .build()?;

        // Normalise to exactly one trailing slash so endpoint paths join onto
        // the origin instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NewsApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            keys,
            base_url,
        })
    }

    /// The key pool this client draws from.
    #[must_use]
    pub fn keys(&self) -> &Arc<CredentialPool> {
        &self.keys
    }

    /// Fetches up to `limit` articles for a query/category/page request.
    ///
    /// # Errors
    ///
    /// - [`NewsApiError::NoCredentials`] if no keys are configured.
    /// - [`NewsApiError::KeysExhausted`] if every key is out of quota.
    /// - [`NewsApiError::Api`] if NewsAPI rejects the request.
    /// - [`NewsApiError::Http`] on network failure.
    /// - [`NewsApiError::Deserialize`] if a 2xx body is not the expected JSON.
    pub async fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<SourceArticle>, NewsApiError> {
        let plan = plan_query(query, category, page, limit);
        tracing::debug!(
            endpoint = plan.endpoint.path(),
            ?query,
            ?category,
            page,
            limit,
            "requesting NewsAPI articles"
        );

        let mut articles = call_with_rotation(&self.keys, |api_key| {
            let url = self.build_url(&plan, &api_key);
            async move { self.request_articles(url).await }
        })
        .await?;

        articles.truncate(limit);
        Ok(articles)
    }

    /// Builds the endpoint URL with the API key and planned parameters,
    /// percent-encoded.
    fn build_url(&self, plan: &PlannedQuery, api_key: &str) -> Url {
        let mut url = self
            .base_url
            .join(plan.endpoint.path())
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apiKey", api_key);
            for (k, v) in &plan.params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends one GET and maps the NewsAPI envelope to articles or a typed error.
    async fn request_articles(&self, url: Url) -> Result<Vec<SourceArticle>, NewsApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope = match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) => envelope,
            Err(_) if status == StatusCode::TOO_MANY_REQUESTS => {
                return Err(NewsApiError::RateLimited {
                    code: status.as_u16().to_string(),
                });
            }
            Err(_) if !status.is_success() => {
                return Err(NewsApiError::Api {
                    code: status.as_u16().to_string(),
                    message: "non-JSON error response".to_string(),
                });
            }
            Err(e) => {
                return Err(NewsApiError::Deserialize {
                    context: redact_key(&url),
                    source: e,
                });
            }
        };

        Self::check_api_error(status, &envelope)?;

        Ok(envelope
            .articles
            .into_iter()
            .filter_map(crate::types::ApiArticle::into_source_article)
            .collect())
    }

    /// Classifies an error envelope: quota codes become
    /// [`NewsApiError::RateLimited`], anything else [`NewsApiError::Api`].
    fn check_api_error(status: StatusCode, envelope: &ApiEnvelope) -> Result<(), NewsApiError> {
        let code = envelope.code.clone().unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS || RATE_LIMIT_CODES.contains(&code.as_str()) {
            return Err(NewsApiError::RateLimited {
                code: if code.is_empty() {
                    status.as_u16().to_string()
                } else {
                    code
                },
            });
        }

        if envelope.status == "error" || !status.is_success() {
            return Err(NewsApiError::Api {
                code,
                message: envelope
                    .message
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(())
    }
}

/// Renders a request URL for error context without the API key.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "apiKey")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Endpoint;

    fn test_client(base_url: &str) -> NewsApiClient {
        let keys = Arc::new(CredentialPool::new("newsapi", ["test-key"]));
        NewsApiClient::with_base_url(keys, base_url).expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://newsapi.org");
        let plan = PlannedQuery {
            endpoint: Endpoint::TopHeadlines,
            params: vec![("country".to_string(), "us".to_string())],
        };
        let url = client.build_url(&plan, "k1");
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?apiKey=k1&country=us"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://newsapi.org/");
        let plan = PlannedQuery {
            endpoint: Endpoint::Everything,
            params: vec![("q".to_string(), "starship".to_string())],
        };
        let url = client.build_url(&plan, "k1");
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?apiKey=k1&q=starship"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://newsapi.org");
        let plan = PlannedQuery {
            endpoint: Endpoint::Everything,
            params: vec![("q".to_string(), "india & pakistan".to_string())],
        };
        let url = client.build_url(&plan, "k1");
        assert!(
            url.as_str().contains("india+%26+pakistan"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let keys = Arc::new(CredentialPool::new("newsapi", ["k"]));
        let result = NewsApiClient::with_base_url(keys, "not a url");
        assert!(matches!(result, Err(NewsApiError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn redact_key_drops_api_key() {
        let url = Url::parse("https://newsapi.org/v2/everything?apiKey=secret&q=x").unwrap();
        let rendered = redact_key(&url);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("q=x"));
    }

    #[test]
    fn quota_codes_are_rate_limits() {
        for code in RATE_LIMIT_CODES {
            let envelope = ApiEnvelope {
                status: "error".to_string(),
                code: Some((*code).to_string()),
                message: Some("quota".to_string()),
                articles: Vec::new(),
            };
            let err = NewsApiClient::check_api_error(StatusCode::UNAUTHORIZED, &envelope)
                .unwrap_err();
            assert!(matches!(err, NewsApiError::RateLimited { .. }), "{code}");
        }
    }

    #[test]
    fn other_codes_are_api_errors() {
        let envelope = ApiEnvelope {
            status: "error".to_string(),
            code: Some("parametersIncompatible".to_string()),
            message: Some("You cannot mix the sources parameter".to_string()),
            articles: Vec::new(),
        };
        let err = NewsApiClient::check_api_error(StatusCode::BAD_REQUEST, &envelope).unwrap_err();
        assert!(
            matches!(err, NewsApiError::Api { ref code, .. } if code == "parametersIncompatible")
        );
    }
}
