//! Request and response shapes consumed and produced by one pipeline run.

use serde::{Deserialize, Serialize};

use crate::types::FeedItem;

/// Category used when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "all";

/// Topic used by [`FeedRequest::analysis`] when the caller supplies none.
pub const DEFAULT_ANALYSIS_TOPIC: &str = "Global Intelligence";

/// Broadened search intent substituted for a bare `india` category request.
pub const INDIA_SEARCH_INTENT: &str = "India national news breaking national";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Search,
    Feed,
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMode::Search => write!(f, "search"),
            FeedMode::Feed => write!(f, "feed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRequest {
    pub query: String,
    pub category: String,
    /// 1-based result page.
    pub page: u32,
    pub mode: FeedMode,
}

impl FeedRequest {
    /// Normalizes raw caller parameters into a request.
    ///
    /// - category is trimmed and lowercased, defaulting to `all`
    /// - page is clamped to at least 1
    /// - mode is `search` iff the trimmed query is non-empty
    /// - a bare `india` category is rewritten into a feed-mode request carrying
    ///   [`INDIA_SEARCH_INTENT`] as its query
    #[must_use]
    pub fn from_params(query: Option<&str>, category: Option<&str>, page: Option<u32>) -> Self {
        let query = query.map(str::trim).unwrap_or_default().to_string();
        let category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let page = page.unwrap_or(1).max(1);

        if query.is_empty() && category == "india" {
            return Self {
                query: INDIA_SEARCH_INTENT.to_string(),
                category,
                page,
                mode: FeedMode::Feed,
            };
        }

        let mode = if query.is_empty() {
            FeedMode::Feed
        } else {
            FeedMode::Search
        };

        Self {
            query,
            category,
            page,
            mode,
        }
    }

    /// Builds the single-page topic search used for ad-hoc analysis.
    #[must_use]
    pub fn analysis(topic: Option<&str>) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_ANALYSIS_TOPIC);
        Self {
            query: topic.to_string(),
            category: String::new(),
            page: 1,
            mode: FeedMode::Search,
        }
    }

    /// Query as an option, `None` when blank.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        Some(self.query.trim()).filter(|q| !q.is_empty())
    }

    /// Category as an option, `None` when blank.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        Some(self.category.trim()).filter(|c| !c.is_empty())
    }

    /// Maximum number of articles ingested for this request: 15 for the `all`
    /// category or any search, 10 otherwise.
    #[must_use]
    pub fn ingest_limit(&self) -> usize {
        if self.category == DEFAULT_CATEGORY || self.mode == FeedMode::Search {
            15
        } else {
            10
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub feed_items: Vec<FeedItem>,
}
