//! Seams between the orchestrator and the outside world.
//!
//! The pipeline only talks to these traits, so runs can be driven by the real
//! NewsAPI and Groq clients or by in-memory fakes. Every method is infallible
//! from the caller's side: implementations absorb their own errors and return
//! an empty or placeholder value.

use async_trait::async_trait;
use sigma_core::{Fact, SourceArticle};
use sigma_llm::{FactExtractor, Summarizer};
use sigma_newsapi::{NewsApiClient, PageScraper};

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Up to `limit` article records for the given query or category.
    async fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        page: u32,
        limit: usize,
    ) -> Vec<SourceArticle>;

    /// Readable page text, empty on any failure.
    async fn fetch_text(&self, url: &str) -> String;
}

#[async_trait]
pub trait FactSource: Send + Sync {
    async fn extract_facts(&self, text: &str, topic: Option<&str>) -> Vec<Fact>;
}

#[async_trait]
pub trait SummarySource: Send + Sync {
    async fn summarize(&self, title: &str, facts: &[Fact]) -> String;
}

/// NewsAPI search paired with the page scraper.
pub struct NewsApiSource {
    client: NewsApiClient,
    scraper: PageScraper,
}

impl NewsApiSource {
    #[must_use]
    pub fn new(client: NewsApiClient, scraper: PageScraper) -> Self {
        Self { client, scraper }
    }
}

#[async_trait]
impl ContentSource for NewsApiSource {
    async fn search(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        page: u32,
        limit: usize,
    ) -> Vec<SourceArticle> {
        match self.client.search(query, category, page, limit).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(
                    provider = self.client.keys().provider(),
                    error = %e,
                    "article search failed; ingesting nothing"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> String {
        self.scraper.fetch_text(url).await
    }
}

#[async_trait]
impl FactSource for FactExtractor {
    async fn extract_facts(&self, text: &str, topic: Option<&str>) -> Vec<Fact> {
        FactExtractor::extract_facts(self, text, topic).await
    }
}

#[async_trait]
impl SummarySource for Summarizer {
    async fn summarize(&self, title: &str, facts: &[Fact]) -> String {
        Summarizer::summarize(self, title, facts).await
    }
}
