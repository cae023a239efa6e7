//! Wires configuration into live collaborators and runs the pipeline.

use std::sync::Arc;

use sigma_core::{AppConfig, CredentialPool, FeedRequest};
use sigma_engine::{NewsApiSource, Pipeline, PipelineOptions};
use sigma_llm::{FactExtractor, GroqClient, Summarizer};
use sigma_newsapi::{NewsApiClient, PageScraper};

/// Shared credential pools, one per provider.
pub(crate) struct Pools {
    pub news: Arc<CredentialPool>,
    pub groq: Arc<CredentialPool>,
}

impl Pools {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            news: Arc::new(CredentialPool::new("newsapi", &config.news_api_keys)),
            groq: Arc::new(CredentialPool::new("groq", &config.groq_api_keys)),
        }
    }
}

pub(crate) fn build_source(
    config: &AppConfig,
    keys: Arc<CredentialPool>,
) -> anyhow::Result<NewsApiSource> {
    let client = NewsApiClient::with_base_url(keys, &config.newsapi_base_url)?;
    let scraper = PageScraper::new(config.scrape_timeout_secs, &config.scraper_user_agent)?;
    Ok(NewsApiSource::new(client, scraper))
}

pub(crate) fn build_llm(
    config: &AppConfig,
    keys: &Arc<CredentialPool>,
) -> anyhow::Result<(FactExtractor, Summarizer)> {
    let groq = GroqClient::with_base_url(&config.groq_base_url)?;
    let extractor = FactExtractor::new(groq.clone(), Arc::clone(keys), &config.extraction_model);
    let summarizer = Summarizer::new(groq, Arc::clone(keys), &config.summary_model);
    Ok((extractor, summarizer))
}

/// Builds a pipeline over live NewsAPI and Groq clients.
///
/// # Errors
///
/// Returns an error if an HTTP client or base URL cannot be constructed.
pub(crate) fn build_pipeline(config: &AppConfig, pools: &Pools) -> anyhow::Result<Pipeline> {
    if pools.news.is_empty() {
        tracing::warn!("NEWS_API_KEY is not set; feeds will be empty");
    }
    if pools.groq.is_empty() {
        tracing::warn!("GROQ_API_KEY is not set; facts and summaries will be placeholders");
    }

    let source = build_source(config, Arc::clone(&pools.news))?;
    let (extractor, summarizer) = build_llm(config, &pools.groq)?;
    Ok(Pipeline::new(
        source,
        extractor,
        summarizer,
        PipelineOptions::from_config(config),
    ))
}

/// Runs one batch and prints the feed as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built or the feed cannot be
/// serialized.
pub(crate) async fn run_and_print(config: &AppConfig, request: &FeedRequest) -> anyhow::Result<()> {
    let pools = Pools::from_config(config);
    let pipeline = build_pipeline(config, &pools)?;
    let response = pipeline.run(request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
