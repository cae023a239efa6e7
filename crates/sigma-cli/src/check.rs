//! `sigma check`: credential report and a short live run of every stage.

use sigma_core::{AppConfig, CredentialPool, FeedRequest, SourceArticle};
use sigma_engine::{pick_representative, ClusteringEngine, ContentSource};

use crate::runtime::{build_llm, build_source, Pools};

/// Articles scraped during the check.
const CHECK_ARTICLES: usize = 2;

/// Masks a credential down to its last five characters.
pub(crate) fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    let tail: String = key.chars().skip(count.saturating_sub(5)).collect();
    format!("...{tail}")
}

fn report_pool(pool: &CredentialPool) -> anyhow::Result<()> {
    match pool.active() {
        Some(key) => {
            println!(
                "{:<8} key active: {} ({} configured)",
                pool.provider(),
                mask_key(&key),
                pool.len()
            );
            Ok(())
        }
        None => anyhow::bail!("no {} keys configured; check your .env file", pool.provider()),
    }
}

/// Reports configured keys, then fetches technology headlines, scrapes a
/// couple of pages, clusters them and synthesizes the first story.
///
/// # Errors
///
/// Returns an error when a provider has no keys or a stage produces nothing.
pub(crate) async fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let pools = Pools::from_config(config);
    report_pool(&pools.news)?;
    report_pool(&pools.groq)?;

    let request = FeedRequest::from_params(None, Some("technology"), Some(1));
    let source = build_source(config, std::sync::Arc::clone(&pools.news))?;
    let records: Vec<SourceArticle> = source
        .search(
            request.query(),
            request.category(),
            request.page,
            request.ingest_limit(),
        )
        .await;
    if records.is_empty() {
        anyhow::bail!("ingestion returned no articles");
    }
    println!("ingest   fetched {} articles", records.len());

    let mut articles = Vec::new();
    for record in records.into_iter().take(CHECK_ARTICLES) {
        let scraped = source.fetch_text(&record.url).await;
        println!("scrape   {} chars from {}", scraped.chars().count(), record.url);
        if let Some(article) = sigma_engine::into_raw_article(record, scraped) {
            articles.push(article);
        }
    }
    if articles.is_empty() {
        anyhow::bail!("no scraped article carried usable text");
    }

    let clusters = ClusteringEngine::new(config.similarity_threshold).group(articles);
    println!("cluster  {} stories", clusters.len());

    let Some(story) = clusters.first().map(pick_representative) else {
        anyhow::bail!("clustering produced no representative");
    };
    let (extractor, summarizer) = build_llm(config, &pools.groq)?;
    let facts = extractor.extract_facts(&story.content, None).await;
    println!("extract  {} facts from \"{}\"", facts.len(), story.title);
    for fact in &facts {
        println!("         - {}", fact.sentence());
    }
    let summary = summarizer.summarize(&story.title, &facts).await;
    println!("summary  {summary}");

    Ok(())
}
