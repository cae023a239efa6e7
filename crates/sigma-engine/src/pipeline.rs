//! Pipeline orchestration: ingest, cluster, synthesize.
//!
//! One [`Pipeline::run`] takes a [`FeedRequest`] through three fixed stages and
//! always produces a [`FeedResponse`]. Collaborator failures never abort a run;
//! they surface as dropped articles, empty fact lists or placeholder summaries.

use std::fmt;

use sigma_core::{
    AppConfig, ArticleCluster, FeedItem, FeedMode, FeedRequest, FeedResponse, RawArticle,
    SourceArticle,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::clustering::{pick_representative, ClusteringEngine, DEFAULT_SIMILARITY_THRESHOLD};
use crate::collaborators::{ContentSource, FactSource, SummarySource};
use crate::conflict::{ConflictResolver, DEFAULT_MATCH_THRESHOLD};

/// Scraped text shorter than this is replaced by the description + snippet
/// fallback.
pub const MIN_SCRAPED_CHARS: usize = 150;

/// The fallback must be longer than this or the article is dropped.
pub const MIN_FALLBACK_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Cluster,
    Synthesize,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "ingest"),
            Stage::Cluster => write!(f, "cluster"),
            Stage::Synthesize => write!(f, "synthesize"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Tunables for one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub similarity_threshold: f64,
    pub match_threshold: f64,
    /// Extract facts from a second cluster member and attach corroboration.
    pub resolve_conflicts: bool,
    /// Pass the search query to the extractor as its topic.
    pub topic_gate: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            resolve_conflicts: false,
            topic_gate: false,
        }
    }
}

impl PipelineOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            match_threshold: config.match_threshold,
            resolve_conflicts: config.resolve_conflicts,
            topic_gate: config.topic_gate,
        }
    }
}

pub struct Pipeline {
    source: Box<dyn ContentSource>,
    extractor: Box<dyn FactSource>,
    summarizer: Box<dyn SummarySource>,
    clustering: ClusteringEngine,
    resolver: ConflictResolver,
    options: PipelineOptions,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        source: impl ContentSource + 'static,
        extractor: impl FactSource + 'static,
        summarizer: impl SummarySource + 'static,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source: Box::new(source),
            extractor: Box::new(extractor),
            summarizer: Box::new(summarizer),
            clustering: ClusteringEngine::new(options.similarity_threshold),
            resolver: ConflictResolver::new(options.match_threshold),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs one batch end to end.
    ///
    /// An empty ingest short-circuits to an empty feed without touching the
    /// extractor or summarizer. Feed items come out in cluster order.
    pub async fn run(&self, request: &FeedRequest) -> FeedResponse {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "pipeline_run",
            %run_id,
            mode = %request.mode,
            category = %request.category,
            page = request.page
        );
        self.run_stages(request).instrument(span).await
    }

    async fn run_stages(&self, request: &FeedRequest) -> FeedResponse {
        enter(Stage::Ingest);
        let articles = self.ingest(request).await;
        tracing::info!(articles = articles.len(), "ingest complete");

        enter(Stage::Cluster);
        if articles.is_empty() {
            tracing::info!("nothing ingested; returning empty feed");
            enter(Stage::Done);
            return FeedResponse::default();
        }
        let clusters = self.clustering.group(articles);
        tracing::info!(clusters = clusters.len(), "clustering complete");

        enter(Stage::Synthesize);
        let topic = self.extraction_topic(request);
        let mut feed_items = Vec::with_capacity(clusters.len());
        for cluster in &clusters {
            feed_items.push(self.synthesize(cluster, topic).await);
        }

        enter(Stage::Done);
        tracing::info!(feed_items = feed_items.len(), "pipeline run complete");
        FeedResponse { feed_items }
    }

    /// Fetches up to the request's ingest limit and keeps articles with usable
    /// text, in source order.
    async fn ingest(&self, request: &FeedRequest) -> Vec<RawArticle> {
        let limit = request.ingest_limit();
        let records = self
            .source
            .search(request.query(), request.category(), request.page, limit)
            .await;
        tracing::debug!(records = records.len(), limit, "content source returned");

        let mut articles = Vec::with_capacity(records.len());
        for record in records.into_iter().take(limit) {
            let scraped = self.source.fetch_text(&record.url).await;
            match into_raw_article(record, scraped) {
                Some(article) => articles.push(article),
                None => tracing::debug!("dropped article without usable text"),
            }
        }
        articles
    }

    fn extraction_topic<'r>(&self, request: &'r FeedRequest) -> Option<&'r str> {
        if self.options.topic_gate && request.mode == FeedMode::Search {
            request.query()
        } else {
            None
        }
    }

    async fn synthesize(&self, cluster: &ArticleCluster, topic: Option<&str>) -> FeedItem {
        let representative = pick_representative(cluster);
        let facts = self
            .extractor
            .extract_facts(&representative.content, topic)
            .await;

        let corroboration = if self.options.resolve_conflicts {
            match longest_other_member(cluster, representative) {
                Some(other) => {
                    let other_facts = self.extractor.extract_facts(&other.content, topic).await;
                    Some(self.resolver.resolve(&facts, &other_facts))
                }
                None => None,
            }
        } else {
            None
        };

        let summary = self
            .summarizer
            .summarize(&representative.title, &facts)
            .await;

        tracing::debug!(
            url = %representative.url,
            cluster_size = cluster.len(),
            facts = facts.len(),
            corroborated = corroboration.is_some(),
            "synthesized feed item"
        );

        FeedItem {
            title: representative.title.clone(),
            summary,
            source_name: representative.source_name.clone(),
            url: representative.url.clone(),
            image_url: representative.image_url.clone(),
            facts,
            cluster_size: cluster.len(),
            corroboration,
        }
    }
}

fn enter(stage: Stage) {
    tracing::info!(%stage, "pipeline stage");
}

/// Applies the text fallback rule to one source record.
///
/// Scraped text of at least [`MIN_SCRAPED_CHARS`] is kept as-is. Otherwise
/// `description + " " + snippet` is used when it is longer than
/// [`MIN_FALLBACK_CHARS`]; anything shorter drops the article.
#[must_use]
pub fn into_raw_article(record: SourceArticle, scraped: String) -> Option<RawArticle> {
    let content = if scraped.chars().count() >= MIN_SCRAPED_CHARS {
        scraped
    } else {
        let fallback = format!("{} {}", record.description, record.snippet);
        if fallback.chars().count() <= MIN_FALLBACK_CHARS {
            return None;
        }
        fallback
    };

    Some(RawArticle {
        title: record.title,
        url: record.url,
        source_name: record.source_name,
        image_url: record.image_url,
        content,
        description: record.description,
        published_at: record.published_at,
    })
}

/// The longest-content member other than `representative`; earliest wins ties.
fn longest_other_member<'c>(
    cluster: &'c ArticleCluster,
    representative: &RawArticle,
) -> Option<&'c RawArticle> {
    let mut best: Option<(&RawArticle, usize)> = None;
    for article in cluster
        .members()
        .iter()
        .filter(|a| !std::ptr::eq(*a, representative))
    {
        let len = article.content.chars().count();
        if best.is_none_or(|(_, top)| len > top) {
            best = Some((article, len));
        }
    }
    best.map(|(article, _)| article)
}
