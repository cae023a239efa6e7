use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article record as returned by a content source, before ingestion
/// decides what text to keep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceArticle {
    pub title: String,
    pub url: String,
    pub source_name: String,
    pub image_url: Option<String>,
    pub description: String,
    /// Truncated body snippet supplied by the source API.
    pub snippet: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// An article that survived ingestion and carries usable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub source_name: String,
    pub image_url: Option<String>,
    /// Scraped full text, or the description + snippet fallback.
    pub content: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawArticle {
    /// Text used for similarity comparison: `title + " " + description`.
    #[must_use]
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Articles believed to describe the same event.
///
/// Members keep their input order. `first_index` is the batch position of the
/// earliest member and serves as the cluster's ordering key. A cluster always
/// has at least one member.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCluster {
    first_index: usize,
    members: Vec<RawArticle>,
}

impl ArticleCluster {
    /// Returns `None` for an empty member list.
    #[must_use]
    pub fn new(first_index: usize, members: Vec<RawArticle>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            first_index,
            members,
        })
    }

    /// The earliest member and the rest, in input order.
    #[must_use]
    pub fn split_first(&self) -> (&RawArticle, &[RawArticle]) {
        (&self.members[0], &self.members[1..])
    }

    #[must_use]
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    #[must_use]
    pub fn members(&self) -> &[RawArticle] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Upper bound on facts kept per article.
pub const MAX_FACTS_PER_ARTICLE: usize = 2;

/// A minimal structured claim pulled from article text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub object: String,
}

impl Fact {
    #[must_use]
    pub fn new(actor: &str, action: &str, object: &str) -> Self {
        Self {
            actor: actor.to_string(),
            action: action.to_string(),
            object: object.to_string(),
        }
    }

    /// A fact needs both an actor and an action to be usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.actor.trim().is_empty() && !self.action.trim().is_empty()
    }

    /// Flattened `actor action object` sentence, trimmed.
    #[must_use]
    pub fn sentence(&self) -> String {
        format!("{} {} {}", self.actor, self.action, self.object)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Corroborated by more than one source.
    High,
    /// Reported by a single source.
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub fact_text: String,
    pub confidence: Confidence,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueFact {
    pub fact_text: String,
    pub confidence: Confidence,
}

/// Outcome of reconciling two sources' facts, from the first source's view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFactSet {
    pub agreements: Vec<Agreement>,
    pub unique: Vec<UniqueFact>,
}

/// One synthesized story in the output feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub summary: String,
    pub source_name: String,
    pub url: String,
    pub image_url: Option<String>,
    pub facts: Vec<Fact>,
    /// Number of ingested articles folded into this story.
    pub cluster_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corroboration: Option<ResolvedFactSet>,
}
