//! Near-duplicate story grouping.
//!
//! Articles are compared on `title + " " + description` with TF-IDF cosine
//! similarity and merged by average-linkage agglomeration: the two groups with
//! the highest mean pairwise similarity merge while that mean is at least the
//! threshold. No cluster count is fixed in advance.

mod stop_words;
mod tfidf;

use sigma_core::{ArticleCluster, RawArticle};

/// Default minimum average similarity for two groups to merge.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.45;

#[derive(Debug, Clone, Copy)]
pub struct ClusteringEngine {
    similarity_threshold: f64,
}

impl Default for ClusteringEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl ClusteringEngine {
    #[must_use]
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    #[must_use]
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Partitions `articles` into duplicate-story clusters.
    ///
    /// Every article lands in exactly one cluster. Clusters are ordered by the
    /// input position of their earliest member and keep members in input
    /// order. Fewer than two articles, or text with no usable terms, yields
    /// one singleton per article.
    #[must_use]
    pub fn group(&self, articles: Vec<RawArticle>) -> Vec<ArticleCluster> {
        let groups = self.partition(&articles);
        tracing::debug!(
            articles = articles.len(),
            clusters = groups.len(),
            threshold = self.similarity_threshold,
            "clustered articles"
        );

        let mut slots: Vec<Option<RawArticle>> = articles.into_iter().map(Some).collect();
        groups
            .into_iter()
            .filter_map(|indices| {
                let first = *indices.first()?;
                let members = indices
                    .into_iter()
                    .filter_map(|i| slots[i].take())
                    .collect();
                ArticleCluster::new(first, members)
            })
            .collect()
    }

    /// Index groups, each sorted ascending, ordered by first index.
    fn partition(&self, articles: &[RawArticle]) -> Vec<Vec<usize>> {
        let singletons = || (0..articles.len()).map(|i| vec![i]).collect();
        if articles.len() < 2 {
            return singletons();
        }

        let texts: Vec<String> = articles.iter().map(RawArticle::similarity_text).collect();
        let Some(similarity) = tfidf::similarity_matrix(&texts) else {
            tracing::debug!("no usable terms in batch; keeping every article separate");
            return singletons();
        };

        agglomerate(&similarity, self.similarity_threshold)
    }
}

/// Average-linkage agglomeration over a precomputed similarity matrix.
///
/// Groups stay sorted by their smallest index, so scanning pairs in order and
/// keeping only strictly better scores resolves ties towards the lowest
/// indices.
fn agglomerate(similarity: &[Vec<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = (0..similarity.len()).map(|i| vec![i]).collect();

    while groups.len() > 1 {
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..groups.len() {
            for j in (i + 1)..groups.len() {
                let score = average_similarity(similarity, &groups[i], &groups[j]);
                if best.is_none_or(|(top, _, _)| score > top) {
                    best = Some((score, i, j));
                }
            }
        }

        match best {
            Some((score, i, j)) if score >= threshold => {
                let absorbed = groups.remove(j);
                groups[i].extend(absorbed);
                groups[i].sort_unstable();
            }
            _ => break,
        }
    }

    groups
}

fn average_similarity(similarity: &[Vec<f64>], a: &[usize], b: &[usize]) -> f64 {
    let total: f64 = a
        .iter()
        .flat_map(|&x| b.iter().map(move |&y| similarity[x][y]))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let pairs = (a.len() * b.len()) as f64;
    total / pairs
}

/// The member with the longest `content` (in characters); the earliest such
/// member wins ties.
#[must_use]
pub fn pick_representative(cluster: &ArticleCluster) -> &RawArticle {
    let (first, rest) = cluster.split_first();
    let mut best = (first, first.content.chars().count());
    for article in rest {
        let len = article.content.chars().count();
        if len > best.1 {
            best = (article, len);
        }
    }
    best.0
}

#[cfg(test)]
#[path = "clustering_test.rs"]
mod tests;
