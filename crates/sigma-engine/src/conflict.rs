//! Cross-source fact reconciliation.
//!
//! Facts from source A are matched greedily against source B. Each A-fact is
//! scored against every unclaimed B-fact with the larger of a character
//! sequence-matcher ratio (`2 * matches / total_len`) and word-set Jaccard
//! overlap; the best candidate at or
//! above the match threshold is claimed and recorded as an agreement.
//! Unclaimed B-facts are not reported.

use std::collections::HashSet;

use difflib::sequencematcher::SequenceMatcher;
use sigma_core::{Agreement, Confidence, Fact, ResolvedFactSet, UniqueFact};

/// Default minimum combined score for two facts to count as the same claim.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    match_threshold: f64,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl ConflictResolver {
    #[must_use]
    pub fn new(match_threshold: f64) -> Self {
        Self { match_threshold }
    }

    /// Reconciles `facts_a` against `facts_b` from A's point of view.
    #[must_use]
    pub fn resolve(&self, facts_a: &[Fact], facts_b: &[Fact]) -> ResolvedFactSet {
        let mut remaining: Vec<String> = facts_b.iter().map(Fact::sentence).collect();
        let mut resolved = ResolvedFactSet::default();

        for fact in facts_a {
            let sentence = fact.sentence();

            let mut best: Option<(usize, f64)> = None;
            for (index, candidate) in remaining.iter().enumerate() {
                let score = combined_score(&sentence, candidate);
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((index, score));
                }
            }

            match best {
                Some((index, score)) if score >= self.match_threshold => {
                    remaining.remove(index);
                    resolved.agreements.push(Agreement {
                        fact_text: sentence,
                        confidence: Confidence::High,
                        score,
                    });
                }
                _ => resolved.unique.push(UniqueFact {
                    fact_text: sentence,
                    confidence: Confidence::Medium,
                }),
            }
        }

        resolved
    }
}

/// `max(sequence_ratio, jaccard)`, both case-insensitive.
#[must_use]
pub fn combined_score(a: &str, b: &str) -> f64 {
    sequence_ratio(a, b).max(jaccard(a, b))
}

/// Matching-blocks ratio over lowercased characters: twice the number of
/// characters in matching blocks over the combined length. 0 if either side
/// is empty.
fn sequence_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();
    let mut matcher = SequenceMatcher::new(&a_chars, &b_chars);
    f64::from(matcher.ratio())
}

/// Word-set overlap `|A ∩ B| / |A ∪ B|`; 0 if either side has no words.
fn jaccard(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = intersection as f64 / union as f64;
    ratio
}
