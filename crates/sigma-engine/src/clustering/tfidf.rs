//! TF-IDF vectors over unigrams and bigrams, compared by cosine similarity.
//!
//! Tokens are lowercase runs of two or more word characters. Stop words are
//! removed before bigrams are formed, so "launch of Starship" yields the
//! bigram "launch starship". Weights are raw counts times smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalised.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::stop_words::is_stop_word;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Sparse, L2-normalised document row: term index to weight.
type Row = HashMap<usize, f64>;

/// Unigram and bigram terms of one document, in order, with repeats.
pub(crate) fn terms(doc: &str) -> Vec<String> {
    let lowered = doc.to_lowercase();
    let tokens: Vec<&str> = TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let bigrams = tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));
    tokens
        .iter()
        .map(|t| (*t).to_string())
        .chain(bigrams)
        .collect()
}

/// Pairwise cosine similarity matrix for `docs`.
///
/// Returns `None` when no document yields a single term, so callers can fall
/// back to treating every document as distinct.
pub(crate) fn similarity_matrix(docs: &[String]) -> Option<Vec<Vec<f64>>> {
    let rows = vectorize(docs)?;
    let matrix = rows
        .iter()
        .map(|a| rows.iter().map(|b| dot(a, b)).collect())
        .collect();
    Some(matrix)
}

fn vectorize(docs: &[String]) -> Option<Vec<Row>> {
    let doc_terms: Vec<Vec<String>> = docs.iter().map(|d| terms(d)).collect();

    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    let mut doc_freq: Vec<usize> = Vec::new();
    for terms in &doc_terms {
        let mut seen: Vec<usize> = Vec::new();
        for term in terms {
            let next = vocabulary.len();
            let index = *vocabulary.entry(term.as_str()).or_insert(next);
            if index == doc_freq.len() {
                doc_freq.push(0);
            }
            if !seen.contains(&index) {
                seen.push(index);
                doc_freq[index] += 1;
            }
        }
    }

    if vocabulary.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = docs.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let idf: Vec<f64> = doc_freq
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let rows = doc_terms
        .iter()
        .map(|terms| {
            let mut row: Row = HashMap::new();
            for term in terms {
                let index = vocabulary[term.as_str()];
                *row.entry(index).or_insert(0.0) += idf[index];
            }
            let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in row.values_mut() {
                    *weight /= norm;
                }
            }
            row
        })
        .collect();

    Some(rows)
}

/// Dot product of two normalised rows; an empty row has similarity 0 with
/// everything.
fn dot(a: &Row, b: &Row) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(index, w)| large.get(index).map(|v| w * v))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn terms_drop_stop_words_before_bigrams() {
        assert_eq!(
            terms("The launch of Starship"),
            vec!["launch", "starship", "launch starship"]
        );
    }

    #[test]
    fn terms_skip_single_characters() {
        assert_eq!(terms("A b cd"), vec!["cd"]);
    }

    #[test]
    fn identical_documents_have_similarity_one() {
        let m = similarity_matrix(&docs(&["rocket launch texas", "rocket launch texas"])).unwrap();
        assert!((m[0][1] - 1.0).abs() < 1e-9);
        assert!((m[0][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_documents_have_similarity_zero() {
        let m = similarity_matrix(&docs(&["rocket launch", "election recount"])).unwrap();
        assert!(m[0][1].abs() < 1e-12);
    }

    #[test]
    fn document_without_terms_is_orthogonal() {
        let m = similarity_matrix(&docs(&["rocket launch", "of the and"])).unwrap();
        assert!(m[0][1].abs() < 1e-12);
        assert!(m[1][1].abs() < 1e-12);
    }

    #[test]
    fn empty_vocabulary_yields_none() {
        assert!(similarity_matrix(&docs(&["the of", "and a", ""])).is_none());
    }

    #[test]
    fn matrix_is_symmetric() {
        let m = similarity_matrix(&docs(&[
            "starship rocket launch",
            "starship launch delayed",
            "election results",
        ]))
        .unwrap();
        for (i, row) in m.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                assert!((value - m[j][i]).abs() < 1e-12);
            }
        }
    }
}
