//! Story clustering, fact reconciliation and the feed pipeline.
//!
//! [`Pipeline`] drives one batch through ingest, clustering and synthesis
//! using the collaborator traits in [`collaborators`].

pub mod clustering;
pub mod collaborators;
pub mod conflict;
pub mod pipeline;

pub use clustering::{pick_representative, ClusteringEngine, DEFAULT_SIMILARITY_THRESHOLD};
pub use collaborators::{ContentSource, FactSource, NewsApiSource, SummarySource};
pub use conflict::{combined_score, ConflictResolver, DEFAULT_MATCH_THRESHOLD};
pub use pipeline::{into_raw_article, Pipeline, PipelineOptions, Stage};
