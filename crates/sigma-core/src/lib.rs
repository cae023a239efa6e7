//! Shared domain types, credential pools, and configuration for the Sigma
//! news engine.

pub mod app_config;
pub mod config;
pub mod credentials;
pub mod request;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{call_with_rotation, CredentialPool, RateLimitSignal, RotationError};
pub use request::{FeedMode, FeedRequest, FeedResponse};
pub use types::{
    Agreement, ArticleCluster, Confidence, Fact, FeedItem, RawArticle, ResolvedFactSet,
    SourceArticle, UniqueFact, MAX_FACTS_PER_ARTICLE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
