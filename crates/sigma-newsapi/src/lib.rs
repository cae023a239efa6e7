//! NewsAPI content source and article page scraper.

pub mod client;
pub mod error;
pub mod query;
pub mod scrape;
pub mod types;

pub use client::NewsApiClient;
pub use error::NewsApiError;
pub use query::{plan_query, Endpoint, PlannedQuery};
pub use scrape::{clean_html, PageScraper};
