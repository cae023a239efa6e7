//! Groq chat-completions client plus the two generative stages of the news
//! pipeline: structured fact extraction and fixed-length summarization.
//!
//! Both stages draw credentials from a shared [`sigma_core::CredentialPool`]
//! and fail soft: they never return an error to the orchestrator.

pub mod client;
pub mod error;
pub mod extractor;
pub mod summarizer;
pub mod types;

pub use client::GroqClient;
pub use error::LlmError;
pub use extractor::FactExtractor;
pub use summarizer::{Summarizer, FACTS_UNAVAILABLE, SUMMARY_UNAVAILABLE};
pub use types::{ChatMessage, ChatRequest, ResponseFormat};
