#[derive(Clone)]
pub struct AppConfig {
    pub news_api_keys: Vec<String>,
    pub groq_api_keys: Vec<String>,
    pub log_level: String,
    pub newsapi_base_url: String,
    pub groq_base_url: String,
    pub extraction_model: String,
    pub summary_model: String,
    pub similarity_threshold: f64,
    pub match_threshold: f64,
    pub scrape_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub resolve_conflicts: bool,
    pub topic_gate: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "news_api_keys",
                &format!("[{} redacted]", self.news_api_keys.len()),
            )
            .field(
                "groq_api_keys",
                &format!("[{} redacted]", self.groq_api_keys.len()),
            )
            .field("log_level", &self.log_level)
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("groq_base_url", &self.groq_base_url)
            .field("extraction_model", &self.extraction_model)
            .field("summary_model", &self.summary_model)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("match_threshold", &self.match_threshold)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("resolve_conflicts", &self.resolve_conflicts)
            .field("topic_gate", &self.topic_gate)
            .finish()
    }
}
