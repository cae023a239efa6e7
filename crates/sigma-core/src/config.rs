use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional: missing credentials produce empty pools, which
/// the pipeline treats as a degraded but valid setup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_ratio = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(var, format!("{value} is outside [0, 1]")));
        }
        Ok(value)
    };

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        parse_bool(&or_default(var, "false")).ok_or_else(|| {
            invalid(
                var,
                "expected one of true/false/1/0/yes/no".to_string(),
            )
        })
    };

    let news_api_keys = split_keys(&or_default("NEWS_API_KEY", ""));
    let groq_api_keys = split_keys(&or_default("GROQ_API_KEY", ""));

    let log_level = or_default("SIGMA_LOG_LEVEL", "info");
    let newsapi_base_url = or_default("SIGMA_NEWSAPI_BASE_URL", "https://newsapi.org");
    let groq_base_url = or_default("SIGMA_GROQ_BASE_URL", "https://api.groq.com/openai/v1");
    let extraction_model = or_default("SIGMA_EXTRACTION_MODEL", "llama-3.1-8b-instant");
    let summary_model = or_default("SIGMA_SUMMARY_MODEL", "llama-3.1-8b-instant");

    let similarity_threshold = parse_ratio("SIGMA_SIMILARITY_THRESHOLD", "0.45")?;
    let match_threshold = parse_ratio("SIGMA_MATCH_THRESHOLD", "0.5")?;
    let scrape_timeout_secs = parse_u64("SIGMA_SCRAPE_TIMEOUT_SECS", "5")?;
    let scraper_user_agent = or_default(
        "SIGMA_SCRAPER_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    );
    let resolve_conflicts = parse_flag("SIGMA_RESOLVE_CONFLICTS")?;
    let topic_gate = parse_flag("SIGMA_TOPIC_GATE")?;

    Ok(AppConfig {
        news_api_keys,
        groq_api_keys,
        log_level,
        newsapi_base_url,
        groq_base_url,
        extraction_model,
        summary_model,
        similarity_threshold,
        match_threshold,
        scrape_timeout_secs,
        scraper_user_agent,
        resolve_conflicts,
        topic_gate,
    })
}

/// Split a comma-separated credential list, dropping blanks.
fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
