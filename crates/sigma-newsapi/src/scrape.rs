//! Best-effort article page text extraction.
//!
//! Pages are fetched with a short timeout and reduced to plain text with
//! regexes: non-content blocks are dropped, remaining tags stripped, common
//! entities decoded, and whitespace collapsed. Any failure yields an empty
//! string; callers fall back to the API's description and snippet.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use crate::error::NewsApiError;

/// Upper bound on extracted text, in characters.
pub const MAX_TEXT_CHARS: usize = 5_000;

static NON_CONTENT_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "nav", "footer", "iframe"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("valid non-content block regex")
        })
        .collect()
});

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Fetches article pages and reduces them to plain text.
pub struct PageScraper {
    client: Client,
}

impl PageScraper {
    /// Creates a scraper with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, NewsApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Returns the page's plain text, or an empty string on any failure.
    pub async fn fetch_text(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(html) => clean_html(&html),
            Err(e) => {
                tracing::debug!(url, error = %e, "page scrape failed");
                String::new()
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, NewsApiError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Reduces an HTML document to collapsed plain text of at most
/// [`MAX_TEXT_CHARS`] characters.
#[must_use]
pub fn clean_html(html: &str) -> String {
    let mut text = COMMENTS.replace_all(html, " ").into_owned();
    for block in NON_CONTENT_BLOCKS.iter() {
        text = block.replace_all(&text, " ").into_owned();
    }
    let text = TAGS.replace_all(&text, " ");
    let text = decode_entities(&text);

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect()
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Launch\n day</h1>\n<p>SpaceX   flew.</p></body></html>";
        assert_eq!(clean_html(html), "Launch day SpaceX flew.");
    }

    #[test]
    fn drops_non_content_blocks() {
        let html = r#"<nav><a href="/">Home</a></nav>
            <script type="text/javascript">var tracking = 1;</script>
            <style>.x { color: red; }</style>
            <p>Body text.</p>
            <iframe src="ad.html">ad</iframe>
            <footer>Copyright</footer>"#;
        assert_eq!(clean_html(html), "Body text.");
    }

    #[test]
    fn drops_comments() {
        assert_eq!(clean_html("<p>a<!-- hidden --> b</p>"), "a b");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            clean_html("<p>Q&amp;A: &quot;Tom&#39;s&quot;&nbsp;view</p>"),
            "Q&A: \"Tom's\" view"
        );
    }

    #[test]
    fn truncates_long_pages() {
        let html = format!("<p>{}</p>", "word ".repeat(3_000));
        assert_eq!(clean_html(&html).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn empty_document_is_empty() {
        assert_eq!(clean_html(""), "");
    }
}
