//! Endpoint and parameter selection for a NewsAPI request.
//!
//! `/v2/top-headlines` only accepts `country`/`category` filters and
//! `/v2/everything` rejects them, so the two shapes never mix: a plan either
//! carries `country` (top headlines) or carries neither (everything).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TopHeadlines,
    Everything,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TopHeadlines => "v2/top-headlines",
            Endpoint::Everything => "v2/everything",
        }
    }
}

/// A fully decided request: which endpoint, and which query parameters
/// (excluding the API key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl PlannedQuery {
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Decides the endpoint and parameters for a query/category/page request.
///
/// A non-empty query always wins over the category and routes to
/// `/v2/everything`; queries mentioning "live" sort by recency instead of
/// relevancy.
#[must_use]
pub fn plan_query(
    query: Option<&str>,
    category: Option<&str>,
    page: u32,
    page_size: usize,
) -> PlannedQuery {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let mut country = "us";
    let mut headline_category: Option<String> = None;
    let mut q: Option<String> = None;
    let mut sort_by: Option<&str> = None;

    let mut use_everything = false;

    if let Some(cat) = category.map(|c| c.trim().to_lowercase()) {
        match cat.as_str() {
            "india" => {
                country = "in";
                headline_category = Some("general".to_string());
            }
            "politics" => {
                use_everything = true;
                q = Some("politics".to_string());
                sort_by = Some("publishedAt");
            }
            "world" => {
                headline_category = Some("general".to_string());
            }
            "all" | "" => {}
            other => headline_category = Some(other.to_string()),
        }
    }

    if let Some(query) = query {
        use_everything = true;
        q = Some(query.to_string());
        sort_by = Some(if query.to_lowercase().contains("live") {
            "publishedAt"
        } else {
            "relevancy"
        });
    }

    let mut params = vec![
        ("page".to_string(), page.max(1).to_string()),
        ("pageSize".to_string(), page_size.to_string()),
        ("language".to_string(), "en".to_string()),
    ];
    if let Some(q) = q {
        params.push(("q".to_string(), q));
    }
    if let Some(sort_by) = sort_by {
        params.push(("sortBy".to_string(), sort_by.to_string()));
    }

    let endpoint = if use_everything {
        Endpoint::Everything
    } else {
        params.push(("country".to_string(), country.to_string()));
        if let Some(cat) = headline_category {
            params.push(("category".to_string(), cat));
        }
        Endpoint::TopHeadlines
    };

    PlannedQuery { endpoint, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_us_top_headlines() {
        let plan = plan_query(None, None, 1, 10);
        assert_eq!(plan.endpoint, Endpoint::TopHeadlines);
        assert_eq!(plan.param("country"), Some("us"));
        assert_eq!(plan.param("category"), None);
        assert_eq!(plan.param("language"), Some("en"));
        assert_eq!(plan.param("pageSize"), Some("10"));
        assert_eq!(plan.param("page"), Some("1"));
    }

    #[test]
    fn all_category_has_no_category_filter() {
        let plan = plan_query(None, Some("all"), 2, 15);
        assert_eq!(plan.endpoint, Endpoint::TopHeadlines);
        assert_eq!(plan.param("category"), None);
        assert_eq!(plan.param("page"), Some("2"));
    }

    #[test]
    fn standard_category_is_passed_through() {
        let plan = plan_query(None, Some("Sports"), 1, 10);
        assert_eq!(plan.endpoint, Endpoint::TopHeadlines);
        assert_eq!(plan.param("category"), Some("sports"));
        assert_eq!(plan.param("country"), Some("us"));
    }

    #[test]
    fn india_switches_country() {
        let plan = plan_query(None, Some("india"), 1, 10);
        assert_eq!(plan.endpoint, Endpoint::TopHeadlines);
        assert_eq!(plan.param("country"), Some("in"));
        assert_eq!(plan.param("category"), Some("general"));
    }

    #[test]
    fn world_is_us_general() {
        let plan = plan_query(None, Some("world"), 1, 10);
        assert_eq!(plan.param("country"), Some("us"));
        assert_eq!(plan.param("category"), Some("general"));
    }

    #[test]
    fn politics_uses_everything_search() {
        let plan = plan_query(None, Some("politics"), 1, 10);
        assert_eq!(plan.endpoint, Endpoint::Everything);
        assert_eq!(plan.param("q"), Some("politics"));
        assert_eq!(plan.param("sortBy"), Some("publishedAt"));
        assert_eq!(plan.param("country"), None);
        assert_eq!(plan.param("category"), None);
    }

    #[test]
    fn query_overrides_category() {
        let plan = plan_query(Some("starship"), Some("science"), 1, 15);
        assert_eq!(plan.endpoint, Endpoint::Everything);
        assert_eq!(plan.param("q"), Some("starship"));
        assert_eq!(plan.param("sortBy"), Some("relevancy"));
        assert_eq!(plan.param("category"), None);
        assert_eq!(plan.param("country"), None);
    }

    #[test]
    fn live_query_sorts_by_recency() {
        let plan = plan_query(Some("India vs Australia live"), None, 1, 15);
        assert_eq!(plan.endpoint, Endpoint::Everything);
        assert_eq!(plan.param("sortBy"), Some("publishedAt"));
    }

    #[test]
    fn blank_query_is_ignored() {
        let plan = plan_query(Some("   "), Some("health"), 1, 10);
        assert_eq!(plan.endpoint, Endpoint::TopHeadlines);
        assert_eq!(plan.param("q"), None);
        assert_eq!(plan.param("category"), Some("health"));
    }

    #[test]
    fn page_zero_is_sent_as_one() {
        let plan = plan_query(None, None, 0, 10);
        assert_eq!(plan.param("page"), Some("1"));
    }
}
