use std::time::Duration;

/// Engine configuration. Built in code and passed down explicitly; the core
/// reads no config file and no environment.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Section endpoint including rubric and page size; `&pageIndex=<n>` is
    /// appended per fetch.
    pub feed_url: String,
    /// Base of the per-article detail link.
    pub article_base: String,
    /// Topic keywords for the client-side filter, matched case-insensitively.
    pub keywords: Vec<String>,
    pub request_timeout: Duration,
    /// Capacity of the intent channel into the coordinator loop.
    pub intent_capacity: usize,
    /// Capacity of the update broadcast to display surfaces.
    pub update_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://news.myseldon.com/api/Section?rubricId=4&pageSize=20".to_string(),
            article_base: "https://news.myseldon.com/ru/news/index".to_string(),
            keywords: [
                "япония",
                "япони",
                "токио",
                "kyoto",
                "japan",
                "азия",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            request_timeout: Duration::from_secs(10),
            intent_capacity: 32,
            update_capacity: 64,
        }
    }
}
