use crate::models::Article;

/// Client-side topic filter: an on/off flag plus the keyword set it matches
/// against. Filtering is a computed view over the pool and never mutates it.
#[derive(Debug, Clone)]
pub struct FilterState {
    active: bool,
    keywords: Vec<String>,
}

impl FilterState {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            active: false,
            keywords: keywords.into_iter().map(|kw| kw.to_lowercase()).collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Flips the filter and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}

/// Keeps the articles whose lowercased title+summary contains any keyword as
/// a substring (no word-boundary check). Order-preserving and deterministic.
pub fn apply(pool: &[Article], keywords: &[String]) -> Vec<Article> {
    pool.iter()
        .filter(|article| {
            let haystack = format!(
                "{}{}",
                article.title.as_deref().unwrap_or(""),
                article.summary.as_deref().unwrap_or("")
            )
            .to_lowercase();
            keywords.iter().any(|kw| haystack.contains(kw.as_str()))
        })
        .cloned()
        .collect()
}
