use serde::Deserialize;
use url::Url;

/// A single news article as it lives in the pool. All wire fields are
/// optional; articles without an `id` have no stable identity and can never
/// be favorited or linked to.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<Url>,
    /// Server-issued correlation token of the page this article arrived in.
    pub request_id: Option<String>,
}

impl Article {
    /// Link to the full article on the site. Defined only when both the
    /// article id and the page's request id are known.
    pub fn detail_url(&self, article_base: &str) -> Option<Url> {
        let id = self.id?;
        let request_id = self.request_id.as_deref()?;
        let mut url = Url::parse(&format!("{article_base}/{id}")).ok()?;
        url.query_pairs_mut().append_pair("requestId", request_id);
        Some(url)
    }
}

/// One fetch response unit: the articles of a single page, each already
/// stamped with the page's request id.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub articles: Vec<Article>,
    pub request_id: Option<String>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub(crate) fn from_raw(raw: RawPage) -> Self {
        let request_id = raw.request_id;
        let articles = raw
            .news
            .unwrap_or_default()
            .into_iter()
            .map(|item| Article {
                id: item.news_id,
                title: item.title,
                summary: item.announce,
                image_url: item.img.and_then(|img| img.url),
                request_id: request_id.clone(),
            })
            .collect();
        Self {
            articles,
            request_id,
        }
    }
}

// Wire shape of the section endpoint. A missing `news` array is a valid
// empty page, not a decode failure.

#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    pub news: Option<Vec<RawArticle>>,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArticle {
    #[serde(rename = "newsId")]
    pub news_id: Option<i64>,
    pub title: Option<String>,
    pub announce: Option<String>,
    pub img: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawImage {
    pub url: Option<Url>,
}
