use std::collections::HashSet;

use tracing::debug;

use crate::models::Article;

/// Session-scoped favorites: a deduplicating id set next to an
/// insertion-ordered list for display. An id is in the list iff it is in the
/// set. All operations are idempotent; articles without an id are ignored
/// since they have no stable key.
///
/// The store is owned by the coordinator loop, which serializes every
/// mutation; surfaces reach it through intents, never directly.
#[derive(Debug, Default)]
pub struct FavoritesStore {
    ids: HashSet<i64>,
    ordered: Vec<Article>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds if absent, removes if present. A removed-then-re-added article
    /// moves to the end of the list.
    pub fn toggle(&mut self, article: &Article) {
        let Some(id) = article.id else {
            debug!("favorite toggle ignored, article has no id");
            return;
        };
        if self.ids.contains(&id) {
            self.remove(article);
        } else {
            self.ids.insert(id);
            self.ordered.push(article.clone());
        }
    }

    /// No-op when the article is already a member (does not reorder).
    pub fn add(&mut self, article: &Article) {
        let Some(id) = article.id else {
            return;
        };
        if self.ids.insert(id) {
            self.ordered.push(article.clone());
        }
    }

    /// No-op when the article is not a member.
    pub fn remove(&mut self, article: &Article) {
        let Some(id) = article.id else {
            return;
        };
        if self.ids.remove(&id) {
            self.ordered.retain(|existing| existing.id != Some(id));
        }
    }

    pub fn contains(&self, article: &Article) -> bool {
        article.id.is_some_and(|id| self.ids.contains(&id))
    }

    /// Favorites in insertion order, most recently favorited last.
    pub fn list(&self) -> Vec<Article> {
        self.ordered.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
