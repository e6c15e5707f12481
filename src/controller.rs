use std::sync::Arc;

use tracing::{debug, warn};

use crate::coordinator::Update;
use crate::error::FetchError;
use crate::filter::{self, FilterState};
use crate::models::{Article, Page};

/// Whether a fetch outcome replaces the pool or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Replace,
    Append,
}

/// A fetch the controller has decided to make. The caller performs the I/O
/// and hands the outcome back to [`PaginationController::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    pub page_index: u32,
}

/// The pagination state machine: owns the unfiltered article pool, the page
/// cursor, the single-flight guard and the filter state. Synchronous and
/// I/O-free; `begin_*` issue fetch requests, `finish` applies outcomes and
/// returns the updates to publish, in emission order.
///
/// States are Idle and Fetching only. A `begin_*` while a fetch is in flight
/// is silently dropped, never queued, and never cancels the older request.
#[derive(Debug)]
pub struct PaginationController {
    pool: Vec<Article>,
    page_index: u32,
    in_flight: bool,
    filter: FilterState,
}

impl PaginationController {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            pool: Vec::new(),
            page_index: 1,
            in_flight: false,
            filter: FilterState::new(keywords),
        }
    }

    /// Last successfully loaded page index, starting at 1.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn filter_active(&self) -> bool {
        self.filter.is_active()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Starts a fresh first-page load, resetting the cursor to 1. Dropped
    /// when a fetch is already in flight.
    pub fn begin_first(&mut self) -> Option<FetchRequest> {
        if self.in_flight {
            debug!("load dropped, fetch already in flight");
            return None;
        }
        self.in_flight = true;
        self.page_index = 1;
        Some(FetchRequest {
            kind: FetchKind::Replace,
            page_index: 1,
        })
    }

    /// Starts a load of the next page. Dropped when a fetch is in flight or
    /// the filter is active: filtering is computed client-side over the
    /// already-fetched pool, so paging further while filtered would grow a
    /// pool the user cannot see.
    ///
    /// The cursor advances only when the append succeeds, so a failed
    /// load-more re-fetches the same index on retry.
    pub fn begin_more(&mut self) -> Option<FetchRequest> {
        if self.in_flight {
            debug!("load more dropped, fetch already in flight");
            return None;
        }
        if self.filter.is_active() {
            debug!("load more dropped, filter active");
            return None;
        }
        self.in_flight = true;
        Some(FetchRequest {
            kind: FetchKind::Append,
            page_index: self.page_index + 1,
        })
    }

    /// Applies a fetch outcome. Exactly one of `DataReplaced`,
    /// `DataAppended` or `LoadFailed` is produced per completed fetch; a
    /// replace is preceded by `FilterChanged` so surfaces refresh their
    /// filter affordance before the data lands. An empty page completes
    /// normally with an empty item list.
    pub fn finish(&mut self, request: FetchRequest, result: Result<Page, FetchError>) -> Vec<Update> {
        self.in_flight = false;
        match result {
            Ok(page) => match request.kind {
                FetchKind::Replace => {
                    self.pool = page.articles;
                    vec![
                        Update::FilterChanged(self.filter.is_active()),
                        Update::DataReplaced(self.visible()),
                    ]
                }
                FetchKind::Append => {
                    let fresh = page.articles;
                    self.pool.extend(fresh.iter().cloned());
                    self.page_index = request.page_index;
                    vec![Update::DataAppended(fresh)]
                }
            },
            Err(err) => {
                warn!(
                    page_index = request.page_index,
                    error = %err,
                    "feed fetch failed, pool left untouched"
                );
                vec![Update::LoadFailed(Arc::new(err))]
            }
        }
    }

    /// Flips the filter. Always a full replace of the visible set, never an
    /// append, with the filter change published first.
    pub fn toggle_filter(&mut self) -> Vec<Update> {
        let active = self.filter.toggle();
        debug!(active, "topic filter toggled");
        vec![
            Update::FilterChanged(active),
            Update::DataReplaced(self.visible()),
        ]
    }

    /// The currently visible list: the filtered view when the filter is
    /// active, otherwise the whole pool.
    pub fn visible(&self) -> Vec<Article> {
        if self.filter.is_active() {
            filter::apply(&self.pool, self.filter.keywords())
        } else {
            self.pool.clone()
        }
    }
}
