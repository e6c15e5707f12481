use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::controller::{FetchRequest, PaginationController};
use crate::error::FetchError;
use crate::favorites::FavoritesStore;
use crate::models::{Article, Page};
use crate::source::FeedSource;

/// Typed update pushed to every subscribed display surface. When several
/// apply to one user action they are published in this order:
/// `FilterChanged` first, then exactly one of the data updates.
#[derive(Debug, Clone)]
pub enum Update {
    /// The filter affordance changed; published before any data update so
    /// empty-state messaging reflects the new filter, not the old one.
    FilterChanged(bool),
    /// Full replacement of the visible list (first load, filter toggle,
    /// refresh).
    DataReplaced(Vec<Article>),
    /// Incremental addition, carrying only the new items (successful
    /// load-more only; never published while the filter is active).
    DataAppended(Vec<Article>),
    /// A fetch failed; surfaces clear loading affordances, no data changes.
    LoadFailed(Arc<FetchError>),
}

/// User intent from a display surface. Queries carry a reply channel so
/// every read, like every write, happens on the coordinator loop.
#[derive(Debug)]
pub enum Intent {
    LoadFirst,
    LoadMore,
    ToggleFilter,
    ToggleFavorite(Article),
    IsFavorite(Article, oneshot::Sender<bool>),
    ListFavorites(oneshot::Sender<Vec<Article>>),
    /// Snapshot of the currently visible list, for story mode and
    /// random-article navigation.
    Visible(oneshot::Sender<Vec<Article>>),
}

struct FetchDone {
    request: FetchRequest,
    result: Result<Page, FetchError>,
}

/// Surface-facing handle to the coordinator loop.
pub struct CoordinatorHandle {
    intents: mpsc::Sender<Intent>,
    updates: broadcast::Sender<Update>,
    join: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<Update> {
        self.updates.subscribe()
    }

    pub async fn load_first(&self) {
        self.send(Intent::LoadFirst).await;
    }

    pub async fn load_more(&self) {
        self.send(Intent::LoadMore).await;
    }

    pub async fn toggle_filter(&self) {
        self.send(Intent::ToggleFilter).await;
    }

    pub async fn toggle_favorite(&self, article: Article) {
        self.send(Intent::ToggleFavorite(article)).await;
    }

    pub async fn is_favorite(&self, article: &Article) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Intent::IsFavorite(article.clone(), reply_tx)).await;
        reply_rx.await.unwrap_or(false)
    }

    pub async fn favorites(&self) -> Vec<Article> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Intent::ListFavorites(reply_tx)).await;
        reply_rx.await.unwrap_or_default()
    }

    pub async fn visible(&self) -> Vec<Article> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Intent::Visible(reply_tx)).await;
        reply_rx.await.unwrap_or_default()
    }

    /// Closes the intent channel and waits for the loop to drain and exit.
    pub async fn stop(self) {
        drop(self.intents);
        if let Err(err) = self.join.await {
            warn!(error = %err, "coordinator task failed");
        }
    }

    async fn send(&self, intent: Intent) {
        if self.intents.send(intent).await.is_err() {
            warn!("coordinator loop has shut down, intent dropped");
        }
    }
}

/// Spawns the single-writer coordinator loop. The loop owns the pagination
/// controller and the favorites store; fetches run as separate tasks holding
/// only the source, and their results come back over a channel so every
/// state mutation happens on the loop. Updates are broadcast within the
/// loop's turn.
pub fn spawn_coordinator(source: Arc<dyn FeedSource>, config: FeedConfig) -> CoordinatorHandle {
    let (intent_tx, mut intent_rx) = mpsc::channel(config.intent_capacity.max(1));
    let (update_tx, _) = broadcast::channel(config.update_capacity.max(1));
    let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchDone>(1);

    let updates = update_tx.clone();
    let join = tokio::spawn(async move {
        let mut controller = PaginationController::new(config.keywords);
        let mut favorites = FavoritesStore::new();

        loop {
            tokio::select! {
                intent = intent_rx.recv() => {
                    let Some(intent) = intent else {
                        info!("all handles dropped, coordinator shutting down");
                        break;
                    };
                    handle_intent(
                        intent,
                        &mut controller,
                        &mut favorites,
                        &source,
                        &fetch_tx,
                        &update_tx,
                    );
                }
                Some(done) = fetch_rx.recv() => {
                    for update in controller.finish(done.request, done.result) {
                        publish(&update_tx, update);
                    }
                }
            }
        }
    });

    CoordinatorHandle {
        intents: intent_tx,
        updates,
        join,
    }
}

fn handle_intent(
    intent: Intent,
    controller: &mut PaginationController,
    favorites: &mut FavoritesStore,
    source: &Arc<dyn FeedSource>,
    fetch_tx: &mpsc::Sender<FetchDone>,
    update_tx: &broadcast::Sender<Update>,
) {
    match intent {
        Intent::LoadFirst => begin_fetch(controller.begin_first(), source, fetch_tx),
        Intent::LoadMore => begin_fetch(controller.begin_more(), source, fetch_tx),
        Intent::ToggleFilter => {
            for update in controller.toggle_filter() {
                publish(update_tx, update);
            }
        }
        Intent::ToggleFavorite(article) => favorites.toggle(&article),
        Intent::IsFavorite(article, reply) => {
            let _ = reply.send(favorites.contains(&article));
        }
        Intent::ListFavorites(reply) => {
            let _ = reply.send(favorites.list());
        }
        Intent::Visible(reply) => {
            let _ = reply.send(controller.visible());
        }
    }
}

fn begin_fetch(
    request: Option<FetchRequest>,
    source: &Arc<dyn FeedSource>,
    fetch_tx: &mpsc::Sender<FetchDone>,
) {
    // None means the guard dropped the intent; nothing to do.
    let Some(request) = request else {
        return;
    };
    debug!(page_index = request.page_index, kind = ?request.kind, "starting feed fetch");

    let source = Arc::clone(source);
    let fetch_tx = fetch_tx.clone();
    tokio::spawn(async move {
        let result = source.fetch_page(request.page_index).await;
        if fetch_tx.send(FetchDone { request, result }).await.is_err() {
            warn!("coordinator loop gone before fetch completion");
        }
    });
}

fn publish(update_tx: &broadcast::Sender<Update>, update: Update) {
    if update_tx.send(update).is_err() {
        debug!("no surfaces subscribed, update dropped");
    }
}
