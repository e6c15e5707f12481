use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Semaphore};

use news_core::{
    spawn_coordinator, Article, FeedConfig, FeedSource, FetchError, Page, Update,
};

fn config() -> FeedConfig {
    FeedConfig {
        keywords: vec!["tokyo".to_string()],
        ..FeedConfig::default()
    }
}

fn article(id: i64, title: &str) -> Article {
    Article {
        id: Some(id),
        title: Some(title.to_string()),
        summary: None,
        image_url: None,
        request_id: Some("r1".to_string()),
    }
}

fn page(articles: Vec<Article>) -> Page {
    Page {
        articles,
        request_id: Some("r1".to_string()),
    }
}

fn status_error() -> FetchError {
    FetchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn next_update(rx: &mut broadcast::Receiver<Update>) -> Update {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for update")
        .expect("update channel closed")
}

/// Returns one scripted outcome per call, recording requested page indexes.
struct ScriptedSource {
    calls: Mutex<Vec<u32>>,
    outcomes: Mutex<VecDeque<Result<Page, FetchError>>>,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Result<Page, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
        })
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch_page(&self, page_index: u32) -> Result<Page, FetchError> {
        self.calls.lock().unwrap().push(page_index);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

/// Starts every fetch immediately but answers only when the test releases a
/// permit, so a fetch can be held in flight deliberately.
struct GatedSource {
    started: AtomicU32,
    gate: Semaphore,
}

impl GatedSource {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicU32::new(0),
            gate: Semaphore::new(0),
        })
    }
}

#[async_trait]
impl FeedSource for GatedSource {
    async fn fetch_page(&self, _page_index: u32) -> Result<Page, FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        Ok(page(vec![article(1, "held page")]))
    }
}

#[tokio::test]
async fn first_load_broadcasts_filter_state_then_replacement() {
    let source = ScriptedSource::new(vec![Ok(page(vec![
        article(1, "Tokyo rain"),
        article(2, "Local elections"),
    ]))]);
    let handle = spawn_coordinator(source.clone(), config());
    let mut updates = handle.subscribe();

    handle.load_first().await;

    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(false)));
    match next_update(&mut updates).await {
        Update::DataReplaced(items) => assert_eq!(items.len(), 2),
        other => panic!("expected DataReplaced, got {other:?}"),
    }
    assert_eq!(source.calls(), vec![1]);
    handle.stop().await;
}

#[tokio::test]
async fn concurrent_intents_result_in_a_single_fetch() {
    let source = GatedSource::new();
    let handle = spawn_coordinator(source.clone(), config());
    let mut updates = handle.subscribe();

    handle.load_first().await;
    while source.started.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    // Both arrive while the first fetch is held in flight; the guard drops
    // them without queueing.
    handle.load_more().await;
    handle.load_first().await;
    // A query round-trip proves the loop has processed both intents.
    let _ = handle.visible().await;
    assert_eq!(source.started.load(Ordering::SeqCst), 1);

    source.gate.add_permits(1);
    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(false)));
    assert!(matches!(next_update(&mut updates).await, Update::DataReplaced(_)));

    // Still exactly one source call after the completion was applied.
    let _ = handle.visible().await;
    assert_eq!(source.started.load(Ordering::SeqCst), 1);
    handle.stop().await;
}

#[tokio::test]
async fn empty_first_page_is_replacement_not_failure() {
    let source = ScriptedSource::new(vec![Ok(Page {
        articles: Vec::new(),
        request_id: Some("r1".to_string()),
    })]);
    let handle = spawn_coordinator(source.clone(), config());
    let mut updates = handle.subscribe();

    handle.load_first().await;

    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(false)));
    match next_update(&mut updates).await {
        Update::DataReplaced(items) => assert!(items.is_empty()),
        other => panic!("expected DataReplaced, got {other:?}"),
    }
    assert!(handle.visible().await.is_empty());
    handle.stop().await;
}

#[tokio::test]
async fn failed_load_more_reports_once_and_retry_refetches_same_page() {
    let source = ScriptedSource::new(vec![
        Ok(page(vec![article(1, "a"), article(2, "b")])),
        Err(status_error()),
        Ok(page(vec![article(3, "c")])),
    ]);
    let handle = spawn_coordinator(source.clone(), config());
    let mut updates = handle.subscribe();

    handle.load_first().await;
    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(false)));
    assert!(matches!(next_update(&mut updates).await, Update::DataReplaced(_)));

    handle.load_more().await;
    assert!(matches!(next_update(&mut updates).await, Update::LoadFailed(_)));
    assert_eq!(handle.visible().await.len(), 2);

    handle.load_more().await;
    match next_update(&mut updates).await {
        Update::DataAppended(items) => assert_eq!(items.len(), 1),
        other => panic!("expected DataAppended, got {other:?}"),
    }
    assert_eq!(handle.visible().await.len(), 3);
    // The retry re-fetched page 2 instead of skipping to 3.
    assert_eq!(source.calls(), vec![1, 2, 2]);
    handle.stop().await;
}

#[tokio::test]
async fn load_more_never_reaches_the_source_while_filtered() {
    let source = ScriptedSource::new(vec![Ok(page(vec![
        article(1, "Tokyo rain"),
        article(2, "Local elections"),
    ]))]);
    let handle = spawn_coordinator(source.clone(), config());
    let mut updates = handle.subscribe();

    handle.load_first().await;
    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(false)));
    assert!(matches!(next_update(&mut updates).await, Update::DataReplaced(_)));

    handle.toggle_filter().await;
    assert!(matches!(next_update(&mut updates).await, Update::FilterChanged(true)));
    match next_update(&mut updates).await {
        Update::DataReplaced(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].id, Some(1));
        }
        other => panic!("expected DataReplaced, got {other:?}"),
    }

    handle.load_more().await;
    let _ = handle.visible().await;
    assert_eq!(source.calls(), vec![1]);
    assert!(matches!(
        updates.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
    handle.stop().await;
}

#[tokio::test]
async fn favorites_round_trip_through_the_loop() {
    let source = ScriptedSource::new(Vec::new());
    let handle = spawn_coordinator(source, config());
    let a = article(5, "kept");

    assert!(!handle.is_favorite(&a).await);
    handle.toggle_favorite(a.clone()).await;
    assert!(handle.is_favorite(&a).await);

    let listed = handle.favorites().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, Some(5));

    handle.toggle_favorite(a.clone()).await;
    assert!(!handle.is_favorite(&a).await);
    assert!(handle.favorites().await.is_empty());
    handle.stop().await;
}
