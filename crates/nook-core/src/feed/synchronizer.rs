use super::source::{Identified, PageSource};
use super::visibility::VisibilityEdge;
use super::window::PageWindow;
use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a load call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged into the window.
    Loaded { page: u32, fetched: usize },
    /// Nothing was requested (already loading, end of list, or no new edge).
    Skipped,
    /// The window was reset while the fetch was in flight; the response was dropped.
    Stale,
}

struct SyncState<T> {
    window: PageWindow<T>,
    /// Bumped on every reset so responses from before the reset are ignored.
    generation: u64,
    edge: VisibilityEdge,
}

/// Incremental, de-duplicated loader for one list view.
///
/// `FeedSynchronizer` is responsible for:
/// - Loading the first page and resetting on refresh
/// - Fetching the next page at most once at a time
/// - Merging pages by id into a [`PageWindow`]
/// - Reacting to the "last item visible" signal on its rising edge only
///
/// State lives behind a short synchronous lock that is never held across a
/// fetch, so the check-and-set of the `loading` flag is atomic with respect
/// to other callers.
pub struct FeedSynchronizer<T> {
    source: Arc<dyn PageSource<T>>,
    page_size: u32,
    state: Mutex<SyncState<T>>,
}

impl<T> FeedSynchronizer<T>
where
    T: Identified + Clone + Send + 'static,
{
    /// Creates a synchronizer over `source` requesting `page_size` items per page.
    pub fn new(source: Arc<dyn PageSource<T>>, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            state: Mutex::new(SyncState {
                window: PageWindow::new(),
                generation: 0,
                edge: VisibilityEdge::new(),
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Copy of the current window for rendering.
    pub fn snapshot(&self) -> PageWindow<T> {
        self.lock().window.clone()
    }

    /// Resets the window and fetches page 1.
    ///
    /// A reset is never skipped: any fetch still in flight becomes stale and
    /// its response is discarded when it arrives.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it in the window.
    pub async fn load_initial(&self) -> Result<LoadOutcome> {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.window.reset();
            state.window.set_loading(true);
            state.generation
        };

        tracing::debug!(
            "[FeedSynchronizer:{}] Loading first page (generation {})",
            self.source.label(),
            generation
        );

        self.fetch_and_apply(generation, 1).await
    }

    /// Resynchronizes from the server after a local mutation.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.load_initial().await
    }

    /// Fetches the page after the last one loaded.
    ///
    /// Does nothing while another load is in flight or once the end of the
    /// list has been reached.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it in the window; items and
    /// page number are left as they were.
    pub async fn load_next(&self) -> Result<LoadOutcome> {
        let (generation, page) = {
            let mut state = self.lock();
            if state.window.is_loading() || !state.window.has_more() {
                return Ok(LoadOutcome::Skipped);
            }
            state.window.set_loading(true);
            (state.generation, state.window.next_page())
        };

        tracing::debug!(
            "[FeedSynchronizer:{}] Loading page {}",
            self.source.label(),
            page
        );

        self.fetch_and_apply(generation, page).await
    }

    /// Feeds the "last rendered item is visible" level signal.
    ///
    /// Only a hidden → visible transition can trigger [`load_next`](Self::load_next);
    /// staying visible does not re-fire.
    pub async fn on_last_item_visible(&self, visible: bool) -> Result<LoadOutcome> {
        let should_load = {
            let mut state = self.lock();
            let rising = state.edge.observe(visible);
            rising && state.window.has_more() && !state.window.is_loading()
        };

        if !should_load {
            return Ok(LoadOutcome::Skipped);
        }
        self.load_next().await
    }

    async fn fetch_and_apply(&self, generation: u64, page: u32) -> Result<LoadOutcome> {
        let result = self.source.fetch_page(page, self.page_size).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                "[FeedSynchronizer:{}] Dropping stale response for page {}",
                self.source.label(),
                page
            );
            return Ok(LoadOutcome::Stale);
        }

        state.window.set_loading(false);
        match result {
            Ok(items) => {
                let fetched = items.len();
                state.window.apply_page(page, items, self.page_size);
                tracing::debug!(
                    "[FeedSynchronizer:{}] Page {} loaded: {} items, {} total, has_more={}",
                    self.source.label(),
                    page,
                    fetched,
                    state.window.len(),
                    state.window.has_more()
                );
                Ok(LoadOutcome::Loaded { page, fetched })
            }
            Err(e) => {
                tracing::warn!(
                    "[FeedSynchronizer:{}] Failed to load page {}: {}",
                    self.source.label(),
                    page,
                    e
                );
                state.window.set_error(Some(e.display_message()));
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NookError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        page: u32,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn rows(page: u32, ids: impl IntoIterator<Item = u32>) -> Vec<Row> {
        ids.into_iter()
            .map(|i| Row {
                id: format!("item-{}", i),
                page,
            })
            .collect()
    }

    /// Scripted page source: answers calls in order, optionally waiting on a gate.
    struct ScriptedSource {
        script: Mutex<VecDeque<(Option<Arc<Notify>>, Result<Vec<Row>>)>>,
        requested: Mutex<Vec<u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                requested: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn reply(self, result: Result<Vec<Row>>) -> Self {
            self.script.lock().unwrap().push_back((None, result));
            self
        }

        fn reply_after(self, gate: Arc<Notify>, result: Result<Vec<Row>>) -> Self {
            self.script.lock().unwrap().push_back((Some(gate), result));
            self
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource<Row> for ScriptedSource {
        async fn fetch_page(&self, page: u32, _limit: u32) -> Result<Vec<Row>> {
            self.requested.lock().unwrap().push(page);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let (gate, result) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch");
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    async fn wait_for_calls(source: &ScriptedSource, calls: usize) {
        while source.requested().len() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_then_short_page_ends_list() {
        let source = Arc::new(
            ScriptedSource::new()
                .reply(Ok(rows(1, 0..10)))
                .reply(Ok(rows(2, 10..14))),
        );
        let sync = FeedSynchronizer::new(source.clone(), 10);

        let first = sync.load_initial().await.unwrap();
        assert_eq!(first, LoadOutcome::Loaded { page: 1, fetched: 10 });
        assert!(sync.snapshot().has_more());

        sync.load_next().await.unwrap();
        let window = sync.snapshot();
        assert_eq!(window.len(), 14);
        assert!(!window.has_more());
        assert_eq!(window.page(), 2);
        assert_eq!(source.requested(), vec![1, 2]);

        // End of list: nothing more is requested.
        assert_eq!(sync.load_next().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_later_page_wins_on_id_collision() {
        let mut page_two = rows(2, 3..5);
        page_two.push(Row {
            id: "item-1".into(),
            page: 2,
        });
        let source = Arc::new(ScriptedSource::new().reply(Ok(rows(1, 0..3))).reply(Ok(page_two)));
        let sync = FeedSynchronizer::new(source, 3);

        sync.load_initial().await.unwrap();
        sync.load_next().await.unwrap();

        let window = sync.snapshot();
        let ids: Vec<_> = window.items().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["item-0", "item-1", "item-2", "item-3", "item-4"]);
        assert_eq!(window.get("item-1").unwrap().page, 2);
    }

    #[tokio::test]
    async fn test_only_one_next_page_in_flight() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(
            ScriptedSource::new()
                .reply(Ok(rows(1, 0..2)))
                .reply_after(gate.clone(), Ok(rows(2, 2..4))),
        );
        let sync = Arc::new(FeedSynchronizer::new(source.clone(), 2));
        sync.load_initial().await.unwrap();

        let pending = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.load_next().await })
        };
        wait_for_calls(&source, 2).await;

        for _ in 0..5 {
            assert_eq!(sync.load_next().await.unwrap(), LoadOutcome::Skipped);
        }
        assert!(sync.snapshot().is_loading());

        gate.notify_one();
        let outcome = pending.await.unwrap().unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { page: 2, fetched: 2 });
        assert_eq!(source.requested(), vec![1, 2]);
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_items_and_allows_retry() {
        let source = Arc::new(
            ScriptedSource::new()
                .reply(Ok(rows(1, 0..2)))
                .reply(Err(NookError::network("connection reset")))
                .reply(Ok(rows(2, 2..3))),
        );
        let sync = FeedSynchronizer::new(source.clone(), 2);
        sync.load_initial().await.unwrap();

        let err = sync.load_next().await.unwrap_err();
        assert!(err.is_network());
        let window = sync.snapshot();
        assert_eq!(window.len(), 2);
        assert_eq!(window.page(), 1);
        assert!(!window.is_loading());
        assert!(window.error().is_some());

        sync.load_next().await.unwrap();
        let window = sync.snapshot();
        assert_eq!(window.len(), 3);
        assert_eq!(window.page(), 2);
        assert!(window.error().is_none());
        assert_eq!(source.requested(), vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_double_refresh_does_not_duplicate() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(
            ScriptedSource::new()
                .reply_after(gate.clone(), Ok(rows(1, 0..3)))
                .reply(Ok(rows(1, 0..3))),
        );
        let sync = Arc::new(FeedSynchronizer::new(source.clone(), 3));

        let first = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.refresh().await })
        };
        wait_for_calls(&source, 1).await;

        let second = sync.refresh().await.unwrap();
        assert_eq!(second, LoadOutcome::Loaded { page: 1, fetched: 3 });

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Stale);

        let window = sync.snapshot();
        assert_eq!(window.len(), 3);
        assert_eq!(window.page(), 1);
        assert!(!window.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_discards_in_flight_next_page() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(
            ScriptedSource::new()
                .reply(Ok(rows(1, 0..2)))
                .reply_after(gate.clone(), Ok(rows(2, 2..4)))
                .reply(Ok(rows(1, 10..12))),
        );
        let sync = Arc::new(FeedSynchronizer::new(source.clone(), 2));
        sync.load_initial().await.unwrap();

        let next = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.load_next().await })
        };
        wait_for_calls(&source, 2).await;

        sync.refresh().await.unwrap();
        gate.notify_one();
        assert_eq!(next.await.unwrap().unwrap(), LoadOutcome::Stale);

        let ids: Vec<_> = sync.snapshot().items().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["item-10", "item-11"]);
    }

    #[tokio::test]
    async fn test_visibility_is_edge_triggered() {
        let source = Arc::new(
            ScriptedSource::new()
                .reply(Ok(rows(1, 0..2)))
                .reply(Ok(rows(2, 2..4)))
                .reply(Ok(rows(3, 4..6))),
        );
        let sync = FeedSynchronizer::new(source.clone(), 2);
        sync.load_initial().await.unwrap();

        assert!(matches!(
            sync.on_last_item_visible(true).await.unwrap(),
            LoadOutcome::Loaded { page: 2, .. }
        ));
        // Still visible: no re-fire.
        assert_eq!(sync.on_last_item_visible(true).await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(sync.on_last_item_visible(false).await.unwrap(), LoadOutcome::Skipped);
        assert!(matches!(
            sync.on_last_item_visible(true).await.unwrap(),
            LoadOutcome::Loaded { page: 3, .. }
        ));
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_next_on_fresh_window_fetches_first_page() {
        let source = Arc::new(ScriptedSource::new().reply(Ok(rows(1, 0..1))));
        let sync = FeedSynchronizer::new(source.clone(), 5);

        sync.load_next().await.unwrap();
        assert_eq!(source.requested(), vec![1]);
        assert!(!sync.snapshot().has_more());
    }
}
