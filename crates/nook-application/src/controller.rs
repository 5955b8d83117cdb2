//! Drives a [`FeedSynchronizer`] from a viewport's visibility stream.

use nook_core::feed::{FeedSynchronizer, Identified, LoadOutcome};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Binds one list view's "last item visible" signal to its synchronizer.
///
/// The front end owns the `watch::Sender<bool>` and flips it as the last
/// rendered item scrolls in and out of view. Values published faster than
/// the controller observes them are coalesced by the channel.
pub struct FeedController<T> {
    sync: Arc<FeedSynchronizer<T>>,
}

impl<T> FeedController<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    pub fn new(sync: Arc<FeedSynchronizer<T>>) -> Self {
        Self { sync }
    }

    pub fn synchronizer(&self) -> &Arc<FeedSynchronizer<T>> {
        &self.sync
    }

    /// Feeds one observed visibility value to the synchronizer.
    ///
    /// Load failures are recorded in the window by the synchronizer; here
    /// they are only logged.
    pub async fn observe(&self, visible: bool) -> LoadOutcome {
        match self.sync.on_last_item_visible(visible).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("[FeedController] Continuation failed: {}", e);
                LoadOutcome::Skipped
            }
        }
    }

    /// Runs until every sender of `visibility` is dropped.
    pub async fn run(self, mut visibility: watch::Receiver<bool>) {
        let initial = *visibility.borrow_and_update();
        self.observe(initial).await;

        while visibility.changed().await.is_ok() {
            let visible = *visibility.borrow_and_update();
            self.observe(visible).await;
        }

        tracing::debug!("[FeedController] Visibility stream closed");
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self, visibility: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(visibility))
    }
}
