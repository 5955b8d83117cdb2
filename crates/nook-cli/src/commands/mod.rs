pub mod auth;
pub mod config;
pub mod messages;
pub mod notifications;
pub mod output;
pub mod posts;
pub mod search;

use anyhow::{Context, Result};
use nook_core::feed::{FeedSynchronizer, Identified, PageWindow};

/// Loads up to `pages` pages into `sync` and returns the resulting window.
///
/// Stops early once the backend reports the end of the list.
pub async fn load_pages<T>(sync: &FeedSynchronizer<T>, pages: u32) -> Result<PageWindow<T>>
where
    T: Identified + Clone + Send + 'static,
{
    sync.load_initial().await.context("Failed to load first page")?;

    for _ in 1..pages.max(1) {
        if !sync.snapshot().has_more() {
            break;
        }
        sync.load_next().await.context("Failed to load next page")?;
    }

    Ok(sync.snapshot())
}
