use crate::error::Result;
use async_trait::async_trait;

/// Anything with a stable string id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Fetches one page of a list resource.
///
/// Pages are 1-based; `limit` is the page size the caller expects. A page
/// shorter than `limit` signals the end of the list.
#[async_trait]
pub trait PageSource<T: Send>: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<T>>;

    /// Short label used in log lines.
    fn label(&self) -> &str {
        "feed"
    }
}
