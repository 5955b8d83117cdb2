use super::decode_list;
use crate::session::SessionManager;
use nook_core::http::ApiRequest;
use nook_core::model::{Post, UserSummary};
use nook_core::{NookError, Result};
use std::sync::Arc;

/// Client for user and post search.
#[derive(Clone)]
pub struct SearchApi {
    session: Arc<SessionManager>,
}

impl SearchApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn users(&self, query: &str, page: u32, limit: u32) -> Result<Vec<UserSummary>> {
        let request = Self::request("/profile/search", query, page, limit)?;
        let response = self.session.send(request).await?;
        decode_list(&response, "users")
    }

    pub async fn posts(&self, query: &str, page: u32, limit: u32) -> Result<Vec<Post>> {
        let request = Self::request("/post/search", query, page, limit)?;
        let response = self.session.send(request).await?;
        decode_list(&response, "posts")
    }

    fn request(path: &str, query: &str, page: u32, limit: u32) -> Result<ApiRequest> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NookError::invalid_input("Search query must not be empty"));
        }
        Ok(ApiRequest::get(path)
            .with_query("q", query)
            .with_page(page, limit))
    }
}
