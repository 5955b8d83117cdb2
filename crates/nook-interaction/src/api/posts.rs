use super::{decode_list, segment};
use crate::session::SessionManager;
use nook_core::http::ApiRequest;
use nook_core::model::{Comment, LikeState, NewPost, Post};
use nook_core::{NookError, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// Client for `/post`.
#[derive(Clone)]
pub struct PostsApi {
    session: Arc<SessionManager>,
}

impl PostsApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// One page of the home feed, newest first.
    pub async fn feed(&self, page: u32, limit: u32) -> Result<Vec<Post>> {
        let request = ApiRequest::get("/post").with_page(page, limit);
        let response = self.session.send(request).await?;
        decode_list(&response, "posts")
    }

    pub async fn get(&self, post_id: &str) -> Result<Post> {
        let id = segment("post id", post_id)?;
        let response = self.session.send(ApiRequest::get(format!("/post/{}", id))).await?;
        response.decode()
    }

    /// One page of a single user's posts.
    pub async fn by_user(&self, user_id: &str, page: u32, limit: u32) -> Result<Vec<Post>> {
        let id = segment("user id", user_id)?;
        let request = ApiRequest::get(format!("/post/user/{}", id)).with_page(page, limit);
        let response = self.session.send(request).await?;
        decode_list(&response, "posts")
    }

    pub async fn create(&self, post: &NewPost) -> Result<Post> {
        if post.content.trim().is_empty() && post.image_url.is_none() {
            return Err(NookError::invalid_input("A post needs text or an image"));
        }

        let request = ApiRequest::post("/post").with_json(post)?;
        let created: Post = self.session.send(request).await?.decode()?;
        tracing::info!("[PostsApi] Created post {}", created.id);
        Ok(created)
    }

    pub async fn edit(&self, post_id: &str, content: &str) -> Result<Post> {
        let id = segment("post id", post_id)?;
        let request = ApiRequest::put(format!("/post/{}", id)).with_json(&ContentBody { content })?;
        self.session.send(request).await?.decode()
    }

    /// Likes the post if it is not liked yet, unlikes it otherwise.
    pub async fn toggle_like(&self, post_id: &str) -> Result<LikeState> {
        let id = segment("post id", post_id)?;
        let response = self
            .session
            .send(ApiRequest::patch(format!("/post/{}/like", id)))
            .await?;
        response.decode()
    }

    pub async fn comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        let id = segment("post id", post_id)?;
        if content.trim().is_empty() {
            return Err(NookError::invalid_input("Comment must not be empty"));
        }

        let request =
            ApiRequest::post(format!("/post/{}/comment", id)).with_json(&ContentBody { content })?;
        self.session.send(request).await?.decode()
    }
}
