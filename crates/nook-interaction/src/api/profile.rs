use super::segment;
use crate::session::SessionManager;
use nook_core::http::ApiRequest;
use nook_core::model::{Profile, ProfileUpdate};
use nook_core::{NookError, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Result of `PATCH /profile/{userId}/follow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
    #[serde(alias = "isFollowing")]
    pub following: bool,
    #[serde(default)]
    pub followers_count: u64,
}

/// Client for `/profile`.
#[derive(Clone)]
pub struct ProfileApi {
    session: Arc<SessionManager>,
}

impl ProfileApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Profile of the signed-in user.
    pub async fn me(&self) -> Result<Profile> {
        self.session.send(ApiRequest::get("/profile")).await?.decode()
    }

    pub async fn by_username(&self, username: &str) -> Result<Profile> {
        let username = segment("username", username.trim_start_matches('@'))?;
        self.session
            .send(ApiRequest::get(format!("/profile/{}", username)))
            .await?
            .decode()
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile> {
        if update.is_empty() {
            return Err(NookError::invalid_input("Nothing to update"));
        }

        let request = ApiRequest::put("/profile").with_json(update)?;
        let profile: Profile = self.session.send(request).await?.decode()?;
        tracing::info!("[ProfileApi] Updated profile {}", profile.username);
        Ok(profile)
    }

    /// Follows the user if not followed yet, unfollows otherwise.
    pub async fn toggle_follow(&self, user_id: &str) -> Result<FollowState> {
        let id = segment("user id", user_id)?;
        self.session
            .send(ApiRequest::patch(format!("/profile/{}/follow", id)))
            .await?
            .decode()
    }
}
