use super::{decode_list, segment};
use crate::session::SessionManager;
use nook_core::Result;
use nook_core::http::ApiRequest;
use nook_core::model::Notification;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationsApi {
    session: Arc<SessionManager>,
}

impl NotificationsApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<Vec<Notification>> {
        let request = ApiRequest::get("/notifications").with_page(page, limit);
        let response = self.session.send(request).await?;
        decode_list(&response, "notifications")
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<()> {
        let id = segment("notification id", notification_id)?;
        self.session
            .send(ApiRequest::patch(format!("/notifications/{}/read", id)))
            .await?
            .decode_ack()
    }
}
