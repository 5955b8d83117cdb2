use super::{decode_list, segment};
use crate::session::SessionManager;
use nook_core::http::ApiRequest;
use nook_core::model::{Conversation, Message};
use nook_core::{NookError, Result};
use serde::Serialize;
use std::sync::Arc;

const CONVERSATIONS_PATH: &str = "/messages/conversations";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartConversation<'a> {
    participant_id: &'a str,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    content: &'a str,
}

/// Client for direct messages.
#[derive(Clone)]
pub struct MessagesApi {
    session: Arc<SessionManager>,
}

impl MessagesApi {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn conversations(&self, page: u32, limit: u32) -> Result<Vec<Conversation>> {
        let request = ApiRequest::get(CONVERSATIONS_PATH).with_page(page, limit);
        let response = self.session.send(request).await?;
        decode_list(&response, "conversations")
    }

    /// One page of a conversation's messages.
    pub async fn thread(
        &self,
        conversation_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Message>> {
        let id = segment("conversation id", conversation_id)?;
        let request =
            ApiRequest::get(format!("{}/{}", CONVERSATIONS_PATH, id)).with_page(page, limit);
        let response = self.session.send(request).await?;
        decode_list(&response, "messages")
    }

    /// Opens (or reopens) a conversation with another user.
    pub async fn start(&self, participant_id: &str) -> Result<Conversation> {
        let participant_id = segment("participant id", participant_id)?;
        let request =
            ApiRequest::post(CONVERSATIONS_PATH).with_json(&StartConversation { participant_id })?;
        self.session.send(request).await?.decode()
    }

    pub async fn send(&self, conversation_id: &str, content: &str) -> Result<Message> {
        let id = segment("conversation id", conversation_id)?;
        if content.trim().is_empty() {
            return Err(NookError::invalid_input("Message must not be empty"));
        }

        let request = ApiRequest::post(format!("{}/{}", CONVERSATIONS_PATH, id))
            .with_json(&MessageBody { content })?;
        let message: Message = self.session.send(request).await?.decode()?;
        tracing::debug!("[MessagesApi] Sent message {} in {}", message.id, id);
        Ok(message)
    }
}
