use super::user::UserSummary;
use crate::feed::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub participants: Vec<UserSummary>,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Participants other than `me`.
    pub fn others<'a>(&'a self, me: &'a str) -> impl Iterator<Item = &'a UserSummary> + 'a {
        self.participants.iter().filter(move |p| p.id != me)
    }
}

impl Identified for Conversation {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub sender: UserSummary,
    pub content: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_others_excludes_current_user() {
        let json = r#"{
            "id": "c1",
            "participants": [
                {"id": "me", "username": "me"},
                {"id": "u2", "username": "grace"}
            ]
        }"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        let others: Vec<_> = conversation.others("me").map(|u| u.username.as_str()).collect();
        assert_eq!(others, vec!["grace"]);
        assert!(conversation.last_message.is_none());
    }
}
