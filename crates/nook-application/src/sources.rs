//! Page sources binding the resource clients to [`FeedSynchronizer`]s.
//!
//! [`FeedSynchronizer`]: nook_core::feed::FeedSynchronizer

use async_trait::async_trait;
use nook_core::Result;
use nook_core::feed::PageSource;
use nook_core::model::{Conversation, Message, Notification, Post, UserSummary};
use nook_interaction::{MessagesApi, NotificationsApi, PostsApi, SearchApi};

/// Home feed.
pub struct PostFeedSource {
    api: PostsApi,
}

impl PostFeedSource {
    pub fn new(api: PostsApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource<Post> for PostFeedSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Post>> {
        self.api.feed(page, limit).await
    }

    fn label(&self) -> &str {
        "feed"
    }
}

/// Posts written by one user, as shown on a profile.
pub struct UserPostsSource {
    api: PostsApi,
    user_id: String,
}

impl UserPostsSource {
    pub fn new(api: PostsApi, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl PageSource<Post> for UserPostsSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Post>> {
        self.api.by_user(&self.user_id, page, limit).await
    }

    fn label(&self) -> &str {
        "user-posts"
    }
}

pub struct ConversationListSource {
    api: MessagesApi,
}

impl ConversationListSource {
    pub fn new(api: MessagesApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource<Conversation> for ConversationListSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Conversation>> {
        self.api.conversations(page, limit).await
    }

    fn label(&self) -> &str {
        "conversations"
    }
}

/// Messages of one conversation.
pub struct MessageThreadSource {
    api: MessagesApi,
    conversation_id: String,
}

impl MessageThreadSource {
    pub fn new(api: MessagesApi, conversation_id: impl Into<String>) -> Self {
        Self {
            api,
            conversation_id: conversation_id.into(),
        }
    }
}

#[async_trait]
impl PageSource<Message> for MessageThreadSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Message>> {
        self.api.thread(&self.conversation_id, page, limit).await
    }

    fn label(&self) -> &str {
        "thread"
    }
}

pub struct UserSearchSource {
    api: SearchApi,
    query: String,
}

impl UserSearchSource {
    pub fn new(api: SearchApi, query: impl Into<String>) -> Self {
        Self {
            api,
            query: query.into(),
        }
    }
}

#[async_trait]
impl PageSource<UserSummary> for UserSearchSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<UserSummary>> {
        self.api.users(&self.query, page, limit).await
    }

    fn label(&self) -> &str {
        "user-search"
    }
}

pub struct PostSearchSource {
    api: SearchApi,
    query: String,
}

impl PostSearchSource {
    pub fn new(api: SearchApi, query: impl Into<String>) -> Self {
        Self {
            api,
            query: query.into(),
        }
    }
}

#[async_trait]
impl PageSource<Post> for PostSearchSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Post>> {
        self.api.posts(&self.query, page, limit).await
    }

    fn label(&self) -> &str {
        "post-search"
    }
}

pub struct NotificationSource {
    api: NotificationsApi,
}

impl NotificationSource {
    pub fn new(api: NotificationsApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource<Notification> for NotificationSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Notification>> {
        self.api.list(page, limit).await
    }

    fn label(&self) -> &str {
        "notifications"
    }
}
