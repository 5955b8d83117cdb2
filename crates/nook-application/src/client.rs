//! Composition root for front ends.
//!
//! Wires configuration, credential storage, transport, and the session
//! manager together, and hands out resource clients and list synchronizers
//! that all share the one session.

use crate::sources::{
    ConversationListSource, MessageThreadSource, NotificationSource, PostFeedSource,
    PostSearchSource, UserPostsSource, UserSearchSource,
};
use anyhow::{Context, Result};
use nook_core::auth::{Navigator, TokenStore};
use nook_core::config::ClientConfig;
use nook_core::feed::FeedSynchronizer;
use nook_core::http::Transport;
use nook_core::model::{Conversation, Message, Notification, Post, UserSummary};
use nook_infrastructure::{ConfigService, FileTokenStore, MemoryTokenStore, NookPaths};
use nook_interaction::api::google_login_url;
use nook_interaction::{
    MessagesApi, NotificationsApi, PostsApi, ProfileApi, ReqwestTransport, SearchApi,
    SessionManager,
};
use std::path::PathBuf;
use std::sync::Arc;

/// How [`NookClient::bootstrap`] should set itself up.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Overrides the configuration directory (`~/.config/nook`).
    pub config_dir: Option<PathBuf>,
    /// Keeps credentials in memory only; nothing is written to disk.
    pub ephemeral: bool,
}

/// Everything a front end needs to talk to the backend.
pub struct NookClient {
    config: ClientConfig,
    session: Arc<SessionManager>,
    posts: PostsApi,
    profile: ProfileApi,
    messages: MessagesApi,
    search: SearchApi,
    notifications: NotificationsApi,
}

impl NookClient {
    /// Loads configuration and builds a client backed by reqwest and the
    /// on-disk session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the session
    /// file location cannot be determined.
    pub fn bootstrap(options: &BootstrapOptions, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let paths = NookPaths::new(options.config_dir.as_deref());
        let config = ConfigService::new(paths.clone())
            .load()
            .context("Failed to load configuration")?;

        let store: Arc<dyn TokenStore> = if options.ephemeral {
            tracing::info!("[Bootstrap] Using in-memory credential storage");
            Arc::new(MemoryTokenStore::new())
        } else {
            let path = match &config.token_file {
                Some(path) => path.clone(),
                None => paths
                    .session_file()
                    .context("Failed to resolve session file location")?,
            };
            tracing::info!("[Bootstrap] Using session file {}", path.display());
            Arc::new(FileTokenStore::with_path(path))
        };

        let transport = Arc::new(ReqwestTransport::from_config(&config));
        Ok(Self::assemble(config, transport, store, navigator))
    }

    /// Builds a client from already-constructed collaborators.
    pub fn assemble(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(transport, store, navigator));

        tracing::info!(
            "[Bootstrap] Client ready for {} (session: {:?})",
            config.base_url(),
            session.state()
        );

        Self {
            posts: PostsApi::new(session.clone()),
            profile: ProfileApi::new(session.clone()),
            messages: MessagesApi::new(session.clone()),
            search: SearchApi::new(session.clone()),
            notifications: NotificationsApi::new(session.clone()),
            config,
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn posts(&self) -> &PostsApi {
        &self.posts
    }

    pub fn profile(&self) -> &ProfileApi {
        &self.profile
    }

    pub fn messages(&self) -> &MessagesApi {
        &self.messages
    }

    pub fn search(&self) -> &SearchApi {
        &self.search
    }

    pub fn notifications(&self) -> &NotificationsApi {
        &self.notifications
    }

    /// URL to open in a browser to start Google sign-in.
    pub fn google_login_url(&self) -> String {
        google_login_url(self.config.base_url())
    }

    // ============================================================================
    // List views
    // ============================================================================

    pub fn home_feed(&self) -> FeedSynchronizer<Post> {
        self.synchronizer(PostFeedSource::new(self.posts.clone()))
    }

    pub fn user_posts(&self, user_id: &str) -> FeedSynchronizer<Post> {
        self.synchronizer(UserPostsSource::new(self.posts.clone(), user_id))
    }

    pub fn conversations(&self) -> FeedSynchronizer<Conversation> {
        self.synchronizer(ConversationListSource::new(self.messages.clone()))
    }

    pub fn thread(&self, conversation_id: &str) -> FeedSynchronizer<Message> {
        self.synchronizer(MessageThreadSource::new(
            self.messages.clone(),
            conversation_id,
        ))
    }

    pub fn user_search(&self, query: &str) -> FeedSynchronizer<UserSummary> {
        self.synchronizer(UserSearchSource::new(self.search.clone(), query))
    }

    pub fn post_search(&self, query: &str) -> FeedSynchronizer<Post> {
        self.synchronizer(PostSearchSource::new(self.search.clone(), query))
    }

    pub fn notification_list(&self) -> FeedSynchronizer<Notification> {
        self.synchronizer(NotificationSource::new(self.notifications.clone()))
    }

    fn synchronizer<T, S>(&self, source: S) -> FeedSynchronizer<T>
    where
        T: nook_core::feed::Identified + Clone + Send + 'static,
        S: nook_core::feed::PageSource<T> + 'static,
    {
        FeedSynchronizer::new(Arc::new(source), self.config.page_size)
    }
}
