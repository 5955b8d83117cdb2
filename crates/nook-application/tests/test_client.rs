use async_trait::async_trait;
use nook_application::{BootstrapOptions, ChannelNavigator, FeedController, NookClient};
use nook_core::Result;
use nook_core::auth::{AuthState, CredentialPair, Route, TokenStore};
use nook_core::config::ClientConfig;
use nook_core::feed::LoadOutcome;
use nook_core::http::{ApiRequest, ApiResponse, Transport};
use nook_infrastructure::{FileTokenStore, MemoryTokenStore};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::watch;

/// Serves a feed of `total` posts, paged by the request's `page`/`limit`.
struct FeedBackend {
    total: usize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FeedBackend {
    fn new(total: usize) -> Self {
        Self {
            total,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn pages_requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.query.iter().find(|(k, _)| k == "page").map(|(_, v)| v.clone()))
            .collect()
    }

    fn param(request: &ApiRequest, key: &str) -> usize {
        request
            .query
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transport for FeedBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if request.bearer() != Some("A1") {
            return Ok(ApiResponse::new(401, r#"{"message":"No token"}"#));
        }

        let page = Self::param(request, "page").max(1);
        let limit = Self::param(request, "limit");
        let posts: Vec<_> = ((page - 1) * limit..(page * limit).min(self.total))
            .map(|i| {
                json!({
                    "_id": format!("p{}", i),
                    "author": {"_id": "u1", "username": "ada"},
                    "content": format!("post {}", i),
                })
            })
            .collect();

        let body = json!({"status": true, "data": {"posts": posts}});
        Ok(ApiResponse::new(200, body.to_string()))
    }
}

fn client(total: usize, page_size: u32) -> (NookClient, Arc<FeedBackend>) {
    let backend = Arc::new(FeedBackend::new(total));
    let (navigator, _rx) = ChannelNavigator::channel();
    let config = ClientConfig {
        page_size,
        ..Default::default()
    };
    let client = NookClient::assemble(
        config,
        backend.clone(),
        Arc::new(MemoryTokenStore::with_pair(CredentialPair::new("A1", "R1"))),
        Arc::new(navigator),
    );
    (client, backend)
}

#[tokio::test]
async fn test_home_feed_pages_through_to_the_end() {
    let (client, backend) = client(14, 10);
    let feed = client.home_feed();

    feed.load_initial().await.unwrap();
    let first = feed.snapshot();
    assert_eq!(first.len(), 10);
    assert!(first.has_more());

    assert_eq!(
        feed.load_next().await.unwrap(),
        LoadOutcome::Loaded { page: 2, fetched: 4 }
    );
    let window = feed.snapshot();
    assert_eq!(window.len(), 14);
    assert!(!window.has_more());

    // End of list: no further request goes out.
    assert_eq!(feed.load_next().await.unwrap(), LoadOutcome::Skipped);
    assert_eq!(backend.pages_requested(), vec!["1", "2"]);
}

#[tokio::test]
async fn test_visibility_stream_drives_the_feed() {
    let (client, backend) = client(25, 10);
    let feed = Arc::new(client.home_feed());
    feed.load_initial().await.unwrap();

    let controller = FeedController::new(feed.clone());
    assert!(matches!(controller.observe(true).await, LoadOutcome::Loaded { page: 2, .. }));
    assert_eq!(controller.observe(true).await, LoadOutcome::Skipped);
    controller.observe(false).await;

    let (tx, rx) = watch::channel(false);
    let handle = controller.spawn(rx);
    tx.send(true).unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(feed.snapshot().len(), 25);
    assert_eq!(backend.pages_requested(), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_refresh_twice_does_not_duplicate() {
    let (client, _) = client(10, 10);
    let feed = client.home_feed();

    let (a, b) = tokio::join!(feed.refresh(), feed.refresh());
    a.unwrap();
    b.unwrap();

    let window = feed.snapshot();
    assert_eq!(window.len(), 10);
    assert_eq!(window.page(), 1);
}

#[tokio::test]
async fn test_expired_session_surfaces_in_window_and_navigates() {
    let backend = Arc::new(FeedBackend::new(5));
    let (navigator, mut routes) = ChannelNavigator::channel();
    let client = NookClient::assemble(
        ClientConfig::default(),
        backend,
        Arc::new(MemoryTokenStore::new()),
        Arc::new(navigator),
    );
    let feed = client.notification_list();

    assert!(feed.load_initial().await.is_err());

    let window = feed.snapshot();
    assert!(window.error().is_some());
    assert!(!window.is_loading());
    assert_eq!(routes.try_recv().unwrap(), Route::Login);
    assert_eq!(client.session().state(), AuthState::Anonymous);
}

#[test]
fn test_bootstrap_uses_session_file_in_config_dir() {
    let temp_dir = TempDir::new().unwrap();
    FileTokenStore::with_path(temp_dir.path().join("session.json"))
        .save(&CredentialPair::new("A1", "R1"))
        .unwrap();

    let (navigator, _rx) = ChannelNavigator::channel();
    let options = BootstrapOptions {
        config_dir: Some(temp_dir.path().to_path_buf()),
        ephemeral: false,
    };
    let client = NookClient::bootstrap(&options, Arc::new(navigator)).unwrap();

    assert!(client.session().is_authenticated());
    assert_eq!(client.config().page_size, 10);
    assert!(client.google_login_url().ends_with("/auth/google"));
}

#[test]
fn test_bootstrap_ephemeral_starts_anonymous() {
    let temp_dir = TempDir::new().unwrap();
    FileTokenStore::with_path(temp_dir.path().join("session.json"))
        .save(&CredentialPair::new("A1", "R1"))
        .unwrap();

    let (navigator, _rx) = ChannelNavigator::channel();
    let options = BootstrapOptions {
        config_dir: Some(temp_dir.path().to_path_buf()),
        ephemeral: true,
    };
    let client = NookClient::bootstrap(&options, Arc::new(navigator)).unwrap();

    assert_eq!(client.session().state(), AuthState::Anonymous);
}
