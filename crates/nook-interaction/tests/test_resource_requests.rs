use async_trait::async_trait;
use nook_core::auth::{CredentialPair, Navigator, Route};
use nook_core::http::{ApiRequest, ApiResponse, Method, Transport};
use nook_core::model::ProfileUpdate;
use nook_core::{NookError, Result};
use nook_infrastructure::MemoryTokenStore;
use nook_interaction::{PostsApi, ProfileApi, SessionManager};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Backend double that answers every request with one fixed body.
struct FixedBackend {
    body: &'static str,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FixedBackend {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FixedBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(ApiResponse::new(200, self.body))
    }
}

struct IgnoreNavigation;

impl Navigator for IgnoreNavigation {
    fn navigate(&self, _route: Route) {}
}

fn signed_in(backend: Arc<FixedBackend>) -> Arc<SessionManager> {
    let store = Arc::new(MemoryTokenStore::with_pair(CredentialPair::new("A1", "R1")));
    Arc::new(SessionManager::new(backend, store, Arc::new(IgnoreNavigation)))
}

#[tokio::test]
async fn test_profile_update_sends_only_changed_fields() {
    let backend = Arc::new(FixedBackend::new(
        r#"{"status":true,"data":{"_id":"u1","username":"ada","bio":"Writes compilers"}}"#,
    ));
    let profile = ProfileApi::new(signed_in(backend.clone()));

    let update = ProfileUpdate {
        bio: Some("Writes compilers".into()),
        avatar_url: Some("https://img.example/ada.png".into()),
        ..Default::default()
    };
    let updated = profile.update(&update).await.unwrap();

    assert_eq!(updated.username, "ada");
    assert_eq!(updated.bio.as_deref(), Some("Writes compilers"));

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Put);
    assert_eq!(calls[0].path, "/profile");
    assert_eq!(calls[0].bearer(), Some("A1"));
    assert_eq!(
        calls[0].body,
        Some(json!({
            "bio": "Writes compilers",
            "avatarUrl": "https://img.example/ada.png"
        }))
    );
}

#[tokio::test]
async fn test_empty_profile_update_is_rejected_locally() {
    let backend = Arc::new(FixedBackend::new(r#"{"status":true,"data":{}}"#));
    let profile = ProfileApi::new(signed_in(backend.clone()));

    let err = profile.update(&ProfileUpdate::default()).await.unwrap_err();

    assert!(matches!(err, NookError::InvalidInput(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_feed_page_with_null_data_is_empty() {
    let backend = Arc::new(FixedBackend::new(r#"{"status":true,"data":null}"#));
    let posts = PostsApi::new(signed_in(backend.clone()));

    let page = posts.feed(3, 10).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(backend.calls().len(), 1);
}
