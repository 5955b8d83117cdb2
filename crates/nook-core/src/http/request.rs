use crate::error::{NookError, Result};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// HTTP verbs the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-independent description of one backend call.
///
/// `path` is relative to the configured API base URL (e.g. `/post`).
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends the `page`/`limit` pair used by every list endpoint.
    pub fn with_page(self, page: u32, limit: u32) -> Self {
        self.with_query("page", page).with_query("limit", limit)
    }

    /// Serializes `body` as the JSON payload.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| NookError::internal(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sets (or replaces) the bearer credential.
    pub fn set_bearer(&mut self, token: impl Into<String>) {
        self.bearer = Some(token.into());
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A pending call threaded through the session pipeline.
///
/// `retried` is set once the request has been replayed after a token
/// refresh; a second 401 on a retried request is surfaced as-is.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: Uuid,
    pub request: ApiRequest,
    pub retried: bool,
}

impl RequestContext {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            retried: false,
        }
    }

    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

/// Raw response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query() {
        let request = ApiRequest::get("/post").with_page(3, 10);
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "3".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_debug_hides_bearer() {
        let mut request = ApiRequest::get("/profile");
        request.set_bearer("very-secret");
        assert_eq!(request.bearer(), Some("very-secret"));
        assert!(!format!("{:?}", request).contains("very-secret"));
    }

    #[test]
    fn test_context_starts_unretried() {
        let mut ctx = RequestContext::new(ApiRequest::get("/post"));
        assert!(!ctx.retried);
        ctx.mark_retried();
        assert!(ctx.retried);
    }

    #[test]
    fn test_response_status_helpers() {
        assert!(ApiResponse::new(204, "").is_success());
        assert!(ApiResponse::new(401, "").is_unauthorized());
        assert!(!ApiResponse::new(500, "").is_success());
    }
}
