//! Transport-independent HTTP types shared by the session pipeline and the
//! resource APIs.

pub mod envelope;
pub mod request;

pub use envelope::{Envelope, extract_message};
pub use request::{ApiRequest, ApiResponse, Method, RequestContext};

use crate::error::Result;
use async_trait::async_trait;

/// Executes a fully-formed request against the backend.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; only a call that never completed is an `Err`
/// (`NookError::Network`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}
