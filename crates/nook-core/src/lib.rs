pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod model;

// Re-export common error type
pub use error::{NookError, Result};
