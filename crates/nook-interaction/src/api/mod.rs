//! Typed clients for the backend's REST resources.
//!
//! Every client shares one [`SessionManager`](crate::session::SessionManager)
//! so that credential injection and refresh apply uniformly.

pub mod auth;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod profile;
pub mod search;

pub use auth::{AuthOutcome, AuthPayload, RegisterRequest, google_login_url, parse_oauth_callback};
pub use messages::MessagesApi;
pub use notifications::NotificationsApi;
pub use posts::PostsApi;
pub use profile::{FollowState, ProfileApi};
pub use search::SearchApi;

use nook_core::http::ApiResponse;
use nook_core::{NookError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a list payload.
///
/// List endpoints answer either with a bare array in `data` or with an
/// object that wraps the array under `key` (next to paging metadata).
/// A missing or `null` list is empty.
pub(crate) fn decode_list<T: DeserializeOwned>(
    response: &ApiResponse,
    key: &str,
) -> Result<Vec<T>> {
    let Some(data) = response.decode_optional::<Value>()? else {
        return Ok(Vec::new());
    };
    let items = match data {
        Value::Array(_) => data,
        Value::Object(mut map) => match map.remove(key) {
            Some(items @ Value::Array(_)) => items,
            Some(Value::Null) => return Ok(Vec::new()),
            _ => {
                return Err(NookError::decode(format!(
                    "Expected a list under '{}' in response",
                    key
                )));
            }
        },
        other => {
            return Err(NookError::decode(format!(
                "Expected a list in response, got {}",
                other
            )));
        }
    };
    Ok(serde_json::from_value(items)?)
}

/// Validates an id before it is interpolated into a path.
pub(crate) fn segment<'a>(what: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NookError::invalid_input(format!("{} must not be empty", what)));
    }
    if id.contains(['/', '?', '#']) {
        return Err(NookError::invalid_input(format!(
            "{} contains invalid characters: {}",
            what, id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[test]
    fn test_decode_bare_list() {
        let response = ApiResponse::new(200, r#"{"status":true,"data":[{"id":"a"},{"id":"b"}]}"#);
        let rows: Vec<Row> = decode_list(&response, "posts").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_decode_wrapped_list() {
        let response = ApiResponse::new(
            200,
            r#"{"status":true,"data":{"posts":[{"id":"a"}],"totalPages":3}}"#,
        );
        let rows: Vec<Row> = decode_list(&response, "posts").unwrap();
        assert_eq!(rows, vec![Row { id: "a".into() }]);
    }

    #[test]
    fn test_decode_wrapped_list_with_wrong_key() {
        let response = ApiResponse::new(200, r#"{"status":true,"data":{"items":[]}}"#);
        assert!(decode_list::<Row>(&response, "posts").is_err());
    }

    #[test]
    fn test_decode_null_list_is_empty() {
        let response = ApiResponse::new(200, r#"{"status":true,"data":null}"#);
        assert!(decode_list::<Row>(&response, "posts").unwrap().is_empty());

        let response = ApiResponse::new(200, r#"{"success":true}"#);
        assert!(decode_list::<Row>(&response, "posts").unwrap().is_empty());

        let response = ApiResponse::new(200, r#"{"status":true,"data":{"posts":null}}"#);
        assert!(decode_list::<Row>(&response, "posts").unwrap().is_empty());
    }

    #[test]
    fn test_decode_list_keeps_business_errors() {
        let response = ApiResponse::new(200, r#"{"status":false,"message":"Feed unavailable"}"#);
        assert_eq!(
            decode_list::<Row>(&response, "posts").unwrap_err(),
            NookError::api(200, "Feed unavailable")
        );
    }

    #[test]
    fn test_segment_validation() {
        assert_eq!(segment("post id", " p1 ").unwrap(), "p1");
        assert!(segment("post id", "").is_err());
        assert!(segment("post id", "p1/like").is_err());
        assert!(segment("post id", "p1?x=1").is_err());
    }
}
