//! Backend response envelope.
//!
//! The backend wraps payloads as `{ status, data, message }`, but some
//! endpoints use `success` instead of `status` and `error` instead of
//! `message`. Both spellings are accepted.

use super::request::ApiResponse;
use crate::error::{NookError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, alias = "success")]
    pub status: Option<bool>,
    pub data: Option<T>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwraps the payload, turning an explicit `false` flag into an error.
    pub fn into_data(self, http_status: u16) -> Result<T> {
        self.into_optional_data(http_status)?
            .ok_or_else(|| NookError::decode("Response envelope has no data"))
    }

    /// Like [`into_data`](Self::into_data), but a missing or `null` payload
    /// is `None` rather than an error.
    pub fn into_optional_data(self, http_status: u16) -> Result<Option<T>> {
        if self.status == Some(false) {
            return Err(NookError::api(
                http_status,
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        Ok(self.data)
    }
}

/// Pulls a display message out of an error body.
///
/// Looks at `message`, then `error`; falls back to `None` when the body is not
/// JSON or carries neither field as a string.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

impl ApiResponse {
    /// Decodes the envelope's `data` field.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let envelope: Envelope<T> = serde_json::from_str(&self.body)?;
        envelope.into_data(self.status)
    }

    /// Decodes the envelope's `data` field, allowing it to be absent or `null`.
    pub fn decode_optional<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let envelope: Envelope<T> = serde_json::from_str(&self.body)?;
        envelope.into_optional_data(self.status)
    }

    /// Checks the envelope flag of a response whose payload is not needed.
    ///
    /// An empty body (e.g. 204) counts as success.
    pub fn decode_ack(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            return Ok(());
        }

        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&self.body)?;
        if envelope.status == Some(false) {
            return Err(NookError::api(
                self.status,
                envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        Ok(())
    }

    /// Converts a non-2xx response into a business error.
    pub fn into_api_error(self) -> NookError {
        let message = extract_message(&self.body).unwrap_or_else(|| {
            if self.body.trim().is_empty() {
                format!("Request failed with status {}", self.status)
            } else {
                self.body.clone()
            }
        });
        NookError::api(self.status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_status_form() {
        let response = ApiResponse::new(200, r#"{"status":true,"data":{"id":"1"}}"#);
        let item: Item = response.decode().unwrap();
        assert_eq!(item.id, "1");
    }

    #[test]
    fn test_success_form() {
        let response = ApiResponse::new(200, r#"{"success":true,"data":[{"id":"1"},{"id":"2"}]}"#);
        let items: Vec<Item> = response.decode().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_false_flag_is_business_error() {
        let response = ApiResponse::new(200, r#"{"success":false,"message":"Post not found"}"#);
        let err = response.decode::<Item>().unwrap_err();
        assert_eq!(err, NookError::api(200, "Post not found"));
    }

    #[test]
    fn test_missing_data_is_decode_error() {
        let response = ApiResponse::new(200, r#"{"status":true}"#);
        let err = response.decode::<Item>().unwrap_err();
        assert!(matches!(err, NookError::Decode(_)));
    }

    #[test]
    fn test_missing_data_field_is_none_for_any_payload_type() {
        let envelope: Envelope<Item> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(envelope.status, Some(true));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_decode_optional_accepts_null_data() {
        let response = ApiResponse::new(200, r#"{"status":true,"data":null}"#);
        assert_eq!(response.decode_optional::<Item>().unwrap(), None);

        let response = ApiResponse::new(200, r#"{"status":true,"data":{"id":"7"}}"#);
        assert_eq!(
            response.decode_optional::<Item>().unwrap(),
            Some(Item { id: "7".into() })
        );

        let response = ApiResponse::new(200, r#"{"status":false,"message":"Gone"}"#);
        assert_eq!(
            response.decode_optional::<Item>().unwrap_err(),
            NookError::api(200, "Gone")
        );
    }

    #[test]
    fn test_extract_message_prefers_message_then_error() {
        assert_eq!(
            extract_message(r#"{"status":false,"message":"Invalid password"}"#),
            Some("Invalid password".to_string())
        );
        assert_eq!(
            extract_message(r#"{"error":"Too many requests"}"#),
            Some("Too many requests".to_string())
        );
        assert_eq!(extract_message("<html>502</html>"), None);
    }

    #[test]
    fn test_into_api_error_falls_back_to_status() {
        let err = ApiResponse::new(503, "").into_api_error();
        assert_eq!(err, NookError::api(503, "Request failed with status 503"));
    }

    #[test]
    fn test_decode_ack_accepts_empty_body() {
        assert!(ApiResponse::new(204, "").decode_ack().is_ok());
        assert!(
            ApiResponse::new(200, r#"{"status":false,"message":"nope"}"#)
                .decode_ack()
                .is_err()
        );
    }
}
