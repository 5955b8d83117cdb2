//! Wire types for the authentication exchanges.

use nook_core::auth::CredentialPair;
use nook_core::model::UserSummary;
use nook_core::{NookError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const REFRESH_PATH: &str = "/auth/refresh-token";
pub const TWO_FACTOR_PATH: &str = "/profile/2fa/authenticate";
pub const GOOGLE_PATH: &str = "/auth/google";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorRequest {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `data` of every auth exchange response.
///
/// Carries either a credential pair or, for a login on an account with a
/// second factor, the marker plus the user id to verify.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, rename = "requires2FA", alias = "requires2fa")]
    pub requires_two_factor: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl AuthPayload {
    /// The credential pair, if both halves are present.
    pub fn credentials(&self) -> Option<CredentialPair> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access), Some(refresh)) => {
                let pair = CredentialPair::new(access.clone(), refresh.clone());
                pair.is_complete().then_some(pair)
            }
            _ => None,
        }
    }
}

/// Result of a successful authentication exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials were stored; the session is live.
    Authenticated { user: Option<UserSummary> },
    /// The account has a second factor; call `verify_2fa` with this user id.
    TwoFactorRequired { user_id: String },
}

/// Entry point of the Google OAuth flow on the backend.
pub fn google_login_url(api_base_url: &str) -> String {
    format!("{}{}", api_base_url.trim_end_matches('/'), GOOGLE_PATH)
}

/// Reads the credential pair from the OAuth callback URL.
///
/// The backend finishes the Google flow by redirecting to the client with
/// `accessToken` and `refreshToken` query parameters, or with `error`.
pub fn parse_oauth_callback(callback_url: &str) -> Result<CredentialPair> {
    let url = Url::parse(callback_url)
        .map_err(|e| NookError::invalid_input(format!("Invalid callback URL: {}", e)))?;

    let mut access = None;
    let mut refresh = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "accessToken" => access = Some(value.into_owned()),
            "refreshToken" => refresh = Some(value.into_owned()),
            "error" => {
                return Err(NookError::api(401, format!("Google sign-in failed: {}", value)));
            }
            _ => {}
        }
    }

    match (access, refresh) {
        (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
            Ok(CredentialPair::new(access, refresh))
        }
        _ => Err(NookError::invalid_input(
            "Callback URL does not carry both accessToken and refreshToken",
        )),
    }
}
