use serde::{Deserialize, Serialize};
use std::fmt;

/// Access/refresh token pair issued by the backend.
///
/// The two tokens are always stored and cleared together; nothing in the
/// client holds an access token without its refresh token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns the token held in the given slot.
    pub fn slot(&self, slot: TokenSlot) -> &str {
        match slot {
            TokenSlot::AccessToken => &self.access_token,
            TokenSlot::RefreshToken => &self.refresh_token,
        }
    }

    /// A pair is usable only when both halves are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

// Tokens never reach logs.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// The two named storage slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSlot {
    AccessToken,
    RefreshToken,
}

impl TokenSlot {
    /// Storage key for the slot.
    pub fn key(self) -> &'static str {
        match self {
            TokenSlot::AccessToken => "accessToken",
            TokenSlot::RefreshToken => "refreshToken",
        }
    }
}

/// Authentication state of one client session.
///
/// ```text
/// Anonymous ──▶ Authenticating ──▶ Authenticated ──▶ Refreshing
///     ▲               │                  │               │
///     └───────────────┴──────────────────┴───────────────┘
/// ```
///
/// `Refreshing` is transient: it always resolves to `Authenticated` or
/// `Anonymous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

impl AuthState {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(self, next: AuthState) -> bool {
        use AuthState::*;

        if self == next {
            return true;
        }

        matches!(
            (self, next),
            (Anonymous, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Anonymous)
                | (Authenticated, Authenticating)
                | (Authenticated, Anonymous)
                | (Authenticated, Refreshing)
                | (Refreshing, Authenticated)
                | (Refreshing, Anonymous)
        )
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthState::Authenticated | AuthState::Refreshing)
    }
}

/// Views the core may ask the front end to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Authenticated landing view
    Home,
    /// Unauthenticated entry view
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
