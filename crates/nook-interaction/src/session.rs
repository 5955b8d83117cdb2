//! Session manager: credential lifecycle and the authenticated request
//! pipeline.
//!
//! Every resource call goes through [`SessionManager::send`]:
//!
//! 1. attach the stored access token as a bearer credential
//! 2. execute the request
//! 3. on a 401 for a request that was not retried yet, exchange the refresh
//!    token for a new pair, store it, and replay the request once
//! 4. map any remaining non-2xx response to an error

use crate::api::auth::{
    AuthOutcome, AuthPayload, LOGIN_PATH, LoginRequest, REFRESH_PATH, REGISTER_PATH,
    RefreshRequest, RegisterRequest, TWO_FACTOR_PATH, TwoFactorRequest, parse_oauth_callback,
};
use nook_core::auth::{AuthState, CredentialPair, Navigator, Route, TokenSlot, TokenStore};
use nook_core::http::{ApiRequest, ApiResponse, RequestContext, Transport, extract_message};
use nook_core::{NookError, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// Single source of truth for authentication state.
///
/// `SessionManager` is responsible for:
/// - Persisting credential pairs after login, registration, 2FA and OAuth
/// - Injecting the access token into outgoing requests
/// - Refreshing expired credentials and replaying the failed request once
/// - Clearing credentials and redirecting to login when the session is gone
///
/// Refresh exchanges are serialized; a request that hits a 401 while another
/// refresh is finishing reuses the freshly stored token instead of spending
/// the refresh token again.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<AuthState>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// Creates a session manager over the given collaborators.
    ///
    /// The initial state is `Authenticated` when the store already holds a
    /// complete credential pair, otherwise `Anonymous`.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = match store.load() {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                tracing::warn!("[SessionManager] Could not read stored session: {}", e);
                AuthState::Anonymous
            }
        };

        tracing::debug!("[SessionManager] Initial state: {:?}", initial);

        Self {
            transport,
            store,
            navigator,
            state: Mutex::new(initial),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    // ============================================================================
    // Request pipeline
    // ============================================================================

    /// Sets the stored access token as the request's bearer credential.
    ///
    /// Requests go out unchanged when no token is stored.
    pub fn attach_credentials(&self, request: &mut ApiRequest) {
        match self.store.get(TokenSlot::AccessToken) {
            Ok(Some(token)) => request.set_bearer(token),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "[SessionManager] Could not read access token, sending unauthenticated: {}",
                    e
                );
            }
        }
    }

    /// Sends a request through the authenticated pipeline.
    ///
    /// # Errors
    ///
    /// - `Network` when the request could not complete
    /// - `SessionExpired` when a 401 arrived and no refresh token was stored
    /// - the refresh exchange's own error when the refresh failed
    /// - `Unauthorized` when the replayed request is rejected again
    /// - `Api` for every other non-2xx response, carrying the envelope's message
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut ctx = RequestContext::new(request);
        self.attach_credentials(&mut ctx.request);

        tracing::debug!(
            "[SessionManager] {} {} (request {})",
            ctx.request.method,
            ctx.request.path,
            ctx.id
        );

        let response = self.transport.execute(&ctx.request).await?;
        let response = if response.is_unauthorized() && !ctx.retried {
            self.handle_unauthorized(ctx, response).await?
        } else {
            response
        };

        Self::check(response)
    }

    /// Recovers from a 401 by refreshing credentials and replaying `ctx` once.
    ///
    /// A context that was already retried is returned untouched so the caller
    /// surfaces the second 401.
    pub async fn handle_unauthorized(
        &self,
        mut ctx: RequestContext,
        response: ApiResponse,
    ) -> Result<ApiResponse> {
        if ctx.retried {
            return Ok(response);
        }

        let sent_with = ctx.request.bearer().map(str::to_string);
        let access_token = {
            let _guard = self.refresh_lock.lock().await;

            let stored = match self.store.load() {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!("[SessionManager] Could not read stored session: {}", e);
                    None
                }
            };

            match stored {
                // The request carried a token that has since been cleared, so
                // whoever cleared it already ended the session.
                None if sent_with.is_some() => {
                    tracing::debug!(
                        "[SessionManager] Session already ended; not redirecting again (request {})",
                        ctx.id
                    );
                    return Err(NookError::SessionExpired("Session has ended".to_string()));
                }
                None => {
                    tracing::info!(
                        "[SessionManager] 401 on {} with no refresh token; ending session",
                        ctx.request.path
                    );
                    self.end_session();
                    return Err(NookError::SessionExpired("No refresh token available".to_string()));
                }
                // Another request refreshed while this one waited for the lock.
                Some(pair) if sent_with.as_deref() != Some(pair.access_token.as_str()) => {
                    tracing::debug!(
                        "[SessionManager] Credentials already refreshed; replaying request {}",
                        ctx.id
                    );
                    pair.access_token
                }
                Some(pair) => self.refresh(&pair.refresh_token).await?,
            }
        };

        ctx.mark_retried();
        ctx.request.set_bearer(access_token);

        tracing::info!(
            "[SessionManager] Replaying {} {} after refresh (request {})",
            ctx.request.method,
            ctx.request.path,
            ctx.id
        );

        self.transport.execute(&ctx.request).await
    }

    /// Exchanges the refresh token and stores the new pair.
    ///
    /// On any failure the session is ended before the error is returned.
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        self.set_state(AuthState::Refreshing);

        let pair = match self.exchange_refresh(refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("[SessionManager] Token refresh failed: {}", e);
                self.end_session();
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&pair) {
            tracing::error!("[SessionManager] Could not store refreshed session: {}", e);
            self.end_session();
            return Err(e);
        }

        self.set_state(AuthState::Authenticated);
        tracing::info!("[SessionManager] Credentials refreshed");
        Ok(pair.access_token)
    }

    async fn exchange_refresh(&self, refresh_token: &str) -> Result<CredentialPair> {
        let request = ApiRequest::post(REFRESH_PATH).with_json(&RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })?;

        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            return Err(response.into_api_error());
        }

        let payload: AuthPayload = response.decode()?;
        payload
            .credentials()
            .ok_or_else(|| NookError::decode("Refresh response did not contain a credential pair"))
    }

    fn check(response: ApiResponse) -> Result<ApiResponse> {
        if response.is_success() {
            return Ok(response);
        }
        if response.is_unauthorized() {
            let message =
                extract_message(&response.body).unwrap_or_else(|| "Unauthorized".to_string());
            return Err(NookError::Unauthorized(message));
        }
        Err(response.into_api_error())
    }

    // ============================================================================
    // Authentication exchanges
    // ============================================================================

    /// Logs in with email and password.
    ///
    /// Returns [`AuthOutcome::TwoFactorRequired`] without touching storage when
    /// the account has a second factor.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let request = ApiRequest::post(LOGIN_PATH).with_json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        self.authenticate("login", request).await
    }

    /// Creates an account and starts a session for it.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthOutcome> {
        let request = ApiRequest::post(REGISTER_PATH).with_json(registration)?;
        self.authenticate("register", request).await
    }

    /// Completes a login that required a second factor.
    pub async fn verify_2fa(&self, user_id: &str, code: &str) -> Result<AuthOutcome> {
        let request = ApiRequest::post(TWO_FACTOR_PATH).with_json(&TwoFactorRequest {
            user_id: user_id.to_string(),
            token: code.to_string(),
        })?;
        self.authenticate("2fa", request).await
    }

    /// Completes the Google OAuth flow from its callback URL.
    pub fn google_login(&self, callback_url: &str) -> Result<AuthOutcome> {
        let previous = self.begin_authentication();

        let pair = match parse_oauth_callback(callback_url) {
            Ok(pair) => pair,
            Err(e) => {
                self.abort_authentication(previous, "google", &e);
                return Err(e);
            }
        };

        self.establish("google", previous, &pair)?;
        Ok(AuthOutcome::Authenticated { user: None })
    }

    /// Clears the stored credentials and returns to the login view.
    ///
    /// Never fails; storage errors are logged.
    pub fn logout(&self) {
        tracing::info!("[SessionManager] Logging out");
        self.end_session();
    }

    async fn authenticate(&self, label: &str, request: ApiRequest) -> Result<AuthOutcome> {
        let previous = self.begin_authentication();

        let payload = match self.exchange(request).await {
            Ok(payload) => payload,
            Err(e) => {
                self.abort_authentication(previous, label, &e);
                return Err(e);
            }
        };

        if payload.requires_two_factor {
            let Some(user_id) = payload.user_id.clone() else {
                let e = NookError::decode("Second factor required but no user id was returned");
                self.abort_authentication(previous, label, &e);
                return Err(e);
            };
            tracing::info!("[SessionManager] {}: second factor required", label);
            self.restore_state(previous);
            return Ok(AuthOutcome::TwoFactorRequired { user_id });
        }

        let Some(pair) = payload.credentials() else {
            let e = NookError::decode("Authentication response did not contain a credential pair");
            self.abort_authentication(previous, label, &e);
            return Err(e);
        };

        self.establish(label, previous, &pair)?;
        Ok(AuthOutcome::Authenticated { user: payload.user })
    }

    async fn exchange(&self, request: ApiRequest) -> Result<AuthPayload> {
        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            return Err(response.into_api_error());
        }
        response.decode()
    }

    /// Stores `pair`, marks the session live, and goes to the landing view.
    fn establish(&self, label: &str, previous: AuthState, pair: &CredentialPair) -> Result<()> {
        if let Err(e) = self.store.save(pair) {
            self.abort_authentication(previous, label, &e);
            return Err(e);
        }

        self.set_state(AuthState::Authenticated);
        tracing::info!("[SessionManager] {}: authenticated", label);
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    fn begin_authentication(&self) -> AuthState {
        let previous = self.state();
        self.set_state(AuthState::Authenticating);
        previous
    }

    fn abort_authentication(&self, previous: AuthState, label: &str, error: &NookError) {
        tracing::warn!("[SessionManager] {} failed: {}", label, error);
        self.restore_state(previous);
    }

    /// Leaves `Authenticating` for wherever the session was before.
    fn restore_state(&self, previous: AuthState) {
        let next = if previous.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        self.set_state(next);
    }

    fn end_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("[SessionManager] Failed to clear stored session: {}", e);
        }
        self.set_state(AuthState::Anonymous);
        self.navigator.navigate(Route::Login);
    }

    fn set_state(&self, next: AuthState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(next) {
            tracing::warn!(
                "[SessionManager] Unexpected state transition {:?} -> {:?}",
                *state,
                next
            );
        }
        *state = next;
    }
}
