use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::TokenStore;
use crate::models::{RegisterReceipt, RegisterRequest, User};

/// Single source of truth for "who is signed in."
///
/// Holds the in-memory user record; the durable token pair lives in the
/// client's `TokenStore`. Operations take `&mut self`, so one store can
/// never run two mutations at once.
pub struct SessionStore {
    api: ApiClient,
    tokens: TokenStore,
    user: Option<User>,
    is_loading: bool,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        let tokens = api.tokens().clone();
        Self {
            api,
            tokens,
            user: None,
            is_loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// True only while `initialize` runs its one-time startup check.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Derived from the user record, never stored separately.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// One-time startup check for an existing session. With no stored
    /// access token this touches nothing over the network. A stored
    /// token that no longer fetches a profile takes the whole pair down
    /// with it.
    pub async fn initialize(&mut self) {
        if self.tokens.access_token().is_some() {
            match self.api.fetch_profile().await {
                Ok(user) => {
                    debug!(email = %user.email, "Restored session");
                    self.user = Some(user);
                }
                Err(e) => {
                    debug!(error = %e, "Stored session is no longer valid");
                    if let Err(e) = self.tokens.clear() {
                        warn!(error = %e, "Failed to clear token store");
                    }
                }
            }
        }
        self.is_loading = false;
    }

    /// Sign in and persist the returned token pair. Failures propagate
    /// unchanged so the screen can show field-level messages.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self.api.login(email, password).await?;

        if let Err(e) = self
            .tokens
            .store(&response.access_token, &response.refresh_token)
        {
            warn!(error = %e, "Failed to persist token pair");
        }
        self.user = Some(response.user);
        Ok(())
    }

    /// Create an account. The session is untouched either way; the new
    /// account cannot sign in until its email is verified.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterReceipt, ApiError> {
        self.api.register(request).await
    }

    /// Sign out. The server call is best-effort; local state always
    /// ends cleared.
    pub async fn logout(&mut self) {
        if let Some(refresh) = self.tokens.refresh_token() {
            if let Err(e) = self.api.logout(&refresh).await {
                warn!(error = %e, "Remote logout failed");
            }
        }
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear token store");
        }
        self.user = None;
    }

    /// Re-validate the session by fetching the profile again, picking
    /// up server-side changes. If the fetch fails the session is no
    /// longer usable and is torn down locally.
    pub async fn refresh_auth(&mut self) {
        match self.api.fetch_profile().await {
            Ok(user) => self.user = Some(user),
            Err(e) => {
                warn!(error = %e, "Session re-validation failed, signing out");
                self.logout().await;
            }
        }
    }

    /// Replace the in-memory user record, e.g. after a profile update
    /// already returned the new state.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }
}

// ============================================================================
// Tests
// ============================================================================
