//! API client for communicating with the account service REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests. The bearer credential is read from the token store at send
//! time, and an expired access token is silently refreshed and the
//! original request resubmitted once, without involving the caller.

use anyhow::Context;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::models::{
    LoginResponse, MessageReceipt, ProfileUpdate, RegisterReceipt, RegisterRequest, User,
};

use super::{ApiError, ValidationErrors};

// ============================================================================
// Constants
// ============================================================================

/// All account endpoints live under this prefix on the server.
const API_PREFIX: &str = "/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow server responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the account service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a client for the service at `server_url`, e.g.
    /// `http://localhost:8000`.
    pub fn new(server_url: &str, tokens: TokenStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", server_url.trim_end_matches('/'), API_PREFIX),
            tokens,
        })
    }

    /// The token store this client reads its credentials from.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    // ===== Account Endpoints =====

    /// Create an account. The address must be verified before the
    /// account can sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterReceipt, ApiError> {
        self.post("/auth/register/", request).await
    }

    /// Exchange credentials for a token pair and the signed-in user.
    /// The caller decides whether to persist the pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post("/auth/login/", &body).await
    }

    /// Revoke a refresh token server-side.
    pub async fn logout(&self, refresh_token: &str) -> Result<MessageReceipt, ApiError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        self.post("/auth/logout/", &body).await
    }

    /// Fetch the profile of whoever the stored access token belongs to.
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get("/auth/profile/").await
    }

    /// Change name fields; omitted fields keep their current values.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put("/auth/profile/update/", update).await
    }

    /// Redeem an emailed verification token.
    pub async fn verify_email(&self, token: &str) -> Result<MessageReceipt, ApiError> {
        let body = serde_json::json!({ "token": token });
        self.post("/auth/verify-email/", &body).await
    }

    /// Ask for a fresh verification email.
    pub async fn resend_verification(&self, email: &str) -> Result<MessageReceipt, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.post("/auth/resend-verification/", &body).await
    }

    /// Ask for a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageReceipt, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.post("/auth/forgot-password/", &body).await
    }

    /// Redeem a password reset token. Mismatched confirmation is caught
    /// here, before anything goes over the wire.
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<MessageReceipt, ApiError> {
        if password != password_confirm {
            return Err(ApiError::Validation(ValidationErrors::single(
                "Passwords don't match",
            )));
        }
        let body = serde_json::json!({
            "token": token,
            "password": password,
            "password_confirm": password_confirm,
        });
        self.post("/auth/reset-password/", &body).await
    }

    // ===== Transport =====

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Issue a request and apply the refresh-retry policy: on a 401 the
    /// access token is refreshed and the original request resubmitted,
    /// at most once per call. A 401 on the resubmission surfaces as
    /// `Unauthorized` without another refresh. A failed refresh clears
    /// both stored tokens so the caller lands back at sign-in.
    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut response = self.dispatch(method.clone(), &url, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            match self.refresh_access_token().await {
                Ok(()) => {
                    debug!(url = %url, "Access token refreshed, retrying request");
                    response = self.dispatch(method, &url, body).await?;
                }
                Err(e) => {
                    warn!(error = %e, "Token refresh failed, clearing stored tokens");
                    if let Err(e) = self.tokens.clear() {
                        warn!(error = %e, "Failed to clear token store");
                    }
                    return Err(ApiError::Unauthorized);
                }
            }
        }

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e)))
    }

    /// Build and send one request, attaching the access token read from
    /// storage at send time so a pair written by another process is
    /// picked up.
    async fn dispatch<B>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, url);
        if let Some(token) = self.tokens.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Mint a new access token from the stored refresh token and rotate
    /// it into the store. Goes through a bare request rather than
    /// `send` so a rejected refresh can never trigger another refresh.
    async fn refresh_access_token(&self) -> anyhow::Result<()> {
        let refresh = self
            .tokens
            .refresh_token()
            .context("No refresh token stored")?;

        let url = format!("{}/token/refresh/", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let response = Self::check_response(response).await?;
        let minted: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        self.tokens
            .set_access(&minted.access)
            .context("Failed to store rotated access token")?;
        Ok(())
    }

    /// Check if response is successful, returning a classified error
    /// with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer, dir: &TempDir) -> Result<ApiClient> {
        let tokens = TokenStore::new(dir.path().to_path_buf());
        Ok(ApiClient::new(&server.uri(), tokens)?)
    }

    fn user_json(email: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "email": email,
            "username": "user",
            "first_name": "Test",
            "last_name": "User",
            "is_email_verified": true,
            "created_at": "2026-01-05T09:30:00Z"
        })
    }

    #[tokio::test]
    async fn test_login_returns_tokens_and_user() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .and(body_json(json!({
                "email": "user@example.com",
                "password": "password123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "acc-1",
                "refresh_token": "ref-1",
                "user": user_json("user@example.com")
            })))
            .mount(&server)
            .await;

        let response = client.login("user@example.com", "password123").await?;
        assert_eq!(response.access_token, "acc-1");
        assert_eq!(response.refresh_token, "ref-1");
        assert_eq!(response.user.email, "user@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn test_login_rejection_surfaces_non_field_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("POST"))
            .and(path("/api/auth/login/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "non_field_errors": ["Invalid credentials"]
            })))
            .mount(&server)
            .await;

        let err = client
            .login("fail@example.com", "wrong")
            .await
            .expect_err("login should fail");
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.non_field(), Some("Invalid credentials"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_register_success() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("POST"))
            .and(path("/api/auth/register/"))
            .and(body_json(json!({
                "email": "new@example.com",
                "password": "password123",
                "password_confirm": "password123"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Registration successful. Please check your email.",
                "user_id": 7,
                "email_sent": true
            })))
            .mount(&server)
            .await;

        let receipt = client
            .register(&RegisterRequest {
                email: "new@example.com".to_string(),
                password: "password123".to_string(),
                password_confirm: "password123".to_string(),
                first_name: None,
                last_name: None,
            })
            .await?;
        assert_eq!(receipt.user_id, 7);
        assert!(receipt.email_sent);
        Ok(())
    }

    #[tokio::test]
    async fn test_bearer_read_from_store_at_send_time() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        // Client is built before any tokens exist
        let client = client_for(&server, &dir)?;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .and(header("Authorization", "Bearer acc-late"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("user@example.com")),
            )
            .mount(&server)
            .await;

        client.tokens().store("acc-late", "ref-late")?;
        let user = client.fetch_profile().await?;
        assert_eq!(user.email, "user@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn test_401_triggers_single_refresh_and_retry() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;
        client.tokens().store("stale", "ref-1")?;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Given token not valid for any token type",
                "code": "token_not_valid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .and(body_json(json!({ "refresh": "ref-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "fresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("user@example.com")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let user = client.fetch_profile().await?;
        assert_eq!(user.email, "user@example.com");
        // Only the access token rotated
        assert_eq!(client.tokens().access_token().as_deref(), Some("fresh"));
        assert_eq!(client.tokens().refresh_token().as_deref(), Some("ref-1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_second_401_does_not_refresh_again() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;
        client.tokens().store("stale", "ref-1")?;

        // Both the first attempt and the retry are rejected
        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Given token not valid for any token type",
                "code": "token_not_valid"
            })))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "fresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.fetch_profile().await.expect_err("profile should fail");
        assert!(matches!(err, ApiError::Unauthorized));
        // Teardown only happens when the refresh itself fails
        assert_eq!(client.tokens().refresh_token().as_deref(), Some("ref-1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_tokens() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;
        client.tokens().store("stale", "ref-dead")?;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Given token not valid for any token type",
                "code": "token_not_valid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Token is invalid or expired",
                "code": "token_not_valid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.fetch_profile().await.expect_err("profile should fail");
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(client.tokens().access_token(), None);
        assert_eq!(client.tokens().refresh_token(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_skips_refresh_call() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("GET"))
            .and(path("/api/auth/profile/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Authentication credentials were not provided."
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client.fetch_profile().await.expect_err("profile should fail");
        assert!(matches!(err, ApiError::Unauthorized));
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_password_mismatch_never_reaches_network() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("POST"))
            .and(path("/api/auth/reset-password/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client
            .reset_password("tok", "password123", "password124")
            .await
            .expect_err("reset should fail");
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.summary(), "Passwords don't match");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_email_expired_link() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;

        Mock::given(method("POST"))
            .and(path("/api/auth/verify-email/"))
            .and(body_json(json!({ "token": "old-token" })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Verification token has expired"
            })))
            .mount(&server)
            .await;

        let err = client
            .verify_email("old-token")
            .await
            .expect_err("verify should fail");
        match err {
            ApiError::Validation(errors) => assert!(errors.is_expired_token()),
            other => panic!("expected validation error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_omits_unset_fields() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = TempDir::new()?;
        let client = client_for(&server, &dir)?;
        client.tokens().store("acc-1", "ref-1")?;

        Mock::given(method("PUT"))
            .and(path("/api/auth/profile/update/"))
            .and(body_json(json!({ "first_name": "Ada" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("user@example.com")),
            )
            .mount(&server)
            .await;

        let user = client
            .update_profile(&ProfileUpdate {
                first_name: Some("Ada".to_string()),
                last_name: None,
            })
            .await?;
        assert_eq!(user.email, "user@example.com");
        Ok(())
    }
}
