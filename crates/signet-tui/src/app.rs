//! Application state management for the signet TUI.
//!
//! This module contains the core `App` struct that manages all application
//! state: the active screen, per-screen form fields, and the session held
//! in signet-core. Submit handlers await the API inline and turn failures
//! into messages the screens can show.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use signet_core::models::{ProfileUpdate, RegisterRequest};
use signet_core::{ApiClient, ApiError, Config, SessionStore, TokenStore, ValidationErrors};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
/// 254 covers the longest address SMTP will deliver.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for name input.
const MAX_NAME_LENGTH: usize = 50;

/// Maximum length for pasted verification/reset tokens.
/// Tokens are opaque URL-safe strings; 128 leaves headroom.
const MAX_TOKEN_LENGTH: usize = 128;

/// Minimum password length, matching the server-side validator.
const MIN_PASSWORD_LENGTH: usize = 8;

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    VerifyEmail,
    ForgotPassword,
    ResetPassword,
    Dashboard,
}

impl Screen {
    /// Get the display title for this screen.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Sign in",
            Screen::Register => "Create account",
            Screen::VerifyEmail => "Verify email",
            Screen::ForgotPassword => "Forgot password",
            Screen::ResetPassword => "Reset password",
            Screen::Dashboard => "Dashboard",
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Sign-in form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Submit,
    Register,
    Forgot,
    Verify,
}

impl LoginField {
    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Submit,
            LoginField::Submit => LoginField::Register,
            LoginField::Register => LoginField::Forgot,
            LoginField::Forgot => LoginField::Verify,
            LoginField::Verify => LoginField::Email,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            LoginField::Email => LoginField::Verify,
            LoginField::Password => LoginField::Email,
            LoginField::Submit => LoginField::Password,
            LoginField::Register => LoginField::Submit,
            LoginField::Forgot => LoginField::Register,
            LoginField::Verify => LoginField::Forgot,
        }
    }
}

/// Registration form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Password,
    PasswordConfirm,
    Submit,
    SignIn,
}

impl RegisterField {
    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            RegisterField::FirstName => RegisterField::LastName,
            RegisterField::LastName => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::PasswordConfirm,
            RegisterField::PasswordConfirm => RegisterField::Submit,
            RegisterField::Submit => RegisterField::SignIn,
            RegisterField::SignIn => RegisterField::FirstName,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            RegisterField::FirstName => RegisterField::SignIn,
            RegisterField::LastName => RegisterField::FirstName,
            RegisterField::Email => RegisterField::LastName,
            RegisterField::Password => RegisterField::Email,
            RegisterField::PasswordConfirm => RegisterField::Password,
            RegisterField::Submit => RegisterField::PasswordConfirm,
            RegisterField::SignIn => RegisterField::Submit,
        }
    }
}

/// Email verification form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyField {
    Email,
    Token,
    Submit,
    Resend,
}

impl VerifyField {
    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            VerifyField::Email => VerifyField::Token,
            VerifyField::Token => VerifyField::Submit,
            VerifyField::Submit => VerifyField::Resend,
            VerifyField::Resend => VerifyField::Email,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            VerifyField::Email => VerifyField::Resend,
            VerifyField::Token => VerifyField::Email,
            VerifyField::Submit => VerifyField::Token,
            VerifyField::Resend => VerifyField::Submit,
        }
    }
}

/// Forgot-password form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgotField {
    Email,
    Submit,
}

impl ForgotField {
    pub fn next(&self) -> Self {
        match self {
            ForgotField::Email => ForgotField::Submit,
            ForgotField::Submit => ForgotField::Email,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Reset-password form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetField {
    Token,
    Password,
    PasswordConfirm,
    Submit,
}

impl ResetField {
    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            ResetField::Token => ResetField::Password,
            ResetField::Password => ResetField::PasswordConfirm,
            ResetField::PasswordConfirm => ResetField::Submit,
            ResetField::Submit => ResetField::Token,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            ResetField::Token => ResetField::Submit,
            ResetField::Password => ResetField::Token,
            ResetField::PasswordConfirm => ResetField::Password,
            ResetField::Submit => ResetField::PasswordConfirm,
        }
    }
}

/// Profile editor focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Save,
}

impl ProfileField {
    pub fn next(&self) -> Self {
        match self {
            ProfileField::FirstName => ProfileField::LastName,
            ProfileField::LastName => ProfileField::Save,
            ProfileField::Save => ProfileField::FirstName,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ProfileField::FirstName => ProfileField::Save,
            ProfileField::LastName => ProfileField::FirstName,
            ProfileField::Save => ProfileField::LastName,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,

    // UI state
    pub state: AppState,
    pub screen: Screen,
    pub status_message: Option<String>,

    // Sign-in form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginField,
    pub login_error: Option<String>,
    pub login_notice: Option<String>,

    // Registration form state
    pub register_first_name: String,
    pub register_last_name: String,
    pub register_email: String,
    pub register_password: String,
    pub register_password_confirm: String,
    pub register_focus: RegisterField,
    pub register_errors: Option<ValidationErrors>,

    // Email verification state
    pub verify_email: String,
    pub verify_token: String,
    pub verify_focus: VerifyField,
    pub verify_error: Option<String>,
    pub verify_notice: Option<String>,
    pub verify_expired: bool,

    // Forgot-password form state
    pub forgot_email: String,
    pub forgot_focus: ForgotField,
    pub forgot_error: Option<String>,

    // Reset-password form state
    pub reset_token: String,
    pub reset_password: String,
    pub reset_password_confirm: String,
    pub reset_focus: ResetField,
    pub reset_error: Option<String>,
    pub reset_notice: Option<String>,

    // Profile editor state
    pub profile_editing: bool,
    pub profile_first_name: String,
    pub profile_last_name: String,
    pub profile_focus: ProfileField,
    pub profile_error: Option<String>,
}

impl App {
    /// Create a new application instance
    pub async fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let server_url = config.server_url();
        debug!(%server_url, "Config loaded");

        let tokens = TokenStore::new(Config::data_dir()?);
        let api = ApiClient::new(&server_url, tokens)?;
        let session = SessionStore::new(api);

        // Prefill the email from the env var or the last sign-in
        let login_email = std::env::var("SIGNET_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Ok(Self {
            config,
            session,

            state: AppState::Normal,
            screen: Screen::Login,
            status_message: None,

            login_email,
            login_password: String::new(),
            login_focus: LoginField::Email,
            login_error: None,
            login_notice: None,

            register_first_name: String::new(),
            register_last_name: String::new(),
            register_email: String::new(),
            register_password: String::new(),
            register_password_confirm: String::new(),
            register_focus: RegisterField::FirstName,
            register_errors: None,

            verify_email: String::new(),
            verify_token: String::new(),
            verify_focus: VerifyField::Token,
            verify_error: None,
            verify_notice: None,
            verify_expired: false,

            forgot_email: String::new(),
            forgot_focus: ForgotField::Email,
            forgot_error: None,

            reset_token: String::new(),
            reset_password: String::new(),
            reset_password_confirm: String::new(),
            reset_focus: ResetField::Token,
            reset_error: None,
            reset_notice: None,

            profile_editing: false,
            profile_first_name: String::new(),
            profile_last_name: String::new(),
            profile_focus: ProfileField::FirstName,
            profile_error: None,
        })
    }

    /// Restore any saved session and pick the starting screen. Runs once
    /// before the first frame so no screen ever renders with the auth
    /// state undecided.
    pub async fn initialize(&mut self) {
        self.session.initialize().await;
        if self.session.is_authenticated() {
            let name = self
                .session
                .user()
                .map(|u| u.greeting_name().to_string())
                .unwrap_or_default();
            self.status_message = Some(format!("Welcome back, {}!", name));
            self.enter_dashboard();
        } else {
            self.show_login();
        }
    }

    // =========================================================================
    // Screen transitions
    // =========================================================================

    /// Show the sign-in screen, clearing any previous result lines.
    pub fn show_login(&mut self) {
        self.screen = Screen::Login;
        self.login_focus = if self.login_email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        self.login_error = None;
        self.login_notice = None;
    }

    pub fn show_register(&mut self) {
        self.screen = Screen::Register;
        self.register_focus = RegisterField::FirstName;
        self.register_errors = None;
    }

    /// Show the verification screen. `verify_email` survives so a resend
    /// after registration does not ask for the address again.
    pub fn show_verify(&mut self) {
        if self.verify_email.is_empty() {
            self.verify_email = self.login_email.clone();
        }
        self.screen = Screen::VerifyEmail;
        self.verify_focus = if self.verify_email.is_empty() {
            VerifyField::Email
        } else {
            VerifyField::Token
        };
        self.verify_error = None;
        self.verify_expired = false;
    }

    pub fn show_forgot(&mut self) {
        self.screen = Screen::ForgotPassword;
        if self.forgot_email.is_empty() {
            self.forgot_email = self.login_email.clone();
        }
        self.forgot_focus = ForgotField::Email;
        self.forgot_error = None;
    }

    pub fn show_reset(&mut self) {
        self.screen = Screen::ResetPassword;
        self.reset_focus = ResetField::Token;
        self.reset_error = None;
    }

    fn enter_dashboard(&mut self) {
        self.seed_profile_form();
        self.profile_editing = false;
        self.profile_error = None;
        self.screen = Screen::Dashboard;
    }

    /// Tear down whatever is left of the session and land on the sign-in
    /// screen with an explanation.
    async fn force_sign_in(&mut self) {
        self.session.logout().await;
        self.show_login();
        self.login_error = Some("Session expired. Please sign in again.".to_string());
    }

    fn seed_profile_form(&mut self) {
        let (first, last) = match self.session.user() {
            Some(user) => (
                user.first_name().unwrap_or_default().to_string(),
                user.last_name().unwrap_or_default().to_string(),
            ),
            None => return,
        };
        self.profile_first_name = first;
        self.profile_last_name = last;
    }

    // =========================================================================
    // Sign in / sign out
    // =========================================================================

    /// Attempt login with the credentials from the sign-in form
    pub async fn attempt_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password are required".to_string());
            return;
        }

        self.login_error = None;
        self.login_notice = None;

        match self.session.login(&email, &password).await {
            Ok(()) => {
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                info!("Login successful");

                let name = self
                    .session
                    .user()
                    .map(|u| u.greeting_name().to_string())
                    .unwrap_or_default();
                self.status_message = Some(format!("Welcome back, {}!", name));
                self.enter_dashboard();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(friendly_error(&e));
            }
        }
    }

    pub async fn sign_out(&mut self) {
        self.session.logout().await;
        info!("Signed out");
        self.status_message = None;
        self.show_login();
        self.login_notice = Some("Signed out.".to_string());
    }

    // =========================================================================
    // Registration and email verification
    // =========================================================================

    /// Attempt registration with the form fields. Local checks mirror the
    /// server rules so obvious rejects never leave the client.
    pub async fn attempt_register(&mut self) {
        let email = self.register_email.trim().to_string();

        if email.is_empty()
            || self.register_password.is_empty()
            || self.register_password_confirm.is_empty()
        {
            self.register_errors = Some(ValidationErrors::single(
                "Email and password are required",
            ));
            return;
        }
        if self.register_password.len() < MIN_PASSWORD_LENGTH {
            self.register_errors = Some(ValidationErrors::single(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
            return;
        }
        if self.register_password != self.register_password_confirm {
            self.register_errors = Some(ValidationErrors::single("Passwords don't match"));
            return;
        }

        self.register_errors = None;

        let request = RegisterRequest {
            email: email.clone(),
            password: self.register_password.clone(),
            password_confirm: self.register_password_confirm.clone(),
            first_name: opt_field(&self.register_first_name),
            last_name: opt_field(&self.register_last_name),
        };

        match self.session.register(&request).await {
            Ok(receipt) => {
                info!(user_id = receipt.user_id, "Registration accepted");
                self.register_password.clear();
                self.register_password_confirm.clear();

                self.verify_email = email;
                self.verify_notice = Some(if receipt.email_sent {
                    receipt.message
                } else {
                    "Account created, but the verification email could not be sent. \
                     Try resending it below."
                        .to_string()
                });
                self.show_verify();
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_errors = Some(form_errors(&e));
            }
        }
    }

    /// Submit a pasted verification token.
    pub async fn attempt_verify(&mut self) {
        let token = self.verify_token.trim().to_string();
        if token.is_empty() {
            self.verify_error = Some("Paste the token from the verification email".to_string());
            return;
        }

        self.verify_error = None;

        match self.session.api().verify_email(&token).await {
            Ok(receipt) => {
                info!("Email verified");
                self.verify_token.clear();
                self.verify_notice = None;
                if !self.verify_email.is_empty() {
                    self.login_email = self.verify_email.clone();
                }
                self.show_login();
                self.login_notice = Some(format!("{} You can now sign in.", receipt.message));
            }
            Err(e) => {
                if let ApiError::Validation(ref errors) = e {
                    self.verify_expired = errors.is_expired_token();
                }
                self.verify_error = Some(friendly_error(&e));
            }
        }
    }

    /// Request a fresh verification email for `verify_email`.
    pub async fn attempt_resend(&mut self) {
        let email = self.verify_email.trim().to_string();
        if email.is_empty() {
            self.verify_error = Some("Enter the email address you registered with".to_string());
            self.verify_focus = VerifyField::Email;
            return;
        }

        self.verify_error = None;

        match self.session.api().resend_verification(&email).await {
            Ok(receipt) => {
                self.verify_expired = false;
                self.verify_token.clear();
                self.verify_notice = Some(receipt.message);
            }
            Err(e) => {
                self.verify_error = Some(friendly_error(&e));
            }
        }
    }

    // =========================================================================
    // Password recovery
    // =========================================================================

    pub async fn attempt_forgot(&mut self) {
        let email = self.forgot_email.trim().to_string();
        if email.is_empty() {
            self.forgot_error = Some("Enter your account email".to_string());
            return;
        }

        self.forgot_error = None;

        match self.session.api().forgot_password(&email).await {
            Ok(receipt) => {
                self.reset_notice = Some(receipt.message);
                self.show_reset();
            }
            Err(e) => {
                self.forgot_error = Some(friendly_error(&e));
            }
        }
    }

    pub async fn attempt_reset(&mut self) {
        let token = self.reset_token.trim().to_string();
        if token.is_empty() {
            self.reset_error = Some("Paste the token from the reset email".to_string());
            return;
        }
        if self.reset_password.is_empty() || self.reset_password_confirm.is_empty() {
            self.reset_error = Some("Enter and confirm your new password".to_string());
            return;
        }
        if self.reset_password.len() < MIN_PASSWORD_LENGTH {
            self.reset_error = Some(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ));
            return;
        }

        self.reset_error = None;

        match self
            .session
            .api()
            .reset_password(&token, &self.reset_password, &self.reset_password_confirm)
            .await
        {
            Ok(receipt) => {
                info!("Password reset complete");
                self.reset_token.clear();
                self.reset_password.clear();
                self.reset_password_confirm.clear();
                self.reset_notice = None;
                self.show_login();
                self.login_notice = Some(format!("{} Sign in below.", receipt.message));
            }
            Err(e) => {
                self.reset_error = Some(friendly_error(&e));
            }
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn start_profile_edit(&mut self) {
        self.seed_profile_form();
        self.profile_editing = true;
        self.profile_focus = ProfileField::FirstName;
        self.profile_error = None;
    }

    pub fn cancel_profile_edit(&mut self) {
        self.profile_editing = false;
        self.profile_error = None;
    }

    /// Push the edited name fields to the server. Both fields are always
    /// sent so clearing a name sticks.
    pub async fn save_profile(&mut self) {
        let update = ProfileUpdate {
            first_name: Some(self.profile_first_name.trim().to_string()),
            last_name: Some(self.profile_last_name.trim().to_string()),
        };

        match self.session.api().update_profile(&update).await {
            Ok(user) => {
                info!("Profile updated");
                self.session.set_user(user);
                self.profile_editing = false;
                self.profile_error = None;
                self.status_message = Some("Profile updated".to_string());
            }
            Err(ApiError::Unauthorized) => {
                self.force_sign_in().await;
            }
            Err(e) => {
                error!(error = %e, "Profile update failed");
                self.profile_error = Some(friendly_error(&e));
            }
        }
    }

    /// Re-fetch the profile. A session that can no longer do that is torn
    /// down and the user is sent back to sign in.
    pub async fn refresh_profile(&mut self) {
        self.session.refresh_auth().await;
        if self.session.is_authenticated() {
            if !self.profile_editing {
                self.seed_profile_form();
            }
            self.status_message = Some(format!(
                "Profile refreshed at {}",
                chrono::Local::now().format("%H:%M:%S")
            ));
        } else {
            self.show_login();
            self.login_error = Some("Session expired. Please sign in again.".to_string());
        }
    }
}

// ============================================================================
// Form helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a name character should be accepted
pub fn can_add_name_char(current_len: usize, c: char) -> bool {
    current_len < MAX_NAME_LENGTH && is_valid_input_char(c)
}

/// Check if a token character should be accepted
pub fn can_add_token_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TOKEN_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Use None for blank optional inputs so they are left off the wire.
fn opt_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Keep field-keyed messages from a rejected form submission so each
/// one can render next to its input; anything else collapses to a
/// single non-field banner.
pub fn form_errors(err: &ApiError) -> ValidationErrors {
    match err {
        ApiError::Validation(errors) => errors.clone(),
        other => ValidationErrors::single(friendly_error(other)),
    }
}

/// Map an API error onto the short line a form can show.
pub fn friendly_error(err: &ApiError) -> String {
    match err {
        ApiError::Validation(errors) => errors.summary(),
        ApiError::Unauthorized => "Session expired. Please sign in again.".to_string(),
        ApiError::Network(e) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        ApiError::Network(e) if e.is_connect() => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        ApiError::Network(_) => "Network error. Please try again.".to_string(),
        ApiError::Server(_) => "Server error. Please try again later.".to_string(),
        ApiError::InvalidResponse(_) => "Unexpected response from server.".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use signet_core::ValidationErrors;

    // -------------------------------------------------------------------------
    // Focus cycle tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_field_cycle() {
        assert_eq!(LoginField::Email.next(), LoginField::Password);
        assert_eq!(LoginField::Verify.next(), LoginField::Email); // Wraps around
        assert_eq!(LoginField::Email.prev(), LoginField::Verify); // Wraps around

        // Walking next() through every field ends up back at the start
        let mut field = LoginField::Email;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, LoginField::Email);
    }

    #[test]
    fn test_register_field_cycle() {
        assert_eq!(RegisterField::FirstName.next(), RegisterField::LastName);
        assert_eq!(RegisterField::SignIn.next(), RegisterField::FirstName);
        assert_eq!(RegisterField::FirstName.prev(), RegisterField::SignIn);

        let mut field = RegisterField::FirstName;
        for _ in 0..7 {
            field = field.next();
        }
        assert_eq!(field, RegisterField::FirstName);
    }

    #[test]
    fn test_reset_field_cycle() {
        let mut field = ResetField::Token;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, ResetField::Token);
        assert_eq!(ResetField::Token.prev(), ResetField::Submit);
    }

    // -------------------------------------------------------------------------
    // Input validation tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        // Exceeds max length
        assert!(!can_add_email_char(254, 'a'));
        // Whitespace and control characters rejected
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
        assert!(!can_add_email_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(0, ' ')); // Passphrases may contain spaces
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_token_char() {
        assert!(can_add_token_char(0, 'f'));
        assert!(can_add_token_char(0, '-'));
        assert!(!can_add_token_char(128, 'f'));
        assert!(!can_add_token_char(0, ' '));
    }

    // -------------------------------------------------------------------------
    // Helper tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_opt_field_blank_is_none() {
        assert_eq!(opt_field(""), None);
        assert_eq!(opt_field("   "), None);
        assert_eq!(opt_field(" Ada "), Some("Ada".to_string()));
    }

    #[test]
    fn test_form_errors_keep_field_keys() {
        let err = ApiError::Validation(ValidationErrors::parse(
            r#"{"email": ["Enter a valid email address."],
                "password": ["This password is too common."],
                "non_field_errors": ["Fix the fields below"]}"#,
        ));
        let errors = form_errors(&err);
        assert_eq!(errors.field("email"), Some("Enter a valid email address."));
        assert_eq!(errors.field("password"), Some("This password is too common."));
        assert_eq!(errors.non_field(), Some("Fix the fields below"));
    }

    #[test]
    fn test_form_errors_collapse_non_validation_failures() {
        let errors = form_errors(&ApiError::Server("stack trace".to_string()));
        assert_eq!(errors.field("email"), None);
        assert_eq!(
            errors.non_field(),
            Some("Server error. Please try again later.")
        );
    }

    #[test]
    fn test_friendly_error_passes_validation_summary_through() {
        let err = ApiError::Validation(ValidationErrors::single("Invalid credentials"));
        assert_eq!(friendly_error(&err), "Invalid credentials");
    }

    #[test]
    fn test_friendly_error_hides_internals() {
        let err = ApiError::Server("stack trace goes here".to_string());
        assert_eq!(friendly_error(&err), "Server error. Please try again later.");

        let err = ApiError::Unauthorized;
        assert_eq!(friendly_error(&err), "Session expired. Please sign in again.");

        let err = ApiError::InvalidResponse("not json".to_string());
        assert_eq!(friendly_error(&err), "Unexpected response from server.");
    }
}
