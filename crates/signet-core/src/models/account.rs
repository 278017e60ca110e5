use serde::{Deserialize, Serialize};

use crate::models::User;

/// Payload for the registration endpoint. Optional names are omitted
/// from the body entirely rather than sent as empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Successful registration. The account stays unusable until the
/// emailed verification link is followed.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterReceipt {
    pub message: String,
    pub user_id: i64,
    pub email_sent: bool,
}

/// Successful login: the token pair plus the signed-in user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Generic `{message}` acknowledgement used by the verification,
/// password, and logout endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReceipt {
    pub message: String,
}

/// Partial profile update; only the provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}
