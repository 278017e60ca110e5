use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account record returned by the login and profile endpoints.
///
/// `first_name`/`last_name` come back as empty strings when the user
/// never set them, so the helpers below treat blank and absent alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// "First Last", first name alone, or the email local part.
    pub fn display_name(&self) -> String {
        match (self.first_name(), self.last_name()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }

    /// Name used in greetings, falling back to the full email.
    pub fn greeting_name(&self) -> &str {
        self.first_name().unwrap_or(&self.email)
    }

    /// Single character for the avatar badge.
    pub fn initial(&self) -> char {
        self.first_name()
            .unwrap_or(&self.email)
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    pub fn member_since(&self) -> Option<String> {
        self.created_at
            .map(|dt| dt.format("%B %-d, %Y").to_string())
    }
}
