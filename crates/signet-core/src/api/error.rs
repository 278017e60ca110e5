use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Unauthorized - session is no longer valid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Body keys that carry a message about the whole request rather than a
/// single field.
const NON_FIELD_KEYS: &[&str] = &["non_field_errors", "error", "detail"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut backs up to a char boundary so multibyte text never
    /// splits mid-character.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            400..=499 => ApiError::Validation(ValidationErrors::parse(body)),
            500..=599 => ApiError::Server(Self::truncate_body(body)),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, Self::truncate_body(body))),
        }
    }
}

/// Field-keyed messages from a rejected request, normalized from the
/// shapes the backend actually produces:
///
/// - `{"email": ["Enter a valid email address."]}`
/// - `{"non_field_errors": ["Invalid credentials"]}`
/// - `{"error": "Invalid verification token"}`
/// - `{"detail": "Token is invalid or expired"}`
///
/// Field order follows the parsed body so screens can render messages
/// next to the inputs they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

/// Pseudo-field under which whole-request messages are filed.
const NON_FIELD: &str = "non_field";

impl ValidationErrors {
    pub fn parse(body: &str) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        let mut push = |key: &str, message: String| {
            if message.is_empty() {
                return;
            }
            match entries.iter_mut().find(|(k, _)| k == key) {
                Some((_, messages)) => messages.push(message),
                None => entries.push((key.to_string(), vec![message])),
            }
        };

        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => {
                for (key, value) in map {
                    // Machine-readable discriminators, not messages
                    if key == "code" {
                        continue;
                    }
                    let field = if NON_FIELD_KEYS.contains(&key.as_str()) {
                        NON_FIELD
                    } else {
                        key.as_str()
                    };
                    match value {
                        serde_json::Value::String(s) => push(field, s),
                        serde_json::Value::Array(items) => {
                            for item in items {
                                match item {
                                    serde_json::Value::String(s) => push(field, s),
                                    other => push(field, other.to_string()),
                                }
                            }
                        }
                        other => push(field, other.to_string()),
                    }
                }
            }
            Ok(serde_json::Value::String(s)) => push(NON_FIELD, s),
            _ => push(NON_FIELD, ApiError::truncate_body(body)),
        }

        Self { entries }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            entries: vec![(NON_FIELD.to_string(), vec![message.into()])],
        }
    }

    /// First message attached to the given input field, if any.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// First message about the request as a whole (login failures,
    /// invalid links), if any.
    pub fn non_field(&self) -> Option<&str> {
        self.field(NON_FIELD)
    }

    /// One line for status bars: the non-field message if present,
    /// otherwise the first field message.
    pub fn summary(&self) -> String {
        self.non_field()
            .or_else(|| {
                self.entries
                    .first()
                    .and_then(|(_, messages)| messages.first())
                    .map(String::as_str)
            })
            .unwrap_or("Request rejected")
            .to_string()
    }

    /// All messages, paired with the field they belong to.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, messages)| {
            messages.iter().map(move |m| (key.as_str(), m.as_str()))
        })
    }

    /// Whether any message describes an expired link token. The backend
    /// only marks expiry in the message text, so this matches on the
    /// word itself.
    pub fn is_expired_token(&self) -> bool {
        self.iter()
            .any(|(_, message)| message.to_lowercase().contains("expired"))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_keyed_errors() {
        let errors = ValidationErrors::parse(
            r#"{"email": ["Enter a valid email address."], "password": ["This field is required."]}"#,
        );
        assert_eq!(errors.field("email"), Some("Enter a valid email address."));
        assert_eq!(errors.field("password"), Some("This field is required."));
        assert_eq!(errors.non_field(), None);
    }

    #[test]
    fn test_parse_non_field_errors() {
        let errors = ValidationErrors::parse(r#"{"non_field_errors": ["Invalid credentials"]}"#);
        assert_eq!(errors.non_field(), Some("Invalid credentials"));
        assert_eq!(errors.summary(), "Invalid credentials");
    }

    #[test]
    fn test_parse_error_key() {
        let errors = ValidationErrors::parse(r#"{"error": "Invalid verification token"}"#);
        assert_eq!(errors.non_field(), Some("Invalid verification token"));
    }

    #[test]
    fn test_parse_detail_skips_code() {
        let errors = ValidationErrors::parse(
            r#"{"detail": "Token is invalid or expired", "code": "token_not_valid"}"#,
        );
        assert_eq!(errors.non_field(), Some("Token is invalid or expired"));
        // "code" must not surface as a message
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_parse_plain_text_body() {
        let errors = ValidationErrors::parse("upstream timeout");
        assert_eq!(errors.summary(), "upstream timeout");
    }

    #[test]
    fn test_expired_token_detection() {
        let expired = ValidationErrors::parse(r#"{"error": "Verification token has expired"}"#);
        assert!(expired.is_expired_token());

        let invalid = ValidationErrors::parse(r#"{"error": "Invalid verification token"}"#);
        assert!(!invalid.is_expired_token());
    }

    #[test]
    fn test_summary_falls_back_to_field_message() {
        let errors = ValidationErrors::parse(r#"{"email": ["Enter a valid email address."]}"#);
        assert_eq!(errors.summary(), "Enter a valid email address.");
    }

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::BAD_REQUEST, r#"{"error": "nope"}"#),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::Server(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::MULTIPLE_CHOICES, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(600);
        let ApiError::Server(message) =
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body)
        else {
            panic!("expected server error");
        };
        assert!(message.contains("truncated"));
        assert!(message.contains("600 total bytes"));
    }

    #[test]
    fn test_truncate_multibyte_body_on_char_boundary() {
        // 200 three-byte chars put the cut mid-character
        let body = "€".repeat(200);
        let ApiError::Server(message) =
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body)
        else {
            panic!("expected server error");
        };
        assert!(message.contains("truncated"));
        assert!(message.contains("600 total bytes"));

        // The non-JSON 4xx fallback truncates through the same path
        let errors = ValidationErrors::parse(&body);
        assert!(errors.summary().contains("truncated"));
    }
}
