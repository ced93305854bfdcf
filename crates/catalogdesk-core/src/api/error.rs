use reqwest::StatusCode;
use thiserror::Error;

/// Message used when a failed response carries no readable `message` field.
pub const FALLBACK_MESSAGE: &str = "API Error";

/// Shown for transport failures, where the server never answered.
const NETWORK_MESSAGE: &str = "Unable to connect to server. Check your internet connection.";

/// Maximum length for response bodies echoed into logs
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status. Displays as the server-supplied message.
    #[error("{message}")]
    Status { code: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build the error for a non-success response.
    ///
    /// The message is the body's `message` field when the body is a JSON
    /// object carrying a string there, otherwise [`FALLBACK_MESSAGE`].
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        ApiError::Status {
            code: status.as_u16(),
            message,
        }
    }

    /// HTTP status code, for errors that came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Text suitable for showing to the user in a page view
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_server_message() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, br#"{"message":"Invalid credentials"}"#);
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_from_status_falls_back_without_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, b"<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_from_status_falls_back_without_message_field() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, br#"{"error":"missing"}"#);
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);

        // Non-string message is treated as absent
        let err = ApiError::from_status(StatusCode::NOT_FOUND, br#"{"message":42}"#);
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_is_unauthorized() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, br#"{"message":"Token Expired!"}"#);
        assert!(err.is_unauthorized());
        assert!(!ApiError::Decode("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");

        let long = "a".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"a".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("({} total bytes)", long.len())));
    }
}
