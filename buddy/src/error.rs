use thiserror::Error;

use crate::split::SplitError;

/// Message shown to the user when a failure carries no server-supplied text.
pub const NETWORK_ERROR: &str = "Network Error!";

#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token error: {0}")]
    Token(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("split error: {0}")]
    Split(#[from] SplitError),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error("config error: {0}")]
    Config(String),

    #[error("amount overflow in {0}")]
    Overflow(&'static str),
}

impl BuddyError {
    /// Text suitable for showing to the user.
    ///
    /// Server-supplied error strings and local validation failures are shown
    /// verbatim; everything else collapses to [`NETWORK_ERROR`].
    pub fn user_message(&self) -> String {
        match self {
            BuddyError::Api { message, .. } => message.clone(),
            BuddyError::Validation(message) => message.clone(),
            BuddyError::Split(e) => e.to_string(),
            _ => NETWORK_ERROR.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuddyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_server_text() {
        let err = BuddyError::Api {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_http_error_without_server_text_falls_back() {
        let err = BuddyError::Http {
            status: 502,
            message: "<html>bad gateway</html>".into(),
        };
        assert_eq!(err.user_message(), NETWORK_ERROR);
    }

    #[test]
    fn test_validation_error_is_shown_inline() {
        let err = BuddyError::Validation("amount must be positive".into());
        assert_eq!(err.user_message(), "amount must be positive");
    }
}
