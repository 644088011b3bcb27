//! Error types for presale-admin

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'presale-admin init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Could not reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API Error: {status} {status_text}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Login failed: {0}")]
    LoginRejected(String),

    #[error("Not logged in. Run 'presale-admin login' first.")]
    NotAuthenticated,

    #[error("No stored session to refresh")]
    NoStoredSession,

    #[error("No credentials available to refresh the session")]
    MissingCredentials,

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        let err = Error::Api {
            status: 401,
            status_text: "Unauthorized".to_string(),
            body: String::new(),
        };
        assert!(err.is_unauthorized());

        let err = Error::Api {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: String::new(),
        };
        assert!(!err.is_unauthorized());
        assert!(!Error::SessionExpired.is_unauthorized());
    }

    #[test]
    fn test_api_error_message_carries_status() {
        let err = Error::Api {
            status: 403,
            status_text: "Forbidden".to_string(),
            body: "{}".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 403 Forbidden");
    }
}
