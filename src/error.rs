use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while talking to the Catalog API or loading local settings.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API error: {0}")]
    Status(StatusCode),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Classify a transport error, keeping timeouts distinct from other failures.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(timeout)
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Transport(err)
        }
    }

    /// Get a hint for how the user can recover, if there is one.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            CatalogError::Status(s) if *s == StatusCode::UNAUTHORIZED || *s == StatusCode::FORBIDDEN => {
                Some("Session rejected. Press c to start a new session")
            }
            CatalogError::Status(s) if s.is_server_error() => {
                Some("The catalog service is failing. Try again in a moment")
            }
            CatalogError::Timeout(_) | CatalogError::Transport(_) => {
                Some("Check your internet connection and try again")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_includes_code_and_reason() {
        let err = CatalogError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "API error: 500 Internal Server Error");
    }

    #[test]
    fn test_timeout_message() {
        let err = CatalogError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Request timed out after 10s");
    }

    #[test]
    fn test_recovery_hint() {
        let unauthorized = CatalogError::Status(StatusCode::UNAUTHORIZED);
        assert!(unauthorized.recovery_hint().unwrap().contains("new session"));

        let missing = CatalogError::Status(StatusCode::NOT_FOUND);
        assert!(missing.recovery_hint().is_none());

        let timeout = CatalogError::Timeout(Duration::from_secs(1));
        assert!(timeout.recovery_hint().is_some());
    }
}
