//! # Client Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reqwest::Error ─────────► ClientError::Transport                       │
//! │  status != expected ─────► ClientError::UnexpectedStatus                │
//! │  body not the JSON we need ► ClientError::Decode / MissingData          │
//! │  empty credit document ──► ClientError::InvalidHtml                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Bridge ApiError: generic user message, details in the log             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from the remote API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, refused, timeout, TLS).
    #[error("Failed to connect to the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status the endpoint does not accept.
    #[error("Unexpected response: {status}")]
    UnexpectedStatus { status: u16, body: String },

    /// The body was not the JSON shape the endpoint returns.
    #[error("Could not read server response: {0}")]
    Decode(String),

    /// A success status without the `data` object.
    #[error("{}", message.as_deref().unwrap_or("Server response did not include data"))]
    MissingData { message: Option<String> },

    /// The credit document was empty or not text.
    #[error("Invalid HTML response")]
    InvalidHtml,

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// True when the server was never reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_prefers_server_message() {
        let err = ClientError::MissingData {
            message: Some("Customer not found".to_string()),
        };
        assert_eq!(err.to_string(), "Customer not found");

        let err = ClientError::MissingData { message: None };
        assert_eq!(err.to_string(), "Server response did not include data");
    }

    #[test]
    fn test_status_message() {
        let err = ClientError::UnexpectedStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected response: 500");
        assert!(!err.is_connection());
    }
}
