//! # API Error Type
//!
//! Unified error type for bridge commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Khata                                  │
//! │                                                                         │
//! │  UI shell                    Bridge                                     │
//! │  ────────                    ──────                                     │
//! │                                                                         │
//! │  {"command":"save_invoice"}                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ─── CoreError::NoCustomerSelected ───┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Network? ─── ClientError::Transport ──────────► ApiError ──────►│  │
//! │  │         │        (details logged, generic message)               │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── {"id":4,"error":{"code":"VALIDATION_ERROR",                       │
//! │                       "message":"No customer selected."}}               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Network failures never leak transport details to the user. The full
//! error goes to the log and the response carries a fixed message for the
//! action that failed.

use serde::Serialize;
use thiserror::Error;

use khata_client::ClientError;
use khata_core::CoreError;
use khata_db::DbError;

/// Shown when the server could not be reached at all.
pub const CONNECT_FAILED: &str = "Failed to connect to the server.";

/// API error returned from bridge commands.
///
/// ## Serialization
/// This is what the UI shell receives when a command fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Phone number has invalid format: must be exactly 10 digits"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for bridge responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed; nothing was sent
    ValidationError,

    /// Local cache operation failed
    DatabaseError,

    /// A draft edit could not be applied
    DraftError,

    /// The remote API could not be reached or rejected the request
    NetworkError,

    /// The request line was not a valid bridge request
    InvalidRequest,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Converts a client error, using `failure` as the message for a
    /// request the server answered but rejected.
    ///
    /// ```rust,ignore
    /// client.submit_invoice(&payload)
    ///     .await
    ///     .map_err(|e| ApiError::remote(e, "Failed to save invoice."))?;
    /// ```
    pub fn remote(err: ClientError, failure: &str) -> Self {
        tracing::error!(error = %err, "Remote request failed");
        match err {
            ClientError::Transport(_) => ApiError::new(ErrorCode::NetworkError, CONNECT_FAILED),
            ClientError::UnexpectedStatus { .. } | ClientError::Decode(_) => {
                ApiError::new(ErrorCode::NetworkError, failure)
            }
            err @ (ClientError::MissingData { .. } | ClientError::InvalidHtml) => {
                ApiError::new(ErrorCode::NetworkError, err.to_string())
            }
            ClientError::InvalidUrl(_) => ApiError::internal("The API URL is not configured correctly"),
        }
    }
}

/// Converts client errors with the generic connection message.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::remote(err, CONNECT_FAILED)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { key } => ApiError::not_found("Cache entry", &key),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Serialization(e) => {
                tracing::error!("Cached payload unreadable: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Cached form data is unreadable")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            err @ (CoreError::RowOutOfRange { .. } | CoreError::CustomerLocked) => {
                ApiError::new(ErrorCode::DraftError, err.to_string())
            }
            err @ (CoreError::NoCustomerSelected | CoreError::AmountOverflow) => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<khata_core::ValidationError> for ApiError {
    fn from(err: khata_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Errors that stop the bridge before it can serve requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    #[error("No usable data directory; set KHATA_DB_PATH")]
    NoDataDir,

    #[error("Database unavailable: {0}")]
    Database(#[from] DbError),

    #[error("API client could not be built: {0}")]
    Client(#[from] ClientError),

    #[error("stdio failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::error::Section;

    #[test]
    fn test_error_code_serialization() {
        let err = ApiError::validation("Customer name is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Customer name is required");
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::NoCustomerSelected.into();
        assert_eq!(err, ApiError::validation("No customer selected."));

        let err: ApiError = CoreError::AmountOverflow.into();
        assert_eq!(err, ApiError::validation("Amount is too large to calculate"));

        let err: ApiError = CoreError::row_out_of_range(Section::Tax, 3, 1).into();
        assert_eq!(err.code, ErrorCode::DraftError);

        let err: ApiError = CoreError::Validation(khata_core::ValidationError::required("Firm name")).into();
        assert_eq!(err.message, "Firm name is required");
    }

    #[test]
    fn test_remote_errors_use_generic_messages() {
        let err = ApiError::remote(
            ClientError::UnexpectedStatus {
                status: 500,
                body: "stack trace".to_string(),
            },
            "Failed to save invoice.",
        );
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, "Failed to save invoice.");

        let err: ApiError = ClientError::MissingData {
            message: Some("Customer not found".to_string()),
        }
        .into();
        assert_eq!(err.message, "Customer not found");

        let err: ApiError = ClientError::InvalidHtml.into();
        assert_eq!(err.message, "Invalid HTML response");
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }
}
