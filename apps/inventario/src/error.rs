//! # API Error Type
//!
//! Unified error type returned by every service.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Inventario                             │
//! │                                                                         │
//! │  Screen                      Rust Services                              │
//! │  ──────                      ─────────────                              │
//! │                                                                         │
//! │  credentials.login(...)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │                                                                  │  │
//! │  │  ValidationError ─┐                                              │  │
//! │  │  CoreError ───────┤                                              │  │
//! │  │  DbError ─────────┼──► ApiError { code, message } ──────────────►│  │
//! │  │  GatewayError ────┤      (internal detail logged, not returned)  │  │
//! │  │  SessionError ────┘                                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  switch (e.code) { case 'USER_NOT_FOUND': ... }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::config::ConfigError;
use crate::exchange::GatewayError;
use crate::session::SessionError;
use inventario_core::{CoreError, ValidationError};
use inventario_db::DbError;

/// Error returned from services.
///
/// ## Serialization
/// ```json
/// {
///   "code": "DUPLICATE_EMAIL",
///   "message": "An account already exists for ana@example.com"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The local store could not be opened or reached
    StoreUnavailable,

    /// Form input rejected before any store or network call
    ValidationError,

    /// Registration with an email that already has an account
    DuplicateEmail,

    /// Login with an unknown email
    UserNotFound,

    /// Login with a wrong password
    InvalidCredentials,

    /// Operation needs a logged-in user
    NotAuthenticated,

    /// Exchange-rate quote could not be fetched
    GatewayUnavailable,

    /// Lote commit failed; nothing was written
    CommitFailed,

    /// Row not found
    NotFound,

    /// Other database failure
    DatabaseError,

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

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint failed: {}", message);
                ApiError::validation("Value out of range")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::StoreUnavailable, "Database unavailable")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::StoreUnavailable, "Database unavailable")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::CommitFailed, "Could not save, nothing was changed")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::FileRemoval { path, message } => {
                tracing::error!(%path, "Store file removal failed: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Could not reset the database")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::DuplicateEmail { .. } => ApiError::new(ErrorCode::DuplicateEmail, message),
            CoreError::UserNotFound { .. } => ApiError::new(ErrorCode::UserNotFound, message),
            CoreError::InvalidCredentials => ApiError::new(ErrorCode::InvalidCredentials, message),
            CoreError::NotAuthenticated => ApiError::new(ErrorCode::NotAuthenticated, message),
            CoreError::WrongStep { .. } => ApiError::validation(message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        tracing::error!("Exchange-rate gateway failed: {}", err);
        ApiError::new(
            ErrorCode::GatewayUnavailable,
            "Exchange rate unavailable, try again",
        )
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Session storage failed: {}", err);
        ApiError::internal("Session storage failed")
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::internal(format!("Invalid configuration: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_hide_detail() {
        let err: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));

        let err: ApiError = DbError::ConnectionFailed("unable to open".into()).into();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);

        let err: ApiError = DbError::TransactionFailed("FOREIGN KEY".into()).into();
        assert_eq!(err.code, ErrorCode::CommitFailed);
    }

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "email".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "email is required");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::new(ErrorCode::UserNotFound, "No account found for a@b.co");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "USER_NOT_FOUND");
        assert_eq!(json["message"], "No account found for a@b.co");
    }
}
