//! # Error Types
//!
//! Domain-specific error types for inventario-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventario-core errors (this file)                                    │
//! │  ├── CoreError        - Credential and wizard rule violations          │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  inventario-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  App errors                                                             │
//! │  └── ApiError         - What the screens see (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Screen       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule errors.
///
/// These are raised by the services after validation passed but the request
/// still cannot be honoured.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Registration attempted with an email that already has an account.
    #[error("An account already exists for {email}")]
    DuplicateEmail { email: String },

    /// Login attempted with an email that has no account.
    #[error("No account found for {email}")]
    UserNotFound { email: String },

    /// Password digest did not match the stored one.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An operation needing a logged-in user ran without a session.
    #[error("No user is logged in")]
    NotAuthenticated,

    /// The lote wizard was asked to do something its current step forbids.
    ///
    /// ## When This Occurs
    /// - Staging a line while still on the header step
    /// - Advancing from the lines step
    #[error("Operation requires the {expected} step, wizard is on {current}")]
    WrongStep { expected: String, current: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form input doesn't meet requirements and are always
/// raised before any store or network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field must have exactly this many digits.
    #[error("{field} must have exactly {len} digits")]
    ExactDigits { field: String, len: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad email, unparseable date or amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// Positional index beyond the end of a list.
    #[error("{field} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateEmail {
            email: "ana@example.com".to_string(),
        };
        assert_eq!(err.to_string(), "An account already exists for ana@example.com");

        let err = CoreError::WrongStep {
            expected: "lines".to_string(),
            current: "header".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Operation requires the lines step, wizard is on header"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::ExactDigits {
            field: "phone".to_string(),
            len: 8,
        };
        assert_eq!(err.to_string(), "phone must have exactly 8 digits");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "end date".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
