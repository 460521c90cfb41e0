//! # Validation Module
//!
//! Form field validation for Inventario.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen                                                        │
//! │  └── Raw text from inputs (prices and dates arrive as strings)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (Rust)                                               │
//! │  └── THIS MODULE: parse + business rules, BEFORE any store/network    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventario_core::validation::{validate_email, parse_amount};
//!
//! validate_email("ana@example.com").unwrap();
//! assert_eq!(parse_amount("price", "12,50").unwrap().cents(), 1250);
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{ExchangeRate, Money, Quantity};
use crate::{MIN_PASSWORD_LEN, PHONE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is present.
///
/// ## Returns
/// The trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - `something@something.something`, no whitespace
///
/// ## Example
/// ```rust
/// use inventario_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@example").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email)?;

    let well_formed = !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain
                        .char_indices()
                        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
            }
            None => false,
        };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(email)
}

/// Validates a new password.
///
/// ## Rules
/// - Must not be empty
/// - At least [`MIN_PASSWORD_LEN`] characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Checks the confirmation field against the password.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult<()> {
    if password != confirmation {
        return Err(ValidationError::Mismatch {
            field: "password confirmation".to_string(),
            other: "password".to_string(),
        });
    }
    Ok(())
}

/// Validates a phone number and returns it as an integer.
///
/// Non-digit characters (spaces, dashes) are dropped first, the same way
/// the phone input filters keystrokes.
///
/// ## Example
/// ```rust
/// use inventario_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("7123-4567").unwrap(), 71234567);
/// assert!(validate_phone("123").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<i64> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if digits.len() != PHONE_DIGITS {
        return Err(ValidationError::ExactDigits {
            field: "phone".to_string(),
            len: PHONE_DIGITS,
        });
    }

    digits.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "phone".to_string(),
        reason: "must be numeric".to_string(),
    })
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = validate_required("name", name)?;

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a non-negative money amount from form text.
///
/// ## Rules
/// - Must not be empty
/// - Decimal with at most two places (`,` or `.` separator)
/// - Must be >= 0
pub fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    validate_required(field, input)?;

    let amount = Money::from_decimal_str(input).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number with at most two decimals".to_string(),
    })?;

    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(amount)
}

/// Parses a non-negative quantity from form text.
///
/// ## Rules
/// - Up to two decimals, `.` or `,` as separator (`"2.5"`, `"0,75"`)
/// - Must be >= 0
pub fn parse_quantity(field: &str, input: &str) -> ValidationResult<Quantity> {
    let input = validate_required(field, input)?;

    let qty = Quantity::from_decimal_str(&input).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number with at most two decimals".to_string(),
    })?;

    if qty.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(qty)
}

/// Like [`parse_quantity`], but blank input means zero.
pub fn parse_optional_quantity(field: &str, input: &str) -> ValidationResult<Quantity> {
    if input.trim().is_empty() {
        return Ok(Quantity::zero());
    }
    parse_quantity(field, input)
}

/// Validates a non-negative price in cents.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a strictly positive value (lote line quantity, price, rate).
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Parses an exchange rate typed by the user; must be > 0.
pub fn parse_exchange_rate(field: &str, input: &str) -> ValidationResult<ExchangeRate> {
    validate_required(field, input)?;

    let rate =
        ExchangeRate::from_decimal_str(input).ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number with at most two decimals".to_string(),
        })?;

    validate_positive(field, rate.hundredths())?;
    Ok(rate)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date.
///
/// ## Example
/// ```rust
/// use inventario_core::validation::parse_date;
///
/// assert!(parse_date("end date", "2025-01-01").is_ok());
/// assert!(parse_date("end date", "01/01/2025").is_err());
/// ```
pub fn parse_date(field: &str, input: &str) -> ValidationResult<NaiveDate> {
    let input = validate_required(field, input)?;

    NaiveDate::parse_from_str(&input, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a date as YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("  ana@mail.example.bo ").is_ok());
        assert!(validate_email("a@b.c").is_ok());

        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("ana").is_err());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@.com").is_err());
        assert!(validate_email("ana@example.").is_err());
        assert!(validate_email("an a@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
    }

    #[test]
    fn test_validate_password_confirmation() {
        assert!(validate_password_confirmation("secret", "secret").is_ok());
        assert!(validate_password_confirmation("secret", "secreT").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("71234567").unwrap(), 71234567);
        assert_eq!(validate_phone("7 123 45 67").unwrap(), 71234567);
        assert!(validate_phone("").is_err());
        assert!(validate_phone("7123456").is_err());
        assert!(validate_phone("712345678").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("  Arroz 1kg ").unwrap(), "Arroz 1kg");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("price", "0").unwrap(), Money::zero());
        assert_eq!(parse_amount("price", "12,5").unwrap().cents(), 1250);
        assert!(matches!(
            parse_amount("price", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount("price", "-1"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_amount("price", "1.234"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_quantity() {
        let hundredths = |input: &str| parse_quantity("quantity", input).map(|q| q.hundredths());
        assert_eq!(hundredths("10").unwrap(), 1000);
        assert_eq!(hundredths("0").unwrap(), 0);
        assert_eq!(hundredths("2.5").unwrap(), 250);
        assert_eq!(hundredths(" 0,75 ").unwrap(), 75);
        assert!(matches!(hundredths("-2"), Err(ValidationError::OutOfRange { .. })));
        assert!(matches!(hundredths("1.125"), Err(ValidationError::InvalidFormat { .. })));
        assert!(hundredths("").is_err());
        assert_eq!(parse_optional_quantity("min stock", "").unwrap(), Quantity::zero());
        assert_eq!(
            parse_optional_quantity("min stock", "4").unwrap(),
            Quantity::from_units(4)
        );
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("quantity", 1).is_ok());
        assert!(validate_positive("quantity", 0).is_err());
        assert!(validate_price_cents("price", 0).is_ok());
        assert!(validate_price_cents("price", -1).is_err());
    }

    #[test]
    fn test_parse_exchange_rate() {
        assert_eq!(parse_exchange_rate("rate", "6.96").unwrap().hundredths(), 696);
        assert!(parse_exchange_rate("rate", "0").is_err());
        assert!(parse_exchange_rate("rate", "abc").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("end date", "2025-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(matches!(
            parse_date("end date", " "),
            Err(ValidationError::Required { .. })
        ));
        assert!(parse_date("end date", "2025-13-01").is_err());
    }
}
