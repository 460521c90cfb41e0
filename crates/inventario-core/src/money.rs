//! # Money Module
//!
//! Provides the `Money` type for prices, the `Quantity` type for stock and
//! batch amounts, and the `ExchangeRate` type for the dollar quote captured
//! with every lote.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The forms send prices and quantities as text: "12.50", "12,5", "2.5"  │
//! │  The quote API sends the rate as a float:  13.57                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer hundredths, converted ONCE at the boundary      │
//! │    "12,5"  ──► Money(1250)                                             │
//! │    "2.5"   ──► Quantity(250)                                           │
//! │    13.57   ──► ExchangeRate(1357)                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventario_core::money::{ExchangeRate, Money};
//!
//! let price = Money::from_decimal_str("12,5").unwrap();
//! assert_eq!(price.cents(), 1250);
//!
//! let rate = ExchangeRate::from_quote(13.57).unwrap();
//! assert_eq!(rate.hundredths(), 1357);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ProductForm.sell_price ("12.50") ──► Money ──► productos.precio_venta (1250)
/// LineDraft.purchase_price ("3")   ──► Money ──► lote_producto.precio_compra
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit part (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the absolute cents part (0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal amount as typed into a form field.
    ///
    /// ## Accepted Input
    /// - `"7"`, `"7.5"`, `"7.50"`, `"7,50"`, `".5"`, `"-3.25"`
    /// - Surrounding whitespace is ignored
    ///
    /// ## Returns
    /// `None` for empty input, non-digit characters, or more than two
    /// decimal places. Sign checks are left to the caller.
    ///
    /// ## Example
    /// ```rust
    /// use inventario_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_str("12.50"), Some(Money::from_cents(1250)));
    /// assert_eq!(Money::from_decimal_str("1.005"), None);
    /// ```
    pub fn from_decimal_str(input: &str) -> Option<Money> {
        parse_hundredths(input).map(Money)
    }
}

/// Shared fixed-point parser behind every two-decimal type in this module.
fn parse_hundredths(input: &str) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    let (negative, digits) = match normalized.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, normalized.as_str()),
    };

    let (major, minor) = digits.split_once('.').unwrap_or((digits, ""));

    if major.is_empty() && minor.is_empty() {
        return None;
    }
    if minor.len() > 2 {
        return None;
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(major) || !all_digits(minor) {
        return None;
    }

    let major: i64 = if major.is_empty() { 0 } else { major.parse().ok()? };
    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().ok()? * 10,
        _ => minor.parse().ok()?,
    };

    let hundredths = major.checked_mul(100)?.checked_add(minor)?;
    Some(if negative { -hundredths } else { hundredths })
}

fn fmt_hundredths(value: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    write!(f, "{}{}.{:02}", sign, (value / 100).abs(), (value % 100).abs())
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for Money {
    /// Formats as a plain decimal amount: `"12.50"`, `"-3.05"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// A stock or batch quantity in hundredths of a unit.
///
/// Products are counted in whatever unit the owner uses (bags, kilos,
/// litres), so `"2.5"` and `"0,75"` are valid quantities. `2.5` is stored as
/// `250`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    /// Whole units, for seed data and tests.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 100)
    }

    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Same input rules as [`Money::from_decimal_str`].
    pub fn from_decimal_str(input: &str) -> Option<Quantity> {
        parse_hundredths(input).map(Quantity)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// Dollar quote in hundredths of the local currency.
///
/// A quote of `13.57` is stored as `1357`. The gateway's float is rounded
/// exactly once, in [`ExchangeRate::from_quote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(i64);

impl ExchangeRate {
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        ExchangeRate(hundredths)
    }

    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// Converts the remote quote's `venta` value.
    ///
    /// The quote is rounded half away from zero to two decimals, the
    /// precision of `lote_producto.precio_dolar`. Returns `None` for
    /// non-finite quotes and for quotes that round to zero or below.
    pub fn from_quote(value: f64) -> Option<ExchangeRate> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let hundredths = (value * 100.0).round();
        if hundredths < 1.0 || hundredths > i64::MAX as f64 {
            return None;
        }
        Some(ExchangeRate(hundredths as i64))
    }

    /// Parses a rate typed by the user (same rules as [`Money::from_decimal_str`]).
    pub fn from_decimal_str(input: &str) -> Option<ExchangeRate> {
        parse_hundredths(input).map(ExchangeRate)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
