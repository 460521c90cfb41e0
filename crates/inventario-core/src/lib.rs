//! # inventario-core: Pure Domain Logic for Inventario
//!
//! Types, money, form validation and the lote (batch) wizard, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventario Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile screens                               │   │
//! │  │    Login ──► Products (infinite scroll) ──► Add Lote wizard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    inventario-app services                      │   │
//! │  │    CredentialService, ProductCatalog, LoteWorkflow              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ inventario-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   lote    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Wizard   │  │   forms   │  │   │
//! │  │   │   Lote    │  │ ExchRate  │  │  Draft    │  │   dates   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 inventario-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Lote, Session, ...)
//! - [`money`] - Integer money and exchange-rate values
//! - [`error`] - Domain error types
//! - [`validation`] - Form field validation
//! - [`lote`] - Two-step lote intake wizard
//!
//! ## Example Usage
//!
//! ```rust
//! use inventario_core::money::Money;
//!
//! let price = Money::from_decimal_str("12.50").unwrap();
//! assert_eq!(price.cents(), 1250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lote;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use lote::{CommitPlan, LineDraft, LoteHeader, LoteWizard, StagedLine, WizardStep};
pub use money::{ExchangeRate, Money, Quantity};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the logged-in user's session blob is stored.
pub const SESSION_KEY: &str = "user_session";

/// Default page size for the product list's infinite scroll.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Number of digits in a phone number.
pub const PHONE_DIGITS: usize = 8;

/// Category assigned to products created without one (seeded by migration).
pub const DEFAULT_CATEGORY_ID: i64 = 1;
