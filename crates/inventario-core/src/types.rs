//! # Domain Types
//!
//! Core domain types used throughout Inventario.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     User        │   │    Product      │   │      Lote       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (autoinc)   │   │  id (autoinc)   │   │  id (autoinc)   │       │
//! │  │  email          │   │  name           │   │  detail         │       │
//! │  │  password_hash  │   │  quantity       │   │  registered_on  │       │
//! │  │  phone          │   │  sell/buy cents │   │  ends_on        │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │                     │                     │                 │
//! │           │   usuario_lote      │    lote_producto    │                 │
//! │           └─────────────────────┼─────────────────────┘                 │
//! │                                 │                                       │
//! │                        ┌────────▼────────┐                              │
//! │                        │    LoteLine     │                              │
//! │                        │  qty (1/100)    │                              │
//! │                        │  purchase cents │                              │
//! │                        │  rate (1/100)   │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every row id is the store's own autoincrement value, returned by the
//! insert. Nothing here computes ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{ExchangeRate, Money, Quantity};

// =============================================================================
// User
// =============================================================================

/// A registered user row (`usuario`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,

    pub email: String,

    /// Stored password digest. Never leaves the credential service.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// Eight-digit phone number.
    pub phone: i64,
}

impl User {
    /// Display name written into the session: `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Strips credentials for handing back to the screens.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Data needed to insert a user. The hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: i64,
}

/// What login and registration return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Session
// =============================================================================

/// The persisted record of the logged-in user.
///
/// ## Wire Format
/// ```json
/// { "userId": 1, "userEmail": "ana@example.com", "userName": "Ana Rojas" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub user_id: i64,
    pub user_email: String,
    pub user_name: String,
}

impl From<&UserProfile> for Session {
    fn from(profile: &UserProfile) -> Self {
        Session {
            user_id: profile.id,
            user_email: profile.email.clone(),
            user_name: profile.full_name(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product row (`productos`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-generated identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Units on hand, in hundredths.
    pub quantity_hundredths: i64,

    /// Restock threshold, in hundredths.
    pub min_stock_hundredths: i64,

    /// Typical units on hand, in hundredths.
    pub average_quantity_hundredths: i64,

    pub description: String,

    /// Optional picture bytes.
    pub image: Option<Vec<u8>>,

    /// Sell price in cents.
    pub sell_price_cents: i64,

    /// Buy price in cents.
    pub buy_price_cents: i64,

    pub category_id: Option<i64>,

    /// Username tag of whoever created the product.
    pub owner: String,
}

impl Product {
    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_cents(self.sell_price_cents)
    }

    #[inline]
    pub fn buy_price(&self) -> Money {
        Money::from_cents(self.buy_price_cents)
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    #[inline]
    pub fn min_stock(&self) -> Quantity {
        Quantity::from_hundredths(self.min_stock_hundredths)
    }

    /// True when stock has fallen to or below the restock threshold.
    pub fn needs_restock(&self) -> bool {
        self.quantity() <= self.min_stock()
    }
}

/// Payload for inserting a product: every field except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub quantity_hundredths: i64,
    pub min_stock_hundredths: i64,
    pub average_quantity_hundredths: i64,
    pub description: String,
    pub image: Option<Vec<u8>>,
    pub sell_price_cents: i64,
    pub buy_price_cents: i64,
    pub category_id: Option<i64>,
    pub owner: String,
}

impl NewProduct {
    /// Attaches a store id, producing the full row.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            quantity_hundredths: self.quantity_hundredths,
            min_stock_hundredths: self.min_stock_hundredths,
            average_quantity_hundredths: self.average_quantity_hundredths,
            description: self.description,
            image: self.image,
            sell_price_cents: self.sell_price_cents,
            buy_price_cents: self.buy_price_cents,
            category_id: self.category_id,
            owner: self.owner,
        }
    }
}

/// Entry in the lote wizard's product picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductOption {
    pub id: i64,
    pub name: String,
    pub sell_price_cents: i64,
}

// =============================================================================
// Category
// =============================================================================

/// A product category (`categoria`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Lote
// =============================================================================

/// A committed batch header (`lote`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Lote {
    pub id: i64,

    /// Free text, empty when the user left it blank.
    pub detail: String,

    /// Day the batch was committed.
    #[ts(as = "String")]
    pub registered_on: NaiveDate,

    /// Day the batch ends (expiry or sell-by).
    #[ts(as = "String")]
    pub ends_on: NaiveDate,
}

/// A committed batch line (`lote_producto`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LoteLine {
    pub id: i64,
    pub lote_id: i64,
    /// `None` once the product has been deleted; the line itself is kept.
    pub product_id: Option<i64>,
    pub quantity_hundredths: i64,
    pub purchase_price_cents: i64,
    /// Quote in hundredths.
    pub exchange_rate: i64,
}

impl LoteLine {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    #[inline]
    pub fn rate(&self) -> ExchangeRate {
        ExchangeRate::from_hundredths(self.exchange_rate)
    }
}

/// Header of a batch about to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLote {
    pub detail: String,
    pub registered_on: NaiveDate,
    pub ends_on: NaiveDate,
    /// User linked through `usuario_lote`.
    pub user_id: i64,
}

/// A batch line about to be committed, rate already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoteLine {
    pub product_id: i64,
    pub quantity: Quantity,
    pub purchase_price: Money,
    pub exchange_rate: ExchangeRate,
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoteSummary {
    pub lote_id: i64,
    pub line_count: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================
