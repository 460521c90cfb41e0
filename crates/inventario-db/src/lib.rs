//! # inventario-db: Database Layer for Inventario
//!
//! SQLite storage for users, products and lotes, with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventario Data Flow                             │
//! │                                                                         │
//! │  Service (CredentialService / ProductCatalog / LoteWorkflow)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   inventario-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │ 0001 schema  │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 0002 default │  │   │
//! │  │   │ reset / info  │    │ LoteRepo      │    │    category  │  │   │
//! │  │   └───────────────┘    │ CategoryRepo  │    └──────────────┘  │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventario.db (platform data dir)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventario_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/inventario.db")).await?;
//! let page = db.products().list(0, 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::lote::LoteRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
