//! # Repository Module
//!
//! Database repository implementations for Inventario.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Service                                                                │
//! │       │  db.products().list(offset, 20)                                │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, offset, limit)                                        │
//! │  ├── insert(&self, product)                                            │
//! │  ├── update(&self, product)                                            │
//! │  └── delete(&self, id)                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage column names are Spanish (`correo`, `precio_venta`, ...); every
//! SELECT aliases them to the field names of the core types so rows decode
//! with `FromRow`.
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Registration and login lookups
//! - [`product::ProductRepository`] - Product CRUD and paging
//! - [`lote::LoteRepository`] - Atomic lote commit and reads
//! - [`category::CategoryRepository`] - Category reads

pub mod category;
pub mod lote;
pub mod product;
pub mod user;
