//! Services backing the mobile screens.
//!
//! ```text
//! services/
//! ├── auth.rs     ◄─── login / register / logout
//! ├── product.rs  ◄─── infinite-scroll catalog + product CRUD
//! └── lote.rs     ◄─── two-step lote intake
//! ```

pub mod auth;
pub mod lote;
pub mod product;

pub use auth::{CredentialService, RegisterForm};
pub use lote::LoteWorkflow;
pub use product::{ProductCatalog, ProductForm};
