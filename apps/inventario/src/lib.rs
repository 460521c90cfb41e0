//! # Inventario App Library
//!
//! Wires configuration, the store, the session and the quote gateway into
//! the services the mobile screens call.
//!
//! ## Module Organization
//! ```text
//! inventario_app/
//! ├── lib.rs          ◄─── You are here (bootstrap & wiring)
//! ├── config.rs       ◄─── TOML + env configuration
//! ├── error.rs        ◄─── ApiError returned by every service
//! ├── exchange.rs     ◄─── Exchange-rate gateway (HTTP + fixed)
//! ├── password.rs     ◄─── sha256 / argon2 digests
//! ├── session.rs      ◄─── Device-local session store
//! └── services/
//!     ├── auth.rs     ◄─── CredentialService
//!     ├── product.rs  ◄─── ProductCatalog
//!     └── lote.rs     ◄─── LoteWorkflow
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or "info,inventario=debug"      │
//! │  2. AppConfig::load(...)      file → env → validate                    │
//! │  3. App::bootstrap(config)    open store + migrations                  │
//! │                               (failure here is StoreUnavailable)       │
//! │  4. app.credentials() / catalog() / lote_workflow()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod password;
pub mod services;
pub mod session;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use exchange::{ExchangeRateGateway, FixedExchangeRate, HttpExchangeRateGateway, Quote};
pub use password::PasswordScheme;
pub use services::{CredentialService, LoteWorkflow, ProductCatalog, ProductForm, RegisterForm};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

use inventario_db::Database;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventario=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Everything the screens need, opened once at startup.
#[derive(Clone)]
pub struct App {
    config: AppConfig,
    db: Database,
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn ExchangeRateGateway>,
}

impl App {
    /// Opens the store (running migrations) and builds the file session
    /// store and HTTP gateway from `config`.
    pub async fn bootstrap(config: AppConfig) -> ApiResult<Self> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!(?parent, "Cannot create data directory: {}", e);
                ApiError::new(ErrorCode::StoreUnavailable, "Database unavailable")
            })?;
        }

        let db = Database::new(config.db_config()).await?;
        let tables = db.info().await?;
        info!(?db_path, tables = tables.len(), "Store ready");

        let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_dir()));
        let gateway: Arc<dyn ExchangeRateGateway> = Arc::new(HttpExchangeRateGateway::new(
            config.exchange.url.clone(),
            config.exchange.timeout(),
        )?);

        Ok(Self::with_parts(config, db, sessions, gateway))
    }

    /// Builds an app from already-open parts.
    pub fn with_parts(
        config: AppConfig,
        db: Database,
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn ExchangeRateGateway>,
    ) -> Self {
        App {
            config,
            db,
            sessions,
            gateway,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn credentials(&self) -> CredentialService {
        CredentialService::new(
            self.db.clone(),
            self.sessions.clone(),
            self.config.auth.password_scheme,
        )
    }

    /// A fresh, empty catalog; call `refresh()` to load the first page.
    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog::new(self.db.clone(), self.config.catalog.page_size)
    }

    /// A fresh wizard on the header step.
    pub fn lote_workflow(&self) -> LoteWorkflow {
        LoteWorkflow::new(self.db.clone(), self.sessions.clone(), self.gateway.clone())
    }

    pub async fn shutdown(&self) {
        self.db.close().await;
        info!("Inventario shut down");
    }
}
