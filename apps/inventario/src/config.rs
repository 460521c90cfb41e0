//! # App Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVENTARIO_DB_PATH=/data/inventario.db                             │
//! │     INVENTARIO_PASSWORD_SCHEME=argon2                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/inventario/inventario.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/data/inventario.db"
//! max_connections = 5
//!
//! [exchange]
//! url = "https://bo.dolarapi.com/v1/dolares/binance"
//! timeout_secs = 10
//!
//! [auth]
//! password_scheme = "sha256"  # sha256 | argon2
//!
//! [catalog]
//! page_size = 20
//!
//! [session]
//! dir = "/data/session"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::password::PasswordScheme;
use inventario_core::DEFAULT_PAGE_SIZE;
use inventario_db::DbConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Store file. Default: `inventario.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Where the dollar quote comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSettings {
    #[serde(default = "default_exchange_url")]
    pub url: String,

    #[serde(default = "default_exchange_timeout")]
    pub timeout_secs: u64,
}

fn default_exchange_url() -> String {
    "https://bo.dolarapi.com/v1/dolares/binance".to_string()
}

fn default_exchange_timeout() -> u64 {
    10
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        ExchangeSettings {
            url: default_exchange_url(),
            timeout_secs: default_exchange_timeout(),
        }
    }
}

impl ExchangeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Rows per infinite-scroll page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Directory holding the session entry. Default: platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub exchange: ExchangeSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (if exists)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.exchange.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(format!(
                "Exchange URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "exchange.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid(
                "catalog.page_size must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("INVENTARIO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup("INVENTARIO_EXCHANGE_URL") {
            self.exchange.url = url;
        }

        if let Some(scheme) = lookup("INVENTARIO_PASSWORD_SCHEME") {
            match scheme.parse() {
                Ok(parsed) => self.auth.password_scheme = parsed,
                Err(e) => warn!("Ignoring INVENTARIO_PASSWORD_SCHEME: {}", e),
            }
        }

        if let Some(size) = lookup("INVENTARIO_PAGE_SIZE") {
            if let Ok(n) = size.parse::<u32>() {
                self.catalog.page_size = n;
            }
        }

        if let Some(dir) = lookup("INVENTARIO_SESSION_DIR") {
            self.session.dir = Some(PathBuf::from(dir));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "inventario", "inventario")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("inventario.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Store file: configured, else the platform data dir, else the cwd.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .or_else(|| Self::project_dirs().map(|d| d.data_dir().join("inventario.db")))
            .unwrap_or_else(|| PathBuf::from("inventario.db"))
    }

    pub fn session_dir(&self) -> PathBuf {
        self.session
            .dir
            .clone()
            .or_else(|| Self::project_dirs().map(|d| d.data_dir().join("session")))
            .unwrap_or_else(|| PathBuf::from("session"))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }
}
