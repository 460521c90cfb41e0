//! # Database Pool Management
//!
//! Connection pool creation, configuration and the store lifecycle.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Lifecycle                                 │
//! │                                                                         │
//! │  DbConfig::new(path)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config) ──► open pool ──► init() if run_migrations      │
//! │       │                                                                 │
//! │       ├── health_check()   SELECT 1                                    │
//! │       ├── info()           table names                                 │
//! │       │                                                                 │
//! │       ├── reset()          close ─► delete file(+wal,+shm) ─► reopen   │
//! │       ├── reinitialize()   reset() then init()                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  close()                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Explicit Handle
//! There is no global connection. The handle is created once at startup and
//! passed to every repository and service that needs it.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::lote::LoteRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/inventario.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Single connection: each in-memory connection would otherwise see its
    /// own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: the pool is reference-counted.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    config: DbConfig,
}

impl Database {
    /// Opens the store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode
    ///    - NORMAL synchronous
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError::ConnectionFailed)` - Store could not be opened
    /// * `Err(DbError::MigrationFailed)` - Schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite leaves these off unless asked
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let run_migrations = config.run_migrations;
        let db = Database { pool, config };

        if run_migrations {
            db.init().await?;
        }

        Ok(db)
    }

    /// Applies every pending migration.
    ///
    /// Idempotent: already-applied versions are skipped, and every statement
    /// is `IF NOT EXISTS`.
    pub async fn init(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Deletes the store and reopens it empty (no migrations applied).
    ///
    /// In-memory stores are just reopened.
    pub async fn reset(self) -> DbResult<Database> {
        warn!(path = %self.config.database_path.display(), "Resetting database");

        self.pool.close().await;

        if !self.config.is_in_memory() {
            let base = self.config.database_path.clone();
            for suffix in ["", "-wal", "-shm"] {
                let mut path = base.clone().into_os_string();
                path.push(suffix);
                remove_if_exists(Path::new(&path)).await?;
            }
        }

        let config = self.config.clone().run_migrations(false);
        Database::new(config).await
    }

    /// Reset followed by init.
    pub async fn reinitialize(self) -> DbResult<Database> {
        let db = self.reset().await?;
        db.init().await?;
        info!("Database reinitialized");
        Ok(db)
    }

    /// Lists user-visible table names in name order.
    ///
    /// Excludes SQLite internals and the migration bookkeeping table.
    pub async fn info(&self) -> DbResult<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
              AND name NOT LIKE '\_sqlx\_%' ESCAPE '\'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(tables = ?tables, "Database tables");
        Ok(tables)
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn lotes(&self) -> LoteRepository {
        LoteRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations fail with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

async fn remove_if_exists(path: &Path) -> DbResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed store file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DbError::FileRemoval {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED_TABLES: [&str; 8] = [
        "categoria",
        "historial_precios",
        "lote",
        "lote_producto",
        "productos",
        "usuario",
        "usuario_lote",
        "venta",
    ];

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_info_lists_all_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tables = db.info().await.unwrap();
        assert_eq!(tables, EXPECTED_TABLES);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.init().await.unwrap();
        db.init().await.unwrap();

        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
        assert_eq!(db.info().await.unwrap().len(), EXPECTED_TABLES.len());
    }

    #[tokio::test]
    async fn test_close_makes_store_unavailable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);

        let err = db.products().count().await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_reset_and_reinitialize_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.categories().insert("Bebidas").await.unwrap();
        assert_eq!(db.categories().list().await.unwrap().len(), 2);

        let db = db.reset().await.unwrap();
        assert!(db.info().await.unwrap().is_empty());

        let db = db.reinitialize().await.unwrap();
        assert_eq!(db.info().await.unwrap(), EXPECTED_TABLES);
        // Only the seeded default category survives
        assert_eq!(db.categories().list().await.unwrap().len(), 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_fails_for_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("inventario.db");

        let err = Database::new(DbConfig::new(path)).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
