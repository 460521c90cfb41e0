//! # Database Migrations
//!
//! Embedded SQL migrations: the schema bootstrapper.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::init()                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tables present but no _sqlx_migrations?                               │
//! │       └── yes: warn (store predates versioning), continue              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       ├── 0001_initial_schema.sql    ✓ (already applied)              │
//! │       └── 0002_default_category.sql  ⬜ (needs to run)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Each pending migration runs in its own transaction                    │
//! │  First failure aborts → DbError::MigrationFailed                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNNN_description.sql`
//! 3. Use `IF NOT EXISTS` / `OR IGNORE` so legacy stores upgrade cleanly
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    if is_unversioned_store(pool).await? {
        warn!("Existing tables found without migration history; applying schema over them");
    }

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

/// True when the file already has application tables but no record of any
/// migration (created before the schema was versioned).
async fn is_unversioned_store(pool: &SqlitePool) -> DbResult<bool> {
    let has_history: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_history > 0 {
        return Ok(false);
    }

    let app_tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('usuario', 'productos', 'lote')",
    )
    .fetch_one(pool)
    .await?;

    Ok(app_tables > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_legacy_store_is_upgraded() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        // A table left behind by an install that predates versioned migrations
        sqlx::query(
            "CREATE TABLE usuario (id_user INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, correo VARCHAR(100) NOT NULL, contrasenia TEXT NOT NULL, nombre VARCHAR(100) NOT NULL, apellido VARCHAR(100) NOT NULL, telefono INTEGER NOT NULL)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert!(is_unversioned_store(db.pool()).await.unwrap());

        db.init().await.unwrap();
        assert!(!is_unversioned_store(db.pool()).await.unwrap());

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(applied, 2);
    }

    #[tokio::test]
    async fn test_status_before_init() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(applied, 0);
    }
}
