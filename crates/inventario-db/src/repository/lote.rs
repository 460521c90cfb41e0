//! # Lote Repository
//!
//! Persists committed lotes.
//!
//! ## Commit Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT lote             ──► id_lote = last_insert_rowid()           │
//! │    INSERT usuario_lote     (id_user, id_lote)                          │
//! │    INSERT lote_producto ×N (in staged order)                           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure: the transaction is dropped and rolled back.              │
//! │  Either the whole lote exists or nothing does.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use inventario_core::{Lote, LoteLine, NewLote, NewLoteLine};

const LOTE_COLUMNS: &str = r#"
    id_lote AS id,
    detalle_lote AS detail,
    fecha_registro AS registered_on,
    fecha_fin_lote AS ends_on
"#;

const LINE_COLUMNS: &str = r#"
    id_lote_producto AS id,
    id_lote AS lote_id,
    id_producto AS product_id,
    cantidad AS quantity_hundredths,
    precio_compra AS purchase_price_cents,
    precio_dolar AS exchange_rate
"#;

/// Repository for lote database operations.
#[derive(Debug, Clone)]
pub struct LoteRepository {
    pool: SqlitePool,
}

impl LoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LoteRepository { pool }
    }

    /// Writes a lote header, its owner link and all its lines atomically.
    ///
    /// ## Returns
    /// The store-generated lote id.
    ///
    /// ## Errors
    /// Any failed statement rolls everything back and surfaces as
    /// `DbError::TransactionFailed`.
    pub async fn create_with_lines(&self, lote: &NewLote, lines: &[NewLoteLine]) -> DbResult<i64> {
        debug!(user_id = lote.user_id, lines = lines.len(), "Committing lote");

        match self.write_lote(lote, lines).await {
            Ok(id) => {
                info!(lote_id = id, lines = lines.len(), "Lote committed");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "Lote commit rolled back");
                Err(DbError::TransactionFailed(err.to_string()))
            }
        }
    }

    async fn write_lote(&self, lote: &NewLote, lines: &[NewLoteLine]) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let lote_id = sqlx::query(
            r#"
            INSERT INTO lote (detalle_lote, fecha_registro, fecha_fin_lote)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&lote.detail)
        .bind(lote.registered_on)
        .bind(lote.ends_on)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("INSERT INTO usuario_lote (id_user, id_lote) VALUES (?1, ?2)")
            .bind(lote.user_id)
            .bind(lote_id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO lote_producto (
                    id_lote, id_producto, cantidad, precio_compra, precio_dolar
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(lote_id)
            .bind(line.product_id)
            .bind(line.quantity.hundredths())
            .bind(line.purchase_price.cents())
            .bind(line.exchange_rate.hundredths())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(lote_id)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Lote> {
        let sql = format!("SELECT {LOTE_COLUMNS} FROM lote WHERE id_lote = ?1");
        sqlx::query_as::<_, Lote>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Lote", id))
    }

    /// Lines of a lote in insertion order.
    pub async fn lines(&self, lote_id: i64) -> DbResult<Vec<LoteLine>> {
        let sql = format!(
            "SELECT {LINE_COLUMNS} FROM lote_producto WHERE id_lote = ?1 ORDER BY id_lote_producto"
        );
        let lines = sqlx::query_as::<_, LoteLine>(&sql)
            .bind(lote_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lines)
    }

    /// Lotes committed by a user, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<Lote>> {
        let sql = format!(
            r#"
            SELECT {LOTE_COLUMNS} FROM lote
            WHERE id_lote IN (SELECT id_lote FROM usuario_lote WHERE id_user = ?1)
            ORDER BY id_lote DESC
            "#
        );
        let lotes = sqlx::query_as::<_, Lote>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lotes)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lote")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_lines(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lote_producto")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
