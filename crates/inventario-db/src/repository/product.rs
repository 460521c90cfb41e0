//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Paging
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(offset, limit): newest first                                     │
//! │                                                                         │
//! │   id: 42 41 40 39 │ 38 37 36 35 │ 34 33                                │
//! │       └─ (0, 4) ──┘ └─ (4, 4) ──┘ └─ (8, 4): 2 rows → exhausted        │
//! │                                                                         │
//! │  Pages never overlap while no rows are added or deleted in between.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use inventario_core::{NewProduct, Product, ProductOption};

const PRODUCT_COLUMNS: &str = r#"
    id_producto AS id,
    nombre AS name,
    cantidad AS quantity_hundredths,
    min_stock AS min_stock_hundredths,
    cantidad_promedio AS average_quantity_hundredths,
    descripcion AS description,
    imagen AS image,
    precio_venta AS sell_price_cents,
    precio_compra AS buy_price_cents,
    id_categoria AS category_id,
    propietario AS owner
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let first_page = repo.list(0, 20).await?;
/// let id = repo.insert(&new_product).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Returns one page of products, newest (highest id) first.
    ///
    /// ## Arguments
    /// * `offset` - Rows to skip
    /// * `limit` - Maximum rows to return
    pub async fn list(&self, offset: u32, limit: u32) -> DbResult<Vec<Product>> {
        debug!(offset, limit, "Listing products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM productos ORDER BY id_producto DESC LIMIT ?1 OFFSET ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Page loaded");
        Ok(products)
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM productos WHERE id_producto = ?1");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// The store-generated id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<i64> {
        debug!(name = %product.name, "Inserting product");

        let id = sqlx::query(
            r#"
            INSERT INTO productos (
                nombre, cantidad, min_stock, cantidad_promedio, descripcion,
                imagen, precio_venta, precio_compra, id_categoria, propietario
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity_hundredths)
        .bind(product.min_stock_hundredths)
        .bind(product.average_quantity_hundredths)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.sell_price_cents)
        .bind(product.buy_price_cents)
        .bind(product.category_id)
        .bind(&product.owner)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, "Product inserted");
        Ok(id)
    }

    /// Replaces every mutable field of the product with this id.
    ///
    /// Last write wins; no version check.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE productos SET
                nombre = ?1,
                cantidad = ?2,
                min_stock = ?3,
                cantidad_promedio = ?4,
                descripcion = ?5,
                imagen = ?6,
                precio_venta = ?7,
                precio_compra = ?8,
                id_categoria = ?9,
                propietario = ?10
            WHERE id_producto = ?11
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity_hundredths)
        .bind(product.min_stock_hundredths)
        .bind(product.average_quantity_hundredths)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.sell_price_cents)
        .bind(product.buy_price_cents)
        .bind(product.category_id)
        .bind(&product.owner)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product by id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM productos WHERE id_producto = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Picker entries for the lote wizard, ordered by name.
    pub async fn list_options(&self) -> DbResult<Vec<ProductOption>> {
        let options = sqlx::query_as::<_, ProductOption>(
            r#"
            SELECT id_producto AS id, nombre AS name, precio_venta AS sell_price_cents
            FROM productos
            ORDER BY nombre, id_producto
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
