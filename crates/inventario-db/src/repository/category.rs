//! # Category Repository
//!
//! Categories are referenced by products; the default one (id 1) is seeded
//! by migration.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use inventario_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id_categoria AS id, nombre AS name FROM categoria ORDER BY nombre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT id_categoria AS id, nombre AS name FROM categoria WHERE id_categoria = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Inserts a category and returns its id.
    pub async fn insert(&self, name: &str) -> DbResult<i64> {
        let id = sqlx::query("INSERT INTO categoria (nombre) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!(id, name, "Category inserted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use inventario_core::DEFAULT_CATEGORY_ID;

    #[tokio::test]
    async fn test_default_category_is_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let general = db.categories().get_by_id(DEFAULT_CATEGORY_ID).await.unwrap();
        assert_eq!(general.name, "General");
    }

    #[tokio::test]
    async fn test_insert_and_list_sorted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();
        let id = repo.insert("Abarrotes").await.unwrap();
        assert!(id > DEFAULT_CATEGORY_ID);

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Abarrotes", "General"]);

        assert!(matches!(
            repo.get_by_id(999).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
