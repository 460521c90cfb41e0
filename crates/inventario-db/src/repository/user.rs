//! # User Repository
//!
//! Lookups and inserts on `usuario`.
//!
//! Email uniqueness is not a store constraint: the credential service checks
//! with [`UserRepository::find_by_email`] before inserting.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use inventario_core::{NewUser, User};

const USER_COLUMNS: &str = r#"
    id_user AS id,
    correo AS email,
    contrasenia AS password_hash,
    nombre AS first_name,
    apellido AS last_name,
    telefono AS phone
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds the user registered under `email`, if any.
    ///
    /// Exact match on the stored text. If several rows share the email the
    /// oldest wins.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Looking up user by email");

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM usuario WHERE correo = ?1 ORDER BY id_user LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Returns just the id for `email`.
    pub async fn find_id_by_email(&self, email: &str) -> DbResult<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id_user FROM usuario WHERE correo = ?1 ORDER BY id_user LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM usuario WHERE id_user = ?1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Inserts a user. The id is looked up afterwards by email.
    pub async fn insert(&self, user: &NewUser) -> DbResult<()> {
        debug!(email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO usuario (nombre, apellido, correo, contrasenia, telefono)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.phone)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Rows sharing `email`. Used to check registration never duplicates.
    pub async fn count_by_email(&self, email: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuario WHERE correo = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuario")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "a".repeat(64),
            first_name: "Ana".to_string(),
            last_name: "Rojas".to_string(),
            phone: 71234567,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_by_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        assert!(repo.find_by_email("ana@example.com").await.unwrap().is_none());

        repo.insert(&new_user("ana@example.com")).await.unwrap();

        let user = repo.find_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(user.first_name, "Ana");
        assert_eq!(user.phone, 71234567);
        assert_eq!(user.password_hash.len(), 64);

        let id = repo.find_id_by_email("ana@example.com").await.unwrap();
        assert_eq!(id, Some(user.id));
        assert_eq!(repo.get_by_id(user.id).await.unwrap().email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_ids_are_store_generated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        repo.insert(&new_user("a@example.com")).await.unwrap();
        repo.insert(&new_user("b@example.com")).await.unwrap();

        let a = repo.find_id_by_email("a@example.com").await.unwrap().unwrap();
        let b = repo.find_id_by_email("b@example.com").await.unwrap().unwrap();
        assert!(b > a);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.users().get_by_id(42).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
