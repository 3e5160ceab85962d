//! # Store Repository
//!
//! Database operations for retail stores.
//!
//! ## Role
//! Stores are reference data for the association engine and the subject of
//! the legacy notification flow: creates and stock updates are mirrored to
//! the downstream sink by the store service, not by this repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::Store;

/// Repository for store database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = StoreRepository::new(pool);
///
/// let store = repo.insert("Amsterdam Centrum", 0).await?;
/// let exists = repo.exists(store.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a new store.
    ///
    /// ## Arguments
    /// * `name` - Display name
    /// * `quantity_products_in_stock` - Initial stocked-product tally
    pub async fn insert(&self, name: &str, quantity_products_in_stock: i64) -> DbResult<Store> {
        debug!(name = %name, "Inserting store");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO stores (name, quantity_products_in_stock, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(quantity_products_in_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Store {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            quantity_products_in_stock,
            created_at: now,
        })
    }

    /// Gets a store by its id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, quantity_products_in_stock, created_at
            FROM stores
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Checks whether a store exists.
    ///
    /// ## Usage
    /// Reference check when creating an association.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Lists all stores ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, quantity_products_in_stock, created_at
            FROM stores
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Updates an existing store.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Store doesn't exist
    pub async fn update(&self, store: &Store) -> DbResult<()> {
        debug!(id = %store.id, "Updating store");

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                name = ?2,
                quantity_products_in_stock = ?3
            WHERE id = ?1
            "#,
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(store.quantity_products_in_stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", store.id));
        }

        Ok(())
    }

    /// Deletes a store.
    ///
    /// ## Returns
    /// * `Ok(())` - Store removed
    /// * `Err(DbError::NotFound)` - Store doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    /// Counts all stores (for diagnostics).
    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
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
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_db().await;
        let repo = db.stores();

        let store = repo.insert("Amsterdam Centrum", 12).await.unwrap();
        assert!(store.id > 0);

        let found = repo.find_by_id(store.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Amsterdam Centrum");
        assert_eq!(found.quantity_products_in_stock, 12);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = test_db().await;
        let repo = db.stores();

        let mut store = repo.insert("Utrecht Oost", 0).await.unwrap();
        store.quantity_products_in_stock = 5;
        repo.update(&store).await.unwrap();

        let found = repo.find_by_id(store.id).await.unwrap().unwrap();
        assert_eq!(found.quantity_products_in_stock, 5);
    }

    #[tokio::test]
    async fn test_delete_missing_store_reports_not_found() {
        let db = test_db().await;
        let repo = db.stores();

        let err = repo.delete(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
