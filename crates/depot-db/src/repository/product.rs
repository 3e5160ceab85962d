//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Role
//! Products are reference data for the association engine: a link can only
//! be created towards a product that exists here. The catalog itself is
//! plain CRUD with no lifecycle rules of its own.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.insert("TONSTAD desk", None, 24900).await?;
/// let exists = repo.exists(product.id).await?;
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

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `name` - Display name
    /// * `description` - Optional free-text description
    /// * `price_cents` - Unit price in cents
    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
    ) -> DbResult<Product> {
        debug!(name = %name, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
            price_cents,
            created_at: now,
        })
    }

    /// Gets a product by its id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Checks whether a product exists.
    ///
    /// ## Usage
    /// Reference check when creating an association.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Lists all products ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Ok(())` - Product removed
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products (for diagnostics).
    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
        let repo = db.products();

        let product = repo
            .insert("KALLAX shelf", Some("4x4 shelving unit"), 8999)
            .await
            .unwrap();
        assert!(product.id > 0);

        let found = repo.find_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "KALLAX shelf");
        assert_eq!(found.description.as_deref(), Some("4x4 shelving unit"));
        assert_eq!(found.price_cents, 8999);
    }

    #[tokio::test]
    async fn test_exists() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert("MALM bed", None, 19900).await.unwrap();
        assert!(repo.exists(product.id).await.unwrap());
        assert!(!repo.exists(product.id + 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product_reports_not_found() {
        let db = test_db().await;
        let repo = db.products();

        let ghost = Product {
            id: 999,
            name: "PAX wardrobe".to_string(),
            description: None,
            price_cents: 49900,
            created_at: Utc::now(),
        };
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
