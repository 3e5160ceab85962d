//! # Association Repository
//!
//! Database operations for warehouse-product-store associations.
//!
//! ## Counting Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            One Table, Three Ceilings, Three Counts                      │
//! │                                                                         │
//! │  associations (warehouse_business_unit_code, product_id, store_id)     │
//! │                                                                         │
//! │  Ceiling 1: warehouses per (product, store)                            │
//! │     COUNT(*) WHERE product_id = ? AND store_id = ?                     │
//! │                                                                         │
//! │  Ceiling 2: warehouses per store                                       │
//! │     COUNT(DISTINCT warehouse_business_unit_code) WHERE store_id = ?    │
//! │                                                                         │
//! │  Ceiling 3: products per warehouse                                     │
//! │     COUNT(DISTINCT product_id) WHERE warehouse_business_unit_code = ?  │
//! │                                                                         │
//! │  Ceilings 2 and 3 carry a membership bypass, answered by the           │
//! │  is_*_linked queries below.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use depot_core::Association;

/// Repository for association database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AssociationRepository::new(pool);
///
/// let rows = repo.count_by_product_and_store(product_id, store_id).await?;
/// let linked = repo.is_warehouse_linked_to_store("MWH.001", store_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AssociationRepository {
    pool: SqlitePool,
}

impl AssociationRepository {
    /// Creates a new AssociationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AssociationRepository { pool }
    }

    /// Gets an association by its composite key.
    ///
    /// ## Returns
    /// * `Ok(Some(Association))` - Link exists
    /// * `Ok(None)` - No such link
    pub async fn find_by_key(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
        store_id: i64,
    ) -> DbResult<Option<Association>> {
        let association = sqlx::query_as::<_, Association>(
            r#"
            SELECT id, warehouse_business_unit_code, product_id, store_id, created_at
            FROM associations
            WHERE warehouse_business_unit_code = ?1 AND product_id = ?2 AND store_id = ?3
            "#,
        )
        .bind(warehouse_business_unit_code)
        .bind(product_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(association)
    }

    /// Inserts a new association.
    ///
    /// ## Returns
    /// * `Ok(Association)` - Inserted row with its generated id
    /// * `Err(DbError::UniqueViolation)` - Composite key already present
    pub async fn insert(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
        store_id: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<Association> {
        debug!(
            warehouse = %warehouse_business_unit_code,
            product_id = %product_id,
            store_id = %store_id,
            "Inserting association"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO associations (warehouse_business_unit_code, product_id, store_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(warehouse_business_unit_code)
        .bind(product_id)
        .bind(store_id)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Association {
            id: result.last_insert_rowid(),
            warehouse_business_unit_code: warehouse_business_unit_code.to_string(),
            product_id,
            store_id,
            created_at,
        })
    }

    /// Deletes an association by its composite key.
    ///
    /// ## Returns
    /// Number of rows removed (0 when the link did not exist, 1 otherwise).
    pub async fn delete_by_key(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
        store_id: i64,
    ) -> DbResult<u64> {
        debug!(
            warehouse = %warehouse_business_unit_code,
            product_id = %product_id,
            store_id = %store_id,
            "Deleting association"
        );

        let result = sqlx::query(
            r#"
            DELETE FROM associations
            WHERE warehouse_business_unit_code = ?1 AND product_id = ?2 AND store_id = ?3
            "#,
        )
        .bind(warehouse_business_unit_code)
        .bind(product_id)
        .bind(store_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lists all associations in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Association>> {
        let associations = sqlx::query_as::<_, Association>(
            r#"
            SELECT id, warehouse_business_unit_code, product_id, store_id, created_at
            FROM associations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(associations)
    }

    /// Counts warehouses already fulfilling a product for a store.
    ///
    /// Rows under the composite key are unique per warehouse, so a plain
    /// COUNT(*) is a warehouse count.
    pub async fn count_by_product_and_store(
        &self,
        product_id: i64,
        store_id: i64,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM associations WHERE product_id = ?1 AND store_id = ?2",
        )
        .bind(product_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts distinct warehouses serving a store across all products.
    pub async fn count_distinct_warehouses_by_store(&self, store_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT warehouse_business_unit_code)
            FROM associations
            WHERE store_id = ?1
            "#,
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts distinct products stocked by a warehouse across all stores.
    pub async fn count_distinct_products_by_warehouse(
        &self,
        warehouse_business_unit_code: &str,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT product_id)
            FROM associations
            WHERE warehouse_business_unit_code = ?1
            "#,
        )
        .bind(warehouse_business_unit_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Checks whether a warehouse already serves a store through any product.
    ///
    /// ## Usage
    /// Membership bypass for the warehouses-per-store ceiling.
    pub async fn is_warehouse_linked_to_store(
        &self,
        warehouse_business_unit_code: &str,
        store_id: i64,
    ) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM associations
            WHERE warehouse_business_unit_code = ?1 AND store_id = ?2
            "#,
        )
        .bind(warehouse_business_unit_code)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Checks whether a warehouse already stocks a product for any store.
    ///
    /// ## Usage
    /// Membership bypass for the products-per-warehouse ceiling.
    pub async fn is_product_linked_to_warehouse(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
    ) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM associations
            WHERE warehouse_business_unit_code = ?1 AND product_id = ?2
            "#,
        )
        .bind(warehouse_business_unit_code)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Counts all associations (for diagnostics).
    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM associations")
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
    async fn test_insert_and_find_by_key() {
        let db = test_db().await;
        let repo = db.associations();

        let inserted = repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();
        assert!(inserted.id > 0);

        let found = repo.find_by_key("MWH.001", 1, 1).await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.warehouse_business_unit_code, "MWH.001");

        assert!(repo.find_by_key("MWH.001", 1, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let db = test_db().await;
        let repo = db.associations();

        repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();
        let err = repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_delete_by_key_reports_rows_affected() {
        let db = test_db().await;
        let repo = db.associations();

        repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();
        assert_eq!(repo.delete_by_key("MWH.001", 1, 1).await.unwrap(), 1);
        assert_eq!(repo.delete_by_key("MWH.001", 1, 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ceiling_counts() {
        let db = test_db().await;
        let repo = db.associations();

        // Store 1 served by two warehouses; MWH.001 stocks two products.
        repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();
        repo.insert("MWH.002", 1, 1, Utc::now()).await.unwrap();
        repo.insert("MWH.001", 2, 1, Utc::now()).await.unwrap();

        assert_eq!(repo.count_by_product_and_store(1, 1).await.unwrap(), 2);
        assert_eq!(repo.count_by_product_and_store(2, 1).await.unwrap(), 1);
        assert_eq!(
            repo.count_distinct_warehouses_by_store(1).await.unwrap(),
            2
        );
        assert_eq!(
            repo.count_distinct_products_by_warehouse("MWH.001")
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            repo.count_distinct_products_by_warehouse("MWH.002")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_membership_checks() {
        let db = test_db().await;
        let repo = db.associations();

        repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();

        assert!(repo
            .is_warehouse_linked_to_store("MWH.001", 1)
            .await
            .unwrap());
        assert!(!repo
            .is_warehouse_linked_to_store("MWH.001", 2)
            .await
            .unwrap());
        assert!(repo
            .is_product_linked_to_warehouse("MWH.001", 1)
            .await
            .unwrap());
        assert!(!repo
            .is_product_linked_to_warehouse("MWH.002", 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = test_db().await;
        let repo = db.associations();

        repo.insert("MWH.002", 3, 2, Utc::now()).await.unwrap();
        repo.insert("MWH.001", 1, 1, Utc::now()).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].warehouse_business_unit_code, "MWH.002");
        assert_eq!(all[1].warehouse_business_unit_code, "MWH.001");
    }
}
