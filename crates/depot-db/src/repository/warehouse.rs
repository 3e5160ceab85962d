//! # Warehouse Repository
//!
//! Database operations for warehouse generations.
//!
//! ## Generation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              One Business Unit Code, Many Generations                   │
//! │                                                                         │
//! │  business_unit_code = "MWH.001"                                         │
//! │                                                                         │
//! │  id │ capacity │ stock │ archived_at                                    │
//! │  ───┼──────────┼───────┼─────────────────                               │
//! │   1 │       40 │    30 │ 2024-03-01T09:00Z   ← replaced                │
//! │   4 │       50 │    30 │ 2024-06-12T14:30Z   ← replaced                │
//! │   9 │       60 │    30 │ NULL                ← current (active)        │
//! │                                                                         │
//! │  At most ONE row per code has archived_at IS NULL.                     │
//! │  Enforced by the partial unique index idx_warehouses_active_code.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Operations
//! - Latest-relevant lookup by code (active row wins, else newest archived)
//! - Active counts per location for the location ceiling
//! - Atomic replace: archive current + insert successor in one transaction

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::{Warehouse, WarehouseDraft};

/// Repository for warehouse database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = WarehouseRepository::new(pool);
///
/// // Latest generation for a code (any state)
/// let warehouse = repo.find_by_business_unit_code("MWH.001").await?;
///
/// // Active roster
/// let active = repo.list_active().await?;
/// ```
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

impl WarehouseRepository {
    /// Creates a new WarehouseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WarehouseRepository { pool }
    }

    /// Inserts a new active warehouse generation.
    ///
    /// ## Arguments
    /// * `draft` - Validated field values for the new generation
    /// * `created_at` - Creation timestamp (supplied by the caller so that
    ///   a replace can stamp both rows with the same instant)
    ///
    /// ## Returns
    /// * `Ok(Warehouse)` - Inserted row with its generated id
    /// * `Err(DbError::UniqueViolation)` - an active generation already
    ///   holds this business unit code
    pub async fn insert(
        &self,
        draft: &WarehouseDraft,
        created_at: DateTime<Utc>,
    ) -> DbResult<Warehouse> {
        debug!(business_unit_code = %draft.business_unit_code, "Inserting warehouse");

        let result = sqlx::query(
            r#"
            INSERT INTO warehouses (business_unit_code, location, capacity, stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&draft.business_unit_code)
        .bind(&draft.location)
        .bind(draft.capacity)
        .bind(draft.stock)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Warehouse {
            id: result.last_insert_rowid(),
            business_unit_code: draft.business_unit_code.clone(),
            location: draft.location.clone(),
            capacity: draft.capacity,
            stock: draft.stock,
            created_at,
            archived_at: None,
        })
    }

    /// Gets a warehouse generation by its row id (any state).
    ///
    /// ## Returns
    /// * `Ok(Some(Warehouse))` - Generation found
    /// * `Ok(None)` - No such row
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
            FROM warehouses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    /// Gets the latest relevant generation for a business unit code.
    ///
    /// ## Selection Rule
    /// 1. The active generation, if one exists
    /// 2. Otherwise the most recently created archived generation
    /// 3. Otherwise `None` (code never used)
    ///
    /// Callers inspect `archived_at` to distinguish cases 1 and 2.
    pub async fn find_by_business_unit_code(&self, code: &str) -> DbResult<Option<Warehouse>> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
            FROM warehouses
            WHERE business_unit_code = ?1
            ORDER BY (archived_at IS NULL) DESC, created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    /// Checks whether any generation (active or archived) exists for a code.
    ///
    /// ## Usage
    /// Reference checks on associations accept archived warehouses, so this
    /// deliberately ignores `archived_at`.
    pub async fn exists_by_business_unit_code(&self, code: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM warehouses WHERE business_unit_code = ?1")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Counts active warehouses at a location.
    ///
    /// ## Usage
    /// Read before creating a warehouse to enforce the per-location ceiling.
    /// Archived generations do not occupy a slot.
    pub async fn count_active_by_location(&self, location: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM warehouses WHERE location = ?1 AND archived_at IS NULL",
        )
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Lists all active warehouses, ordered by business unit code.
    pub async fn list_active(&self) -> DbResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
            FROM warehouses
            WHERE archived_at IS NULL
            ORDER BY business_unit_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(warehouses)
    }

    /// Lists every generation for a business unit code, oldest first.
    ///
    /// ## Usage
    /// Audit view of a warehouse's replace history.
    pub async fn list_generations(&self, code: &str) -> DbResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
            FROM warehouses
            WHERE business_unit_code = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        Ok(warehouses)
    }

    /// Archives an active generation by setting its `archived_at` timestamp.
    ///
    /// ## Returns
    /// * `Ok(())` - Generation archived
    /// * `Err(DbError::NotFound)` - Row missing or already archived
    pub async fn set_archived(&self, id: i64, archived_at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Archiving warehouse generation");

        let result =
            sqlx::query("UPDATE warehouses SET archived_at = ?2 WHERE id = ?1 AND archived_at IS NULL")
                .bind(id)
                .bind(archived_at)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Warehouse", id));
        }

        Ok(())
    }

    /// Replaces a warehouse generation atomically.
    ///
    /// ## Transaction
    /// ```text
    /// BEGIN
    ///   UPDATE current generation → archived_at = now   (must hit 1 row)
    ///   INSERT successor generation (same code, archived_at = NULL)
    /// COMMIT
    /// ```
    /// Observers see either the old active row or the new one. There is no
    /// instant where the code has zero active generations or two.
    ///
    /// ## Arguments
    /// * `current_id` - Row id of the generation being superseded
    /// * `archived_at` - Timestamp stamped on the superseded row
    /// * `draft` - Field values for the successor generation
    /// * `created_at` - Creation timestamp for the successor
    ///
    /// ## Returns
    /// * `Ok(Warehouse)` - The new active generation
    /// * `Err(DbError::NotFound)` - Current row vanished or was archived
    ///   concurrently (transaction rolls back)
    pub async fn replace_generation(
        &self,
        current_id: i64,
        archived_at: DateTime<Utc>,
        draft: &WarehouseDraft,
        created_at: DateTime<Utc>,
    ) -> DbResult<Warehouse> {
        debug!(
            business_unit_code = %draft.business_unit_code,
            current_id = %current_id,
            "Replacing warehouse generation"
        );

        let mut tx = self.pool.begin().await?;

        let archived =
            sqlx::query("UPDATE warehouses SET archived_at = ?2 WHERE id = ?1 AND archived_at IS NULL")
                .bind(current_id)
                .bind(archived_at)
                .execute(&mut *tx)
                .await?;

        // Dropping the transaction without commit rolls back.
        if archived.rows_affected() == 0 {
            return Err(DbError::not_found("Warehouse", current_id));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO warehouses (business_unit_code, location, capacity, stock, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&draft.business_unit_code)
        .bind(&draft.location)
        .bind(draft.capacity)
        .bind(draft.stock)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let id = inserted.last_insert_rowid();

        tx.commit().await?;

        Ok(Warehouse {
            id,
            business_unit_code: draft.business_unit_code.clone(),
            location: draft.location.clone(),
            capacity: draft.capacity,
            stock: draft.stock,
            created_at,
            archived_at: None,
        })
    }

    /// Counts all warehouse rows across every generation (for diagnostics).
    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
