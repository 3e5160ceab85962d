//! # Warehouse Lifecycle Engine
//!
//! Create, replace and archive for maintenance warehouses.
//!
//! ## Generation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Lifecycle Of A Business Unit Code                      │
//! │                                                                         │
//! │   Create("MWH.001")                                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────┐    Replace     ┌─────────┐    Replace                     │
//! │   │ gen 1   │───────────────►│ gen 2   │────────────► ...               │
//! │   │ ACTIVE  │  (atomic swap) │ ACTIVE  │                                │
//! │   └─────────┘                └────┬────┘                                │
//! │     becomes                       │ Archive                             │
//! │     ARCHIVED                      ▼                                     │
//! │                              ┌──────────┐   Create("MWH.001")           │
//! │                              │ ARCHIVED │   may start gen 3:            │
//! │                              └──────────┘   archived codes are free     │
//! │                                                                         │
//! │   At most one ACTIVE generation per code, at any instant, including     │
//! │   mid-replace. Archived generations stay queryable forever.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precondition Ordering
//! Every operation runs its checks in a fixed order and fails on the first
//! violation. Tests depend on this ordering, and so do clients that show
//! one error at a time.

use chrono::Utc;
use tracing::{debug, info};

use depot_core::{
    validation, DomainError, Entity, LocationCatalog, ValidationError, Warehouse, WarehouseDraft,
};
use depot_db::{Database, DbError};

use crate::error::EngineResult;
use crate::locks::{Scope, ScopeLocks};

/// Engine for warehouse create / replace / archive.
///
/// ## Thread Safety
/// Cloning shares the database pool and the scope lock registry, so all
/// clones serialize against each other. Always clone an existing instance
/// instead of constructing a second one over the same database.
#[derive(Debug, Clone)]
pub struct WarehouseLifecycle {
    db: Database,
    catalog: LocationCatalog,
    locks: ScopeLocks,
}

impl WarehouseLifecycle {
    /// Creates a lifecycle engine over the built-in location catalog.
    pub fn new(db: Database) -> Self {
        WarehouseLifecycle {
            db,
            catalog: LocationCatalog::builtin(),
            locks: ScopeLocks::new(),
        }
    }

    /// Returns the location catalog this engine resolves against.
    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// Creates a new warehouse.
    ///
    /// ## Precondition Order
    /// 1. Draft fields are syntactically valid (`InvalidArgument`)
    /// 2. No active warehouse uses the code; archived ones don't block
    ///    (`AlreadyExists`)
    /// 3. The location resolves in the catalog (`NotFound`)
    /// 4. The location has an open warehouse slot (`CeilingExceeded`)
    /// 5. Capacity fits the location's maximum (`CeilingExceeded`)
    /// 6. Stock fits the capacity (`CeilingExceeded`)
    ///
    /// ## Returns
    /// The stored warehouse with its assigned row id.
    pub async fn create(&self, draft: WarehouseDraft) -> EngineResult<Warehouse> {
        validation::validate_draft(&draft)?;

        debug!(business_unit_code = %draft.business_unit_code, "Creating warehouse");

        let _guards = self
            .locks
            .acquire(vec![
                Scope::Location(draft.location.clone()),
                Scope::Warehouse(draft.business_unit_code.clone()),
            ])
            .await;

        let warehouses = self.db.warehouses();

        if let Some(existing) = warehouses
            .find_by_business_unit_code(&draft.business_unit_code)
            .await?
        {
            // Only an active generation blocks the code.
            if existing.is_active() {
                return Err(DomainError::already_exists(
                    Entity::Warehouse,
                    &draft.business_unit_code,
                )
                .into());
            }
        }

        let location = self.catalog.resolve_by_identifier(&draft.location)?;

        let active = warehouses
            .count_active_by_location(&location.identification)
            .await?;
        validation::check_location_has_room(&location, active)?;
        validation::check_capacity_within_location(&location, draft.capacity)?;
        validation::check_stock_within_capacity(draft.stock, draft.capacity)?;

        let warehouse = match warehouses.insert(&draft, Utc::now()).await {
            Ok(warehouse) => warehouse,
            // The partial unique index backstops writers outside this
            // process; report the lost race the same way as check 2.
            Err(e) if e.is_unique_violation() => {
                return Err(DomainError::already_exists(
                    Entity::Warehouse,
                    &draft.business_unit_code,
                )
                .into())
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            business_unit_code = %warehouse.business_unit_code,
            location = %warehouse.location,
            capacity = %warehouse.capacity,
            "Warehouse created"
        );

        Ok(warehouse)
    }

    /// Replaces the active generation of a warehouse.
    ///
    /// ## Precondition Order
    /// 1. Draft fields are syntactically valid (`InvalidArgument`)
    /// 2. The code exists (`NotFound`); its latest generation is active
    ///    (`AlreadyArchived`)
    /// 3. The new location resolves in the catalog (`NotFound`)
    /// 4. New capacity covers the stock already on hand (`CeilingExceeded`)
    /// 5. Submitted stock equals current stock (`InvalidArgument` - a
    ///    replacement cannot invent or discard stock)
    /// 6. Capacity fits the new location's maximum (`CeilingExceeded`)
    /// 7. Stock fits the capacity (`CeilingExceeded`)
    ///
    /// The warehouse-count ceiling of the new location is deliberately not
    /// re-checked; a replacement never adds a net warehouse.
    ///
    /// ## Atomicity
    /// Archiving the old generation and inserting the new one happen in a
    /// single transaction. Concurrent readers see the old generation or the
    /// new one, never neither and never both.
    pub async fn replace(&self, draft: WarehouseDraft) -> EngineResult<Warehouse> {
        validation::validate_draft(&draft)?;

        debug!(business_unit_code = %draft.business_unit_code, "Replacing warehouse");

        let _guards = self
            .locks
            .acquire(vec![
                Scope::Location(draft.location.clone()),
                Scope::Warehouse(draft.business_unit_code.clone()),
            ])
            .await;

        let warehouses = self.db.warehouses();

        let current = warehouses
            .find_by_business_unit_code(&draft.business_unit_code)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Warehouse, &draft.business_unit_code))?;
        if current.is_archived() {
            return Err(DomainError::already_archived(&draft.business_unit_code).into());
        }

        let location = self.catalog.resolve_by_identifier(&draft.location)?;

        validation::check_capacity_covers_stock(draft.capacity, current.stock)?;
        validation::check_stock_unchanged(current.stock, draft.stock)?;
        validation::check_capacity_within_location(&location, draft.capacity)?;
        validation::check_stock_within_capacity(draft.stock, draft.capacity)?;

        let now = Utc::now();
        let warehouse = match warehouses
            .replace_generation(current.id, now, &draft, now)
            .await
        {
            Ok(warehouse) => warehouse,
            // The current generation vanished between the check and the
            // transaction: an out-of-process writer archived it first.
            Err(DbError::NotFound { .. }) => {
                return Err(DomainError::already_archived(&draft.business_unit_code).into())
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            business_unit_code = %warehouse.business_unit_code,
            superseded_id = %current.id,
            location = %warehouse.location,
            "Warehouse replaced"
        );

        Ok(warehouse)
    }

    /// Archives the active generation of a warehouse.
    ///
    /// ## Precondition Order
    /// 1. The code is non-blank (`InvalidArgument`)
    /// 2. The code exists (`NotFound`)
    /// 3. Its latest generation is active (`AlreadyArchived` - archiving
    ///    twice is an error, not a no-op)
    ///
    /// ## Returns
    /// The warehouse with its `archived_at` timestamp set. The row is
    /// retained: it stays fetchable by id and in the generation history,
    /// and its code becomes free for reuse.
    pub async fn archive(&self, business_unit_code: &str) -> EngineResult<Warehouse> {
        if business_unit_code.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "business unit code".to_string(),
            }
            .into());
        }

        debug!(business_unit_code = %business_unit_code, "Archiving warehouse");

        let _guards = self
            .locks
            .acquire(vec![Scope::Warehouse(business_unit_code.to_string())])
            .await;

        let warehouses = self.db.warehouses();

        let current = warehouses
            .find_by_business_unit_code(business_unit_code)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Warehouse, business_unit_code))?;
        if current.is_archived() {
            return Err(DomainError::already_archived(business_unit_code).into());
        }

        let archived_at = Utc::now();
        match warehouses.set_archived(current.id, archived_at).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(DomainError::already_archived(business_unit_code).into())
            }
            Err(e) => return Err(e.into()),
        }

        info!(business_unit_code = %business_unit_code, "Warehouse archived");

        Ok(Warehouse {
            archived_at: Some(archived_at),
            ..current
        })
    }

    /// Lists all active warehouses.
    pub async fn list_active(&self) -> EngineResult<Vec<Warehouse>> {
        Ok(self.db.warehouses().list_active().await?)
    }

    /// Gets one warehouse generation by row id, archived ones included.
    pub async fn find_by_id(&self, id: i64) -> EngineResult<Option<Warehouse>> {
        Ok(self.db.warehouses().find_by_id(id).await?)
    }

    /// Lists the full generation history of a code, oldest first.
    pub async fn list_generations(&self, business_unit_code: &str) -> EngineResult<Vec<Warehouse>> {
        Ok(self
            .db
            .warehouses()
            .list_generations(business_unit_code)
            .await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use depot_core::CeilingError;
    use depot_db::DbConfig;

    async fn engine() -> WarehouseLifecycle {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        WarehouseLifecycle::new(db)
    }

    fn draft(code: &str, location: &str, capacity: i64, stock: i64) -> WarehouseDraft {
        WarehouseDraft {
            business_unit_code: code.to_string(),
            location: location.to_string(),
            capacity,
            stock,
        }
    }

    fn ceiling(err: &EngineError) -> &CeilingError {
        match err {
            EngineError::Domain(DomainError::CeilingExceeded(c)) => c,
            other => panic!("expected ceiling error, got {other:?}"),
        }
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_returns_active_warehouse() {
        let engine = engine().await;

        let warehouse = engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 30))
            .await
            .unwrap();

        assert!(warehouse.id > 0);
        assert_eq!(warehouse.business_unit_code, "MWH.001");
        assert_eq!(warehouse.location, "ZWOLLE-001");
        assert_eq!(warehouse.capacity, 40);
        assert_eq!(warehouse.stock, 30);
        assert!(warehouse.is_active());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_code() {
        let engine = engine().await;

        let err = engine
            .create(draft("   ", "ZWOLLE-001", 40, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidArgument(_))
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_quantities() {
        let engine = engine().await;

        let err = engine
            .create(draft("MWH.001", "ZWOLLE-001", -1, 0))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, -1))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_active_code() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();

        let err = engine
            .create(draft("MWH.001", "AMSTERDAM-001", 90, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::AlreadyExists { .. })
        ));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_create_reuses_code_after_archive() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();
        engine.archive("MWH.001").await.unwrap();

        // Same code, and even the same single-slot location is free again.
        let reborn = engine
            .create(draft("MWH.001", "ZWOLLE-001", 35, 0))
            .await
            .unwrap();
        assert!(reborn.is_active());
        assert_eq!(reborn.capacity, 35);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_location() {
        let engine = engine().await;

        let err = engine
            .create(draft("MWH.001", "NOWHERE-999", 40, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::NotFound {
                entity: Entity::Location,
                ..
            })
        ));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_create_enforces_location_warehouse_ceiling() {
        let engine = engine().await;

        // ZWOLLE-001 has a single warehouse slot.
        engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();

        let err = engine
            .create(draft("MWH.002", "ZWOLLE-001", 40, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            ceiling(&err),
            CeilingError::WarehousesPerLocation { .. }
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_enforces_location_capacity() {
        let engine = engine().await;

        // ZWOLLE-001 caps out at 40.
        let err = engine
            .create(draft("MWH.001", "ZWOLLE-001", 41, 0))
            .await
            .unwrap_err();

        assert!(matches!(ceiling(&err), CeilingError::LocationCapacity { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_stock_over_capacity() {
        let engine = engine().await;

        let err = engine
            .create(draft("MWH.001", "ZWOLLE-001", 30, 31))
            .await
            .unwrap_err();

        assert!(matches!(
            ceiling(&err),
            CeilingError::StockOverCapacity { .. }
        ));
    }

    // -------------------------------------------------------------------------
    // Replace
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_replace_swaps_generations_atomically() {
        let engine = engine().await;

        let first = engine
            .create(draft("MWH.001", "AMSTERDAM-001", 100, 75))
            .await
            .unwrap();

        let second = engine
            .replace(draft("MWH.001", "AMSTERDAM-001", 80, 75))
            .await
            .unwrap();

        assert_ne!(second.id, first.id);
        assert!(second.is_active());
        assert_eq!(second.capacity, 80);
        assert_eq!(second.stock, 75);

        let generations = engine.list_generations("MWH.001").await.unwrap();
        assert_eq!(generations.len(), 2);
        assert!(generations[0].is_archived());
        assert!(generations[1].is_active());

        // Exactly one active listing for the code.
        let active = engine.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }

    #[tokio::test]
    async fn test_replace_can_move_location() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "AMSTERDAM-001", 50, 20))
            .await
            .unwrap();

        let moved = engine
            .replace(draft("MWH.001", "TILBURG-001", 55, 20))
            .await
            .unwrap();

        assert_eq!(moved.location, "TILBURG-001");
    }

    #[tokio::test]
    async fn test_replace_skips_location_count_ceiling() {
        let engine = engine().await;

        // Fill TILBURG-001 (2 slots) completely.
        engine
            .create(draft("MWH.001", "TILBURG-001", 60, 0))
            .await
            .unwrap();
        engine
            .create(draft("MWH.002", "TILBURG-001", 60, 0))
            .await
            .unwrap();

        engine
            .create(draft("MWH.003", "ZWOLLE-002", 50, 10))
            .await
            .unwrap();

        // Moving a warehouse into the full location still succeeds; a
        // replacement adds no net warehouse anywhere.
        let moved = engine
            .replace(draft("MWH.003", "TILBURG-001", 50, 10))
            .await
            .unwrap();
        assert_eq!(moved.location, "TILBURG-001");
    }

    #[tokio::test]
    async fn test_replace_requires_capacity_covering_stock() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "AMSTERDAM-001", 100, 75))
            .await
            .unwrap();

        let err = engine
            .replace(draft("MWH.001", "AMSTERDAM-001", 70, 75))
            .await
            .unwrap_err();

        assert!(matches!(
            ceiling(&err),
            CeilingError::CapacityBelowStock { .. }
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_replace_rejects_stock_changes() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "AMSTERDAM-001", 100, 75))
            .await
            .unwrap();

        let err = engine
            .replace(draft("MWH.001", "AMSTERDAM-001", 100, 60))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidArgument(
                ValidationError::StockMismatch { .. }
            ))
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_replace_enforces_new_location_capacity() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "AMSTERDAM-001", 50, 10))
            .await
            .unwrap();

        // ZWOLLE-001 caps at 40; capacity 45 covers the stock but not the move.
        let err = engine
            .replace(draft("MWH.001", "ZWOLLE-001", 45, 10))
            .await
            .unwrap_err();

        assert!(matches!(ceiling(&err), CeilingError::LocationCapacity { .. }));
    }

    #[tokio::test]
    async fn test_replace_missing_code_not_found() {
        let engine = engine().await;

        let err = engine
            .replace(draft("MWH.404", "ZWOLLE-001", 40, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::NotFound {
                entity: Entity::Warehouse,
                ..
            })
        ));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_replace_archived_code_conflicts() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();
        engine.archive("MWH.001").await.unwrap();

        let err = engine
            .replace(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::AlreadyArchived { .. })
        ));
        assert_eq!(err.status_code(), 409);
    }

    // -------------------------------------------------------------------------
    // Archive
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_archive_sets_timestamp_and_frees_listing() {
        let engine = engine().await;

        let created = engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();

        let archived = engine.archive("MWH.001").await.unwrap();
        assert!(archived.is_archived());
        assert_eq!(archived.id, created.id);

        assert!(engine.list_active().await.unwrap().is_empty());

        // The row itself is retained and reports its archive time.
        let fetched = engine.find_by_id(created.id).await.unwrap().unwrap();
        assert!(fetched.archived_at.is_some());
    }

    #[tokio::test]
    async fn test_archive_is_not_idempotent() {
        let engine = engine().await;

        engine
            .create(draft("MWH.001", "ZWOLLE-001", 40, 0))
            .await
            .unwrap();
        engine.archive("MWH.001").await.unwrap();

        let err = engine.archive("MWH.001").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::AlreadyArchived { .. })
        ));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_archive_unknown_code_not_found() {
        let engine = engine().await;

        let err = engine.archive("MWH.404").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_archive_blank_code_invalid_argument() {
        let engine = engine().await;

        let err = engine.archive("  ").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidArgument(_))
        ));
        assert_eq!(err.status_code(), 400);
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_concurrent_creates_respect_location_ceiling() {
        let engine = engine().await;

        // ZWOLLE-001 has one slot; exactly one of the two may win it.
        let a = {
            let engine = engine.clone();
            tokio::spawn(
                async move { engine.create(draft("MWH.001", "ZWOLLE-001", 40, 0)).await },
            )
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(
                async move { engine.create(draft("MWH.002", "ZWOLLE-001", 40, 0)).await },
            )
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let won = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(won, 1);

        let lost = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            ceiling(lost.as_ref().unwrap_err()),
            CeilingError::WarehousesPerLocation { .. }
        ));

        assert_eq!(engine.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_code_one_wins() {
        let engine = engine().await;

        let a = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .create(draft("MWH.001", "AMSTERDAM-001", 90, 0))
                    .await
            })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .create(draft("MWH.001", "AMSTERDAM-002", 70, 0))
                    .await
            })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

        let lost = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            lost.as_ref().unwrap_err(),
            EngineError::Domain(DomainError::AlreadyExists { .. })
        ));
    }
}
