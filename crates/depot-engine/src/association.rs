//! # Association Constraint Engine
//!
//! Links warehouses to (product, store) pairs under three ceilings.
//!
//! ## The Three Ceilings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              What May Be Linked To What, And How Often                  │
//! │                                                                         │
//! │  1. Per (product, store): at most 2 warehouses                         │
//! │                                                                         │
//! │       product 3 @ store 7 ◄── MWH.001  ✓                               │
//! │       product 3 @ store 7 ◄── MWH.002  ✓                               │
//! │       product 3 @ store 7 ◄── MWH.003  ✗ CeilingExceeded               │
//! │                                                                         │
//! │  2. Per store: at most 3 DISTINCT warehouses, but a warehouse          │
//! │     already serving the store may keep adding products                  │
//! │                                                                         │
//! │  3. Per warehouse: at most 5 DISTINCT products, but a product          │
//! │     already stocked may be offered to more stores                       │
//! │                                                                         │
//! │  Check order: references → duplicate link → 1 → 2 → 3. The first       │
//! │  violation wins and is the one reported.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reference Semantics
//! Unknown warehouse / product / store references are argument errors, not
//! lookup failures: the association is the resource here, and a dangling
//! reference inside it is a malformed request. Archived warehouses are
//! valid references; winding a warehouse down does not sever its routes.

use chrono::Utc;
use tracing::{debug, info};

use depot_core::{
    association_key, validation, Association, DomainError, Entity, ValidationError,
};
use depot_db::Database;

use crate::error::EngineResult;
use crate::locks::{Scope, ScopeLocks};

/// Engine for creating and removing warehouse-product-store links.
///
/// ## Thread Safety
/// Cloning shares the database pool and the scope lock registry; all clones
/// serialize their ceiling checks against each other.
#[derive(Debug, Clone)]
pub struct AssociationService {
    db: Database,
    locks: ScopeLocks,
}

impl AssociationService {
    /// Creates an association engine.
    pub fn new(db: Database) -> Self {
        AssociationService {
            db,
            locks: ScopeLocks::new(),
        }
    }

    /// Creates an association between a warehouse, a product and a store.
    ///
    /// ## Check Order
    /// 1. The warehouse code is known, in any lifecycle state
    ///    (`InvalidArgument`)
    /// 2. The product exists (`InvalidArgument`)
    /// 3. The store exists (`InvalidArgument`)
    /// 4. The exact link does not already exist (`AlreadyExists`)
    /// 5. The (product, store) pair has a warehouse slot free
    ///    (`CeilingExceeded`)
    /// 6. The store has a warehouse slot free, unless this warehouse
    ///    already serves it (`CeilingExceeded`)
    /// 7. The warehouse has a product slot free, unless it already stocks
    ///    this product (`CeilingExceeded`)
    ///
    /// ## Returns
    /// The stored association with its assigned row id.
    pub async fn create(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
        store_id: i64,
    ) -> EngineResult<Association> {
        debug!(
            warehouse = %warehouse_business_unit_code,
            product_id = %product_id,
            store_id = %store_id,
            "Creating association"
        );

        let _guards = self
            .locks
            .acquire(vec![
                Scope::Warehouse(warehouse_business_unit_code.to_string()),
                Scope::Store(store_id),
                Scope::ProductStore(product_id, store_id),
            ])
            .await;

        let associations = self.db.associations();

        if !self
            .db
            .warehouses()
            .exists_by_business_unit_code(warehouse_business_unit_code)
            .await?
        {
            return Err(ValidationError::unknown_reference(
                Entity::Warehouse,
                warehouse_business_unit_code,
            )
            .into());
        }
        if !self.db.products().exists(product_id).await? {
            return Err(ValidationError::unknown_reference(Entity::Product, product_id).into());
        }
        if !self.db.stores().exists(store_id).await? {
            return Err(ValidationError::unknown_reference(Entity::Store, store_id).into());
        }

        if associations
            .find_by_key(warehouse_business_unit_code, product_id, store_id)
            .await?
            .is_some()
        {
            return Err(DomainError::already_exists(
                Entity::Association,
                association_key(warehouse_business_unit_code, product_id, store_id),
            )
            .into());
        }

        let pair_rows = associations
            .count_by_product_and_store(product_id, store_id)
            .await?;
        validation::check_warehouses_per_product_store(pair_rows, product_id, store_id)?;

        let store_warehouses = associations
            .count_distinct_warehouses_by_store(store_id)
            .await?;
        let already_linked = associations
            .is_warehouse_linked_to_store(warehouse_business_unit_code, store_id)
            .await?;
        validation::check_warehouses_per_store(store_warehouses, already_linked, store_id)?;

        let stocked_products = associations
            .count_distinct_products_by_warehouse(warehouse_business_unit_code)
            .await?;
        let already_stocked = associations
            .is_product_linked_to_warehouse(warehouse_business_unit_code, product_id)
            .await?;
        validation::check_products_per_warehouse(
            stocked_products,
            already_stocked,
            warehouse_business_unit_code,
        )?;

        let association = match associations
            .insert(warehouse_business_unit_code, product_id, store_id, Utc::now())
            .await
        {
            Ok(association) => association,
            // Composite UNIQUE backstop for writers outside this process.
            Err(e) if e.is_unique_violation() => {
                return Err(DomainError::already_exists(
                    Entity::Association,
                    association_key(warehouse_business_unit_code, product_id, store_id),
                )
                .into())
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            warehouse = %association.warehouse_business_unit_code,
            product_id = %association.product_id,
            store_id = %association.store_id,
            "Association created"
        );

        Ok(association)
    }

    /// Deletes an association by its composite key.
    ///
    /// A single DELETE carries both the lookup and the removal; no lock is
    /// needed because removing a row can only widen ceiling headroom.
    ///
    /// ## Returns
    /// * `Ok(())` - Link removed
    /// * `Err(NotFound)` - No such link
    pub async fn delete(
        &self,
        warehouse_business_unit_code: &str,
        product_id: i64,
        store_id: i64,
    ) -> EngineResult<()> {
        let removed = self
            .db
            .associations()
            .delete_by_key(warehouse_business_unit_code, product_id, store_id)
            .await?;

        if removed == 0 {
            return Err(DomainError::not_found(
                Entity::Association,
                association_key(warehouse_business_unit_code, product_id, store_id),
            )
            .into());
        }

        info!(
            warehouse = %warehouse_business_unit_code,
            product_id = %product_id,
            store_id = %store_id,
            "Association deleted"
        );

        Ok(())
    }

    /// Returns every association, unfiltered, in insertion order.
    pub async fn get_all(&self) -> EngineResult<Vec<Association>> {
        Ok(self.db.associations().list_all().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
