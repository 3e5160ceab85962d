//! # Store Service
//!
//! CRUD for retail stores, with legacy notifications on create and update.
//!
//! ## Notification Rules
//! - `create` and `update` notify the legacy sink AFTER the write lands
//! - sink failures are logged at WARN and never fail the operation
//! - `remove` never notifies; the legacy side keeps its own record

use tracing::{info, warn};

use depot_core::{DomainError, Entity, Store};
use depot_db::{Database, DbError};
use std::sync::Arc;

use crate::error::EngineResult;
use crate::legacy::{LegacySink, LoggingLegacySink};

/// Service for store CRUD plus the legacy notification contract.
#[derive(Clone)]
pub struct StoreService {
    db: Database,
    sink: Arc<dyn LegacySink>,
}

impl StoreService {
    /// Creates a store service with the default logging sink.
    pub fn new(db: Database) -> Self {
        Self::with_sink(db, Arc::new(LoggingLegacySink))
    }

    /// Creates a store service delivering events to the given sink.
    pub fn with_sink(db: Database, sink: Arc<dyn LegacySink>) -> Self {
        StoreService { db, sink }
    }

    /// Creates a store and notifies the legacy sink.
    pub async fn create(
        &self,
        name: &str,
        quantity_products_in_stock: i64,
    ) -> EngineResult<Store> {
        let store = self
            .db
            .stores()
            .insert(name, quantity_products_in_stock)
            .await?;

        info!(store_id = %store.id, name = %store.name, "Store created");

        if let Err(e) = self.sink.store_created(&store).await {
            warn!(store_id = %store.id, error = %e, "Legacy sink rejected store.created");
        }

        Ok(store)
    }

    /// Updates a store and notifies the legacy sink.
    ///
    /// ## Returns
    /// * `Ok(Store)` - The updated store
    /// * `Err(NotFound)` - No store with this id
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        quantity_products_in_stock: i64,
    ) -> EngineResult<Store> {
        let mut store = self
            .db
            .stores()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Store, id.to_string()))?;

        store.name = name.to_string();
        store.quantity_products_in_stock = quantity_products_in_stock;

        match self.db.stores().update(&store).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(DomainError::not_found(Entity::Store, id.to_string()).into())
            }
            Err(e) => return Err(e.into()),
        }

        info!(store_id = %store.id, "Store updated");

        if let Err(e) = self.sink.store_updated(&store).await {
            warn!(store_id = %store.id, error = %e, "Legacy sink rejected store.updated");
        }

        Ok(store)
    }

    /// Removes a store. The legacy sink is deliberately not notified.
    ///
    /// ## Returns
    /// * `Ok(())` - Store removed
    /// * `Err(NotFound)` - No store with this id
    pub async fn remove(&self, id: i64) -> EngineResult<()> {
        match self.db.stores().delete(id).await {
            Ok(()) => {
                info!(store_id = %id, "Store removed");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => {
                Err(DomainError::not_found(Entity::Store, id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
