//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Warehouse     │   │  Association    │   │  Product/Store  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (row)       │   │  id (row)       │   │  id (row)       │       │
//! │  │  business_unit_ │   │  warehouse_code │   │  name           │       │
//! │  │    code (key)   │   │  product_id     │   │  ...            │       │
//! │  │  location       │   │  store_id       │   └─────────────────┘       │
//! │  │  capacity/stock │   │  created_at     │                             │
//! │  │  archived_at    │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A warehouse has:
//! - `id`: storage-assigned row id - immutable, used for direct lookups
//! - `business_unit_code`: business key - names the warehouse across its
//!   generations (a replacement keeps the code, the row id changes)
//!
//! ## Soft Archive
//! Archiving sets `archived_at` instead of deleting the row. Archived
//! generations drop out of active listings and location counts but stay
//! readable by row id and in a code's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Warehouse
// =============================================================================

/// A storage site with bounded capacity, identified by a business unit code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    /// Storage-assigned row id.
    pub id: i64,

    /// Business unit code - business identifier, e.g. "MWH.001".
    pub business_unit_code: String,

    /// Identifier of the hosting location (resolved via the catalog).
    pub location: String,

    /// Maximum units this warehouse can hold.
    pub capacity: i64,

    /// Units currently on hand.
    pub stock: i64,

    /// When this generation was created.
    pub created_at: DateTime<Utc>,

    /// When this generation was archived. `None` means active.
    pub archived_at: Option<DateTime<Utc>>,
}

impl Warehouse {
    /// Checks whether this generation is still active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    /// Checks whether this generation has been archived.
    #[inline]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Units of capacity not currently occupied by stock.
    #[inline]
    pub fn free_capacity(&self) -> i64 {
        self.capacity - self.stock
    }
}

// =============================================================================
// Warehouse Draft
// =============================================================================

/// The caller-supplied shape of a warehouse, before any row exists.
///
/// Used by both Create (new code) and Replace (existing code, fresh
/// configuration). Timestamps and row ids are assigned by the engine and
/// storage, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseDraft {
    pub business_unit_code: String,
    pub location: String,
    pub capacity: i64,
    pub stock: i64,
}

// =============================================================================
// Association
// =============================================================================

/// A fulfilment triple: this warehouse fulfils this product for this store.
///
/// Identity is the composite key (warehouse code, product id, store id);
/// the row id exists only for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Association {
    /// Storage-assigned row id.
    pub id: i64,

    /// Business unit code of the fulfilling warehouse.
    pub warehouse_business_unit_code: String,

    /// The fulfilled product.
    pub product_id: i64,

    /// The receiving store.
    pub store_id: i64,

    /// When the association was created.
    pub created_at: DateTime<Utc>,
}

impl Association {
    /// Renders the composite key the way error messages and logs show it.
    pub fn key(&self) -> String {
        association_key(&self.warehouse_business_unit_code, self.product_id, self.store_id)
    }
}

/// Renders an association composite key as `code/product/store`.
pub fn association_key(warehouse_business_unit_code: &str, product_id: i64, store_id: i64) -> String {
    format!("{warehouse_business_unit_code}/{product_id}/{store_id}")
}

// =============================================================================
// Product
// =============================================================================

/// A product that warehouses stock and stores sell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Storage-assigned row id.
    pub id: i64,

    /// Display name, e.g. "TONSTAD".
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Unit price in cents (smallest currency unit, no floats).
    pub price_cents: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Store
// =============================================================================

/// A retail store that products are fulfilled to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Storage-assigned row id.
    pub id: i64,

    /// Display name, e.g. "Amsterdam Centrum".
    pub name: String,

    /// Units of product currently held by the store itself.
    pub quantity_products_in_stock: i64,

    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_warehouse() -> Warehouse {
        Warehouse {
            id: 1,
            business_unit_code: "MWH.001".to_string(),
            location: "ZWOLLE-001".to_string(),
            capacity: 40,
            stock: 30,
            created_at: Utc::now(),
            archived_at: None,
        }
    }

    #[test]
    fn test_warehouse_state_helpers() {
        let mut warehouse = sample_warehouse();
        assert!(warehouse.is_active());
        assert!(!warehouse.is_archived());
        assert_eq!(warehouse.free_capacity(), 10);

        warehouse.archived_at = Some(Utc::now());
        assert!(warehouse.is_archived());
        assert!(!warehouse.is_active());
    }

    #[test]
    fn test_warehouse_serializes_camel_case() {
        let json = serde_json::to_value(sample_warehouse()).unwrap();
        assert!(json.get("businessUnitCode").is_some());
        assert!(json.get("archivedAt").is_some());
        assert!(json.get("business_unit_code").is_none());
    }

    #[test]
    fn test_association_key_format() {
        let association = Association {
            id: 9,
            warehouse_business_unit_code: "MWH.001".to_string(),
            product_id: 3,
            store_id: 12,
            created_at: Utc::now(),
        };
        assert_eq!(association.key(), "MWH.001/3/12");
        assert_eq!(association_key("MWH.012", 1, 2), "MWH.012/1/2");
    }
}
