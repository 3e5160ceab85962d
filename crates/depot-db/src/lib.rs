//! # depot-db: Database Layer for Depot
//!
//! SQLite persistence for the Depot fulfilment system, async via sqlx.
//!
//! ## What Lives Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            depot-db                                     │
//! │                                                                         │
//! │   pool.rs          Database handle, WAL-mode SqlitePool, DbConfig       │
//! │   migrations.rs    Embedded schema migrations (001_initial_schema.sql)  │
//! │   error.rs         DbError: constraint-aware wrapper over sqlx::Error   │
//! │   repository/      One repository per table:                            │
//! │     warehouse.rs     generations, active lookups, atomic replacement    │
//! │     association.rs   composite-key CRUD plus the ceiling counts         │
//! │     product.rs       product CRUD                                       │
//! │     store.rs         store CRUD                                         │
//! │   bin/seed.rs      Development data seeder                              │
//! │                                                                         │
//! │   No business rules here. Repositories read and write rows; the        │
//! │   engines in depot-engine decide what the rows are allowed to say.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./depot.db")).await?;
//! let active = db.warehouses().list_active().await?;
//! ```
//!
//! Tests connect with [`DbConfig::in_memory`] and get an isolated,
//! fully-migrated database per test.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::association::AssociationRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
pub use repository::warehouse::WarehouseRepository;
