//! # depot-core: Pure Domain Logic for Depot
//!
//! This crate is the **heart** of Depot. It contains the fulfilment domain
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Depot Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    depot-engine (Engines)                       │   │
//! │  │    WarehouseLifecycle ── AssociationService ── StoreService     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ location  │  │   error   │  │ validation│  │   │
//! │  │   │ Warehouse │  │  Catalog  │  │  Domain   │  │   rules   │  │   │
//! │  │   │Association│  │  lookups  │  │  Ceiling  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   PURE FUNCTIONS ONLY • NOTHING IN HERE TOUCHES A SOCKET       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-db (Database Layer)                    │   │
//! │  │            repositories, pool, embedded migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Warehouse, Association, Product, Store)
//! - [`location`] - The immutable location catalog
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Field validators and the ceiling rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every rule is deterministic - same input = same output
//! 2. **No I/O**: This crate must stay runnable without a database or network
//! 3. **Counts In, Verdicts Out**: Ceiling rules take counts the caller read
//!    and return a typed verdict; they never read anything themselves
//! 4. **Typed Errors**: Every failure path carries a variant, not a string
//!
//! ## Example Usage
//!
//! ```rust
//! use depot_core::{LocationCatalog, validation};
//!
//! let catalog = LocationCatalog::builtin();
//! let location = catalog.resolve_by_identifier("ZWOLLE-001").unwrap();
//!
//! // ZWOLLE-001 hosts at most one warehouse of up to 40 units
//! assert_eq!(location.max_number_of_warehouses, 1);
//! assert!(validation::check_capacity_within_location(&location, 40).is_ok());
//! assert!(validation::check_capacity_within_location(&location, 41).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod location;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use depot_core::DomainError` instead of
// `use depot_core::error::DomainError`

pub use error::{CeilingError, DomainError, DomainResult, Entity, ValidationError};
pub use location::{Location, LocationCatalog};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum warehouses that may fulfil one product for one store.
///
/// ## Business Reason
/// A product sold by a store is sourced from at most two warehouses, so a
/// stock-out at one site leaves a single, unambiguous fallback.
pub const MAX_WAREHOUSES_PER_PRODUCT_STORE: i64 = 2;

/// Maximum distinct warehouses serving a single store.
///
/// ## Business Reason
/// Keeps each store's delivery routes consolidated; three sites cover a
/// store's full catalogue in practice.
pub const MAX_WAREHOUSES_PER_STORE: i64 = 3;

/// Maximum distinct products stocked by a single warehouse.
///
/// ## Business Reason
/// Warehouses are specialised: five product lines per site keeps picking
/// lanes dedicated and simple.
pub const MAX_PRODUCTS_PER_WAREHOUSE: i64 = 5;

/// Maximum length of a warehouse business unit code.
pub const MAX_BUSINESS_UNIT_CODE_LEN: usize = 40;
