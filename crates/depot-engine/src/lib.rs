//! # depot-engine: Constraint and Lifecycle Engines for Depot
//!
//! This crate sits between the pure rules in `depot-core` and the SQL in
//! `depot-db`. It owns the order in which preconditions run, the advisory
//! locks that keep concurrent check-then-write sequences honest, and the
//! legacy notification seam for store changes.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Engine Architecture                             │
//! │                                                                         │
//! │  ┌────────────────────┐        ┌────────────────────────────────────┐  │
//! │  │ WarehouseLifecycle │        │        AssociationService          │  │
//! │  │   (lifecycle.rs)   │        │          (association.rs)          │  │
//! │  │                    │        │                                    │  │
//! │  │ Create / Replace / │        │ Create (7 ordered checks, three    │  │
//! │  │ Archive with the   │        │ ceilings with bypasses), Delete,   │  │
//! │  │ generation model   │        │ GetAll                             │  │
//! │  └─────────┬──────────┘        └─────────────────┬──────────────────┘  │
//! │            │                                     │                     │
//! │            │          ┌────────────────┐         │                     │
//! │            ├─────────►│   ScopeLocks   │◄────────┤                     │
//! │            │          │   (locks.rs)   │         │                     │
//! │            │          │                │         │                     │
//! │            │          │ Named mutexes, │         │                     │
//! │            │          │ sorted acquire │         │                     │
//! │            │          └────────────────┘         │                     │
//! │            ▼                                     ▼                     │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      depot-db repositories                       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ┌────────────────────┐        ┌────────────────────────────────────┐  │
//! │  │    StoreService    │───────►│         LegacySink trait           │  │
//! │  │    (stores.rs)     │ notify │          (legacy.rs)               │  │
//! │  │                    │        │                                    │  │
//! │  │ Store CRUD, then   │        │ store_created / store_updated,     │  │
//! │  │ fire-and-forget    │        │ default impl just logs the event   │  │
//! │  └────────────────────┘        └────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`association`] - Association constraint engine (the three ceilings)
//! - [`error`] - Engine error type wrapping domain and storage failures
//! - [`legacy`] - Legacy sink trait and the logging default
//! - [`lifecycle`] - Warehouse create / replace / archive
//! - [`locks`] - Scoped advisory lock registry
//! - [`stores`] - Store CRUD with legacy notifications

pub mod association;
pub mod error;
pub mod legacy;
pub mod lifecycle;
pub mod locks;
pub mod stores;

pub use association::AssociationService;
pub use error::{EngineError, EngineResult};
pub use legacy::{LegacySink, LoggingLegacySink, SinkError};
pub use lifecycle::WarehouseLifecycle;
pub use locks::{Scope, ScopeLocks};
pub use stores::StoreService;
