//! # Repository Pattern Implementation
//!
//! Data access layer for all depot entities.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Repository Layer                                 │
//! │                                                                         │
//! │  Engine Layer (depot-engine)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │   Warehouse    │  │  Association   │  │ Product/Store  │            │
//! │  │   Repository   │  │   Repository   │  │  Repositories  │            │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬────────┘            │
//! │          │                   │                   │                     │
//! │          └───────────────────┼───────────────────┘                     │
//! │                              ▼                                          │
//! │                    ┌──────────────────┐                                 │
//! │                    │   SqlitePool     │                                 │
//! │                    └──────────────────┘                                 │
//! │                                                                         │
//! │  Each repository owns its SQL. Engines compose repository calls and    │
//! │  never build queries themselves.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. **One repository per aggregate**: Warehouse, Association, Product, Store
//! 2. **Repositories are cheap to create**: they clone the pool handle
//! 3. **Counting queries live here**: ceiling checks read their counts
//!    through dedicated methods rather than ad-hoc SQL in the engines

pub mod association;
pub mod product;
pub mod store;
pub mod warehouse;

pub use association::AssociationRepository;
pub use product::ProductRepository;
pub use store::StoreRepository;
pub use warehouse::WarehouseRepository;
