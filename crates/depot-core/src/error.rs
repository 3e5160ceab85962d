//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── DomainError      - The five domain failure kinds                  │
//! │  ├── CeilingError     - Which cardinality/capacity ceiling tripped     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  depot-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  depot-engine errors (separate crate)                                  │
//! │  └── EngineError      - Domain | Storage, what callers see             │
//! │                                                                         │
//! │  Flow: ValidationError → DomainError → EngineError → caller            │
//! │        CeilingError   ──┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, id, limit)
//! 3. Errors are enum variants, never String
//! 4. Every variant carries a stable HTTP status via `status_code()`

use std::fmt;

use thiserror::Error;

// =============================================================================
// Entity
// =============================================================================

/// The kinds of entity a domain error can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Warehouse,
    Location,
    Product,
    Store,
    Association,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Warehouse => "Warehouse",
            Entity::Location => "Location",
            Entity::Product => "Product",
            Entity::Store => "Store",
            Entity::Association => "Association",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Domain Error
// =============================================================================

/// Domain rule failures.
///
/// Exactly five kinds; everything an engine can refuse maps onto one of
/// them. REST-facing callers get the status mapping from [`status_code`].
///
/// [`status_code`]: DomainError::status_code
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Replacing or archiving an unknown business unit code
    /// - Deleting an association whose composite key has no row
    /// - Resolving an unknown location identifier
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    /// The entity being created already exists.
    ///
    /// ## When This Occurs
    /// - Creating a warehouse whose code is in use by an ACTIVE warehouse
    /// - Creating an association whose composite key already has a row
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: Entity, key: String },

    /// The warehouse is archived and the operation needs an active one.
    ///
    /// ## When This Occurs
    /// - Archiving twice (archive is deliberately not idempotent)
    /// - Replacing a warehouse whose latest generation is archived
    #[error("Warehouse already archived: {business_unit_code}")]
    AlreadyArchived { business_unit_code: String },

    /// A cardinality or capacity ceiling would be exceeded.
    #[error("{0}")]
    CeilingExceeded(#[from] CeilingError),

    /// An argument is malformed or contradicts current state.
    #[error("{0}")]
    InvalidArgument(#[from] ValidationError),
}

impl DomainError {
    /// Creates a NotFound error for a given entity type and key.
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Creates an AlreadyExists error.
    pub fn already_exists(entity: Entity, key: impl Into<String>) -> Self {
        DomainError::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    /// Creates an AlreadyArchived error.
    pub fn already_archived(business_unit_code: impl Into<String>) -> Self {
        DomainError::AlreadyArchived {
            business_unit_code: business_unit_code.into(),
        }
    }

    /// The HTTP status a REST surface would answer with.
    ///
    /// ## Mapping
    /// ```text
    /// NotFound                         → 404
    /// AlreadyExists / AlreadyArchived  → 409
    /// CeilingExceeded / InvalidArgument → 400
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::NotFound { .. } => 404,
            DomainError::AlreadyExists { .. } | DomainError::AlreadyArchived { .. } => 409,
            DomainError::CeilingExceeded(_) | DomainError::InvalidArgument(_) => 400,
        }
    }
}

// =============================================================================
// Ceiling Error
// =============================================================================

/// Names which ceiling a refused operation would have exceeded.
///
/// Each variant carries the identifiers and the limit so the message is
/// actionable without a stack trace.
#[derive(Debug, Error)]
pub enum CeilingError {
    /// More than the allowed warehouses would fulfil one (product, store).
    #[error("Product {product_id} at store {store_id} is already fulfilled by the maximum of {max} warehouses")]
    WarehousesPerProductStore {
        product_id: i64,
        store_id: i64,
        max: i64,
    },

    /// The store would be served by too many distinct warehouses.
    #[error("Store {store_id} is already served by the maximum of {max} warehouses")]
    WarehousesPerStore { store_id: i64, max: i64 },

    /// The warehouse would stock too many distinct products.
    #[error("Warehouse {business_unit_code} already stocks the maximum of {max} products")]
    ProductsPerWarehouse {
        business_unit_code: String,
        max: i64,
    },

    /// The location already hosts its maximum number of active warehouses.
    #[error("Location {location} already hosts the maximum of {max} warehouses")]
    WarehousesPerLocation { location: String, max: i64 },

    /// Requested capacity exceeds what the location allows.
    #[error("Capacity {capacity} exceeds the limit of {max} for location {location}")]
    LocationCapacity {
        location: String,
        capacity: i64,
        max: i64,
    },

    /// A replacement capacity cannot accommodate the stock already on hand.
    #[error("Capacity {capacity} cannot accommodate the current stock of {stock}")]
    CapacityBelowStock { capacity: i64, stock: i64 },

    /// Stock would exceed the warehouse's own capacity.
    #[error("Stock {stock} exceeds capacity {capacity}")]
    StockOverCapacity { stock: i64, capacity: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when arguments don't meet requirements, either in
/// isolation (blank, negative) or against current state (unknown reference,
/// stock mismatch on replace). Used before any ceiling logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (unexpected characters and the like).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A referenced entity does not exist.
    ///
    /// Distinct from [`DomainError::NotFound`]: association creation treats
    /// unknown references as bad arguments, not as missing resources.
    #[error("{entity} does not exist: {key}")]
    UnknownReference { entity: Entity, key: String },

    /// A replacement tried to change the stock on hand.
    #[error("Stock {submitted} does not match the current warehouse stock of {current}")]
    StockMismatch { current: i64, submitted: i64 },
}

impl ValidationError {
    /// Creates an UnknownReference error.
    pub fn unknown_reference(entity: Entity, key: impl ToString) -> Self {
        ValidationError::UnknownReference {
            entity,
            key: key.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::not_found(Entity::Warehouse, "MWH.001");
        assert_eq!(err.to_string(), "Warehouse not found: MWH.001");

        let err = DomainError::already_archived("MWH.012");
        assert_eq!(err.to_string(), "Warehouse already archived: MWH.012");

        let err = CeilingError::StockOverCapacity {
            stock: 50,
            capacity: 40,
        };
        assert_eq!(err.to_string(), "Stock 50 exceeds capacity 40");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DomainError::not_found(Entity::Association, "MWH.001/1/1").status_code(),
            404
        );
        assert_eq!(
            DomainError::already_exists(Entity::Warehouse, "MWH.001").status_code(),
            409
        );
        assert_eq!(DomainError::already_archived("MWH.001").status_code(), 409);
        assert_eq!(
            DomainError::from(CeilingError::WarehousesPerStore { store_id: 7, max: 3 })
                .status_code(),
            400
        );
        assert_eq!(
            DomainError::from(ValidationError::Required {
                field: "business unit code".to_string(),
            })
            .status_code(),
            400
        );
    }

    #[test]
    fn test_validation_converts_to_domain_error() {
        let validation_err = ValidationError::unknown_reference(Entity::Product, 42);
        let domain_err: DomainError = validation_err.into();
        assert!(matches!(domain_err, DomainError::InvalidArgument(_)));
        assert_eq!(domain_err.to_string(), "Product does not exist: 42");
    }

    #[test]
    fn test_ceiling_converts_to_domain_error() {
        let ceiling_err = CeilingError::ProductsPerWarehouse {
            business_unit_code: "MWH.001".to_string(),
            max: 5,
        };
        let domain_err: DomainError = ceiling_err.into();
        assert!(matches!(domain_err, DomainError::CeilingExceeded(_)));
    }
}
