//! # Validation Module
//!
//! Business rule validation for Depot.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Syntactic (this module, string/numeric validators)           │
//! │  ├── Blank codes, negative quantities, over-long identifiers           │
//! │  └── Fails fast, before any storage read                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Rules (this module, check_* functions)                       │
//! │  ├── Pure verdicts over counts the engine read                         │
//! │  └── Ceilings, capacity bounds, replace invariants                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── Partial unique index on active business unit codes                │
//! │  └── UNIQUE composite key on associations                              │
//! │                                                                         │
//! │  The engines run layers 1 and 2 in a fixed order and stop at the       │
//! │  first failure; layer 3 backstops races the advisory locks miss.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use depot_core::validation::{validate_business_unit_code, check_stock_within_capacity};
//!
//! // Validate the code before touching storage
//! validate_business_unit_code("MWH.001").unwrap();
//!
//! // Verdict over values the caller already has
//! check_stock_within_capacity(30, 40).unwrap();
//! ```

use crate::error::{CeilingError, ValidationError};
use crate::location::Location;
use crate::types::WarehouseDraft;
use crate::{
    MAX_BUSINESS_UNIT_CODE_LEN, MAX_PRODUCTS_PER_WAREHOUSE, MAX_WAREHOUSES_PER_PRODUCT_STORE,
    MAX_WAREHOUSES_PER_STORE,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a warehouse business unit code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 40 characters
/// - Should contain only alphanumeric characters, dots, hyphens, underscores
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_business_unit_code;
///
/// assert!(validate_business_unit_code("MWH.001").is_ok());
/// assert!(validate_business_unit_code("").is_err());
/// assert!(validate_business_unit_code("has space").is_err());
/// ```
pub fn validate_business_unit_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "business unit code".to_string(),
        });
    }

    if code.len() > MAX_BUSINESS_UNIT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "business unit code".to_string(),
            max: MAX_BUSINESS_UNIT_CODE_LEN,
        });
    }

    // Check for valid characters (alphanumeric, dot, hyphen, underscore)
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "business unit code".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a location identifier.
///
/// ## Rules
/// - Must not be empty (whether it resolves is the catalog's concern)
pub fn validate_location_identifier(identifier: &str) -> ValidationResult<()> {
    if identifier.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "location".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a warehouse capacity value.
///
/// ## Rules
/// - Must be non-negative (zero means a site that holds nothing yet)
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a warehouse stock value.
///
/// ## Rules
/// - Must be non-negative
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates all syntactic fields of a warehouse draft.
///
/// Runs the field validators in declaration order and stops at the first
/// failure. Catalog resolution and ceiling checks are separate steps.
pub fn validate_draft(draft: &WarehouseDraft) -> ValidationResult<()> {
    validate_business_unit_code(&draft.business_unit_code)?;
    validate_location_identifier(&draft.location)?;
    validate_capacity(draft.capacity)?;
    validate_stock(draft.stock)?;

    Ok(())
}

// =============================================================================
// Lifecycle Rules
// =============================================================================

/// Checks that a location can host one more active warehouse.
///
/// ## Arguments
/// * `location` - The resolved catalog entry
/// * `active_count` - Active warehouses currently hosted there
pub fn check_location_has_room(location: &Location, active_count: i64) -> Result<(), CeilingError> {
    if active_count >= location.max_number_of_warehouses {
        return Err(CeilingError::WarehousesPerLocation {
            location: location.identification.clone(),
            max: location.max_number_of_warehouses,
        });
    }

    Ok(())
}

/// Checks a declared capacity against the location's ceiling.
pub fn check_capacity_within_location(
    location: &Location,
    capacity: i64,
) -> Result<(), CeilingError> {
    if capacity > location.max_capacity {
        return Err(CeilingError::LocationCapacity {
            location: location.identification.clone(),
            capacity,
            max: location.max_capacity,
        });
    }

    Ok(())
}

/// Checks that stock fits within a warehouse's own capacity.
pub fn check_stock_within_capacity(stock: i64, capacity: i64) -> Result<(), CeilingError> {
    if stock > capacity {
        return Err(CeilingError::StockOverCapacity { stock, capacity });
    }

    Ok(())
}

/// Checks that a replacement capacity covers the stock already on hand.
///
/// ## User Workflow
/// ```text
/// Replace MWH.001 (current stock: 30)
///      │
///      ▼
/// check_capacity_covers_stock(new_capacity, 30) ← THIS FUNCTION
///      │
///      ├── new capacity 25? → Error: cannot accommodate current stock
///      │
///      └── new capacity 35? → OK, proceed with remaining checks
/// ```
pub fn check_capacity_covers_stock(capacity: i64, current_stock: i64) -> Result<(), CeilingError> {
    if capacity < current_stock {
        return Err(CeilingError::CapacityBelowStock {
            capacity,
            stock: current_stock,
        });
    }

    Ok(())
}

/// Checks that a replacement keeps the stock on hand unchanged.
///
/// Stock moves through fulfilment, never through replacement; a draft that
/// invents or discards units is a contradiction in the request.
pub fn check_stock_unchanged(current_stock: i64, submitted_stock: i64) -> ValidationResult<()> {
    if submitted_stock != current_stock {
        return Err(ValidationError::StockMismatch {
            current: current_stock,
            submitted: submitted_stock,
        });
    }

    Ok(())
}

// =============================================================================
// Association Ceilings
// =============================================================================

/// Checks the per-(product, store) warehouse ceiling.
///
/// ## Arguments
/// * `row_count` - Existing associations for this exact (product, store)
///   pair; every row counts, the warehouses need not be distinct
pub fn check_warehouses_per_product_store(
    row_count: i64,
    product_id: i64,
    store_id: i64,
) -> Result<(), CeilingError> {
    if row_count >= MAX_WAREHOUSES_PER_PRODUCT_STORE {
        return Err(CeilingError::WarehousesPerProductStore {
            product_id,
            store_id,
            max: MAX_WAREHOUSES_PER_PRODUCT_STORE,
        });
    }

    Ok(())
}

/// Checks the distinct-warehouses-per-store ceiling.
///
/// ## Arguments
/// * `distinct_warehouses` - Distinct warehouse codes already serving the store
/// * `warehouse_already_linked` - Whether the candidate warehouse is one of
///   them; an already-linked warehouse never trips this ceiling because it
///   adds no new site to the store's routes
pub fn check_warehouses_per_store(
    distinct_warehouses: i64,
    warehouse_already_linked: bool,
    store_id: i64,
) -> Result<(), CeilingError> {
    if distinct_warehouses >= MAX_WAREHOUSES_PER_STORE && !warehouse_already_linked {
        return Err(CeilingError::WarehousesPerStore {
            store_id,
            max: MAX_WAREHOUSES_PER_STORE,
        });
    }

    Ok(())
}

/// Checks the distinct-products-per-warehouse ceiling.
///
/// ## Arguments
/// * `distinct_products` - Distinct product ids the warehouse already stocks
/// * `product_already_stocked` - Whether the candidate product is one of
///   them; a repeat product for another store adds no new picking lane
pub fn check_products_per_warehouse(
    distinct_products: i64,
    product_already_stocked: bool,
    business_unit_code: &str,
) -> Result<(), CeilingError> {
    if distinct_products >= MAX_PRODUCTS_PER_WAREHOUSE && !product_already_stocked {
        return Err(CeilingError::ProductsPerWarehouse {
            business_unit_code: business_unit_code.to_string(),
            max: MAX_PRODUCTS_PER_WAREHOUSE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn zwolle() -> Location {
        Location {
            identification: "ZWOLLE-001".to_string(),
            max_number_of_warehouses: 1,
            max_capacity: 40,
        }
    }

    #[test]
    fn test_validate_business_unit_code() {
        // Valid codes
        assert!(validate_business_unit_code("MWH.001").is_ok());
        assert!(validate_business_unit_code("WH-42_A").is_ok());
        assert!(validate_business_unit_code("ABC123").is_ok());

        // Invalid codes
        assert!(validate_business_unit_code("").is_err());
        assert!(validate_business_unit_code("   ").is_err());
        assert!(validate_business_unit_code("has space").is_err());
        assert!(validate_business_unit_code(&"A".repeat(41)).is_err());
    }

    #[test]
    fn test_validate_location_identifier() {
        assert!(validate_location_identifier("ZWOLLE-001").is_ok());
        assert!(validate_location_identifier("").is_err());
        assert!(validate_location_identifier("  ").is_err());
    }

    #[test]
    fn test_validate_capacity_and_stock() {
        assert!(validate_capacity(0).is_ok());
        assert!(validate_capacity(100).is_ok());
        assert!(validate_capacity(-1).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_draft_stops_at_first_failure() {
        let draft = WarehouseDraft {
            business_unit_code: "".to_string(),
            location: "".to_string(),
            capacity: -1,
            stock: -1,
        };

        // Code is checked first, so that's the error we see
        let err = validate_draft(&draft).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "business unit code"));
    }

    #[test]
    fn test_location_room_boundary() {
        let location = zwolle();

        assert!(check_location_has_room(&location, 0).is_ok());
        assert!(check_location_has_room(&location, 1).is_err());
        assert!(check_location_has_room(&location, 2).is_err());
    }

    #[test]
    fn test_capacity_within_location_boundary() {
        let location = zwolle();

        assert!(check_capacity_within_location(&location, 40).is_ok());
        assert!(check_capacity_within_location(&location, 41).is_err());
    }

    #[test]
    fn test_stock_within_capacity_boundary() {
        assert!(check_stock_within_capacity(40, 40).is_ok());
        assert!(check_stock_within_capacity(41, 40).is_err());
    }

    #[test]
    fn test_capacity_covers_stock() {
        assert!(check_capacity_covers_stock(30, 30).is_ok());
        assert!(check_capacity_covers_stock(31, 30).is_ok());
        assert!(check_capacity_covers_stock(29, 30).is_err());
    }

    #[test]
    fn test_stock_unchanged() {
        assert!(check_stock_unchanged(30, 30).is_ok());
        assert!(matches!(
            check_stock_unchanged(30, 31),
            Err(ValidationError::StockMismatch {
                current: 30,
                submitted: 31,
            })
        ));
    }

    #[test]
    fn test_warehouses_per_product_store_counts_rows() {
        assert!(check_warehouses_per_product_store(0, 1, 1).is_ok());
        assert!(check_warehouses_per_product_store(1, 1, 1).is_ok());
        assert!(check_warehouses_per_product_store(2, 1, 1).is_err());
    }

    #[test]
    fn test_warehouses_per_store_spares_linked_warehouse() {
        assert!(check_warehouses_per_store(2, false, 7).is_ok());
        assert!(check_warehouses_per_store(3, false, 7).is_err());
        // At the ceiling, but the warehouse already serves the store
        assert!(check_warehouses_per_store(3, true, 7).is_ok());
    }

    #[test]
    fn test_products_per_warehouse_spares_stocked_product() {
        assert!(check_products_per_warehouse(4, false, "MWH.001").is_ok());
        assert!(check_products_per_warehouse(5, false, "MWH.001").is_err());
        // At the ceiling, but the product is already in the warehouse
        assert!(check_products_per_warehouse(5, true, "MWH.001").is_ok());
    }
}
